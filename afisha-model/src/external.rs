//! Films as seen through the upstream film provider.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ranked lists exposed by the upstream provider.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopListKind {
    #[serde(rename = "TOP_250_BEST_FILMS")]
    Top250Best,
    #[default]
    #[serde(rename = "TOP_100_POPULAR_FILMS")]
    Top100Popular,
    #[serde(rename = "TOP_AWAIT_FILMS")]
    TopAwait,
}

impl TopListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopListKind::Top250Best => "TOP_250_BEST_FILMS",
            TopListKind::Top100Popular => "TOP_100_POPULAR_FILMS",
            TopListKind::TopAwait => "TOP_AWAIT_FILMS",
        }
    }

    /// Known depth of the list, 20 films per page.
    pub fn page_count(&self) -> u32 {
        match self {
            TopListKind::Top250Best => 13,
            TopListKind::Top100Popular => 5,
            TopListKind::TopAwait => 1,
        }
    }
}

impl fmt::Display for TopListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP_250_BEST_FILMS" => Ok(TopListKind::Top250Best),
            "TOP_100_POPULAR_FILMS" => Ok(TopListKind::Top100Popular),
            "TOP_AWAIT_FILMS" => Ok(TopListKind::TopAwait),
            other => Err(format!("unknown top list kind: {other}")),
        }
    }
}

/// Lightweight film card used by list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmSummary {
    pub external_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: f64,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub items: Vec<FilmSummary>,
}

impl SampleResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Upstream detail mapped onto the local film schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmDetail {
    pub external_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub duration: Option<i32>,
}

/// What happened to the local copy during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    Created {
        #[serde(rename = "localId")]
        local_id: i32,
    },
    Updated {
        #[serde(rename = "localId")]
        local_id: i32,
    },
    Unchanged {
        #[serde(rename = "localId")]
        local_id: i32,
    },
    Failed { reason: String },
}

impl PersistOutcome {
    pub fn local_id(&self) -> Option<i32> {
        match self {
            PersistOutcome::Created { local_id }
            | PersistOutcome::Updated { local_id }
            | PersistOutcome::Unchanged { local_id } => Some(*local_id),
            PersistOutcome::Failed { .. } => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.local_id().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledFilm {
    #[serde(flatten)]
    pub film: FilmDetail,
    pub local_id: Option<i32>,
    pub persistence: PersistOutcome,
}

impl ReconciledFilm {
    pub fn new(film: FilmDetail, persistence: PersistOutcome) -> Self {
        Self {
            film,
            local_id: persistence.local_id(),
            persistence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmFact {
    pub text: String,
    pub kind: Option<String>,
    pub spoiler: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactsPage {
    pub total: u32,
    pub items: Vec<FilmFact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmReview {
    pub id: Option<i64>,
    pub kind: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub positive_rating: i64,
    pub negative_rating: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPage {
    pub total: u32,
    pub total_pages: u32,
    pub items: Vec<FilmReview>,
}
