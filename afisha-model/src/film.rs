use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A film as stored in the local catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    pub duration: Option<i32>,
    /// Identifier assigned by the upstream film provider.
    pub kinopoisk_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFilm {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub kinopoisk_id: Option<i64>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilmPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub genres: Option<Vec<String>>,
    pub director: Option<String>,
    pub actors: Option<Vec<String>>,
    pub duration: Option<i32>,
    pub kinopoisk_id: Option<i64>,
}

impl FilmPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the present fields onto `film`.
    pub fn apply_to(&self, film: &mut Film) {
        if let Some(title) = &self.title {
            film.title = title.clone();
        }
        if let Some(description) = &self.description {
            film.description = Some(description.clone());
        }
        if let Some(poster_url) = &self.poster_url {
            film.poster_url = Some(poster_url.clone());
        }
        if let Some(release_date) = self.release_date {
            film.release_date = Some(release_date);
        }
        if let Some(rating) = self.rating {
            film.rating = rating;
        }
        if let Some(genres) = &self.genres {
            film.genres = genres.clone();
        }
        if let Some(director) = &self.director {
            film.director = Some(director.clone());
        }
        if let Some(actors) = &self.actors {
            film.actors = actors.clone();
        }
        if let Some(duration) = self.duration {
            film.duration = Some(duration);
        }
        if let Some(kinopoisk_id) = self.kinopoisk_id {
            film.kinopoisk_id = Some(kinopoisk_id);
        }
    }
}
