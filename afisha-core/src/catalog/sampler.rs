//! Randomized, de-duplicated batches drawn from the upstream top lists.

use std::{collections::HashSet, sync::Arc};

use afisha_model::{FilmSummary, PersistOutcome, SampleResult, TopListKind};
use dashmap::DashSet;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
    catalog::{
        mapping::map_top_item,
        page_cache::TopPageCache,
        random::{RandomSource, shuffle},
        reconcile::FilmReconciler,
    },
    error::{AfishaError, Result},
    providers::{FilmProvider, ProviderError, kinopoisk_types::TopFilmsPage},
};

pub const DEFAULT_RETRY_BUDGET: usize = 8;
pub const DEFAULT_TAKE: usize = 10;
pub const MAX_TAKE: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerSettings {
    /// Page draws allowed per call.
    pub retry_budget: usize,
    pub top_list: TopListKind,
    /// Pages are drawn from `1..=max_pages`.
    pub max_pages: u32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::for_list(TopListKind::default())
    }
}

impl SamplerSettings {
    pub fn for_list(top_list: TopListKind) -> Self {
        Self {
            retry_budget: DEFAULT_RETRY_BUDGET,
            top_list,
            max_pages: top_list.page_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRequest {
    pub take: usize,
    /// Stringified external ids.
    pub exclude: HashSet<String>,
}

impl SampleRequest {
    pub fn new<I, S>(take: usize, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            take: take.clamp(1, MAX_TAKE),
            exclude: exclude
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Build from raw query values. A missing or non-numeric `take` means
    /// [`DEFAULT_TAKE`]; `exclude` is comma separated.
    pub fn from_query(take: Option<&str>, exclude: Option<&str>) -> Self {
        let take = take
            .and_then(|t| t.trim().parse::<i64>().ok())
            .map(|t| t.clamp(1, MAX_TAKE as i64) as usize)
            .unwrap_or(DEFAULT_TAKE);

        Self::new(take, exclude.unwrap_or_default().split(','))
    }

    fn excludes(&self, external_id: i64) -> bool {
        self.exclude.contains(&external_id.to_string())
    }
}

pub struct FilmSampler {
    provider: Arc<dyn FilmProvider>,
    cache: TopPageCache,
    seen: Arc<DashSet<i64>>,
    reconciler: Option<FilmReconciler>,
    settings: SamplerSettings,
}

impl std::fmt::Debug for FilmSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilmSampler")
            .field("settings", &self.settings)
            .field("cached_pages", &self.cache.len())
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}

fn sampler_error(err: ProviderError) -> AfishaError {
    match AfishaError::from(err) {
        config @ AfishaError::Configuration(_) => config,
        other => AfishaError::UpstreamUnavailable(other.to_string()),
    }
}

impl FilmSampler {
    pub fn new(
        provider: Arc<dyn FilmProvider>,
        cache: TopPageCache,
        settings: SamplerSettings,
    ) -> Self {
        Self {
            provider,
            cache,
            seen: Arc::new(DashSet::new()),
            reconciler: None,
            settings,
        }
    }

    /// Persist each film the first time this process returns it.
    pub fn with_reconciler(mut self, reconciler: FilmReconciler) -> Self {
        self.reconciler = Some(reconciler);
        self
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    pub fn cache(&self) -> &TopPageCache {
        &self.cache
    }

    /// Draw up to `request.take` films. A short result is not an error; a
    /// fetch failure is, but only before any page has been obtained.
    pub async fn sample<R>(
        &self,
        request: &SampleRequest,
        rng: &mut R,
    ) -> Result<SampleResult>
    where
        R: RandomSource + Send,
    {
        let take = request.take;
        let max_pages = self.settings.max_pages.max(1);
        let mut picked: Vec<FilmSummary> = Vec::with_capacity(take);
        let mut picked_ids: HashSet<i64> = HashSet::with_capacity(take);
        let mut have_page = false;

        for attempt in 0..self.settings.retry_budget {
            if picked.len() >= take {
                break;
            }

            let page = 1 + rng.below(max_pages as usize) as u32;
            let payload = match self.resolve_page(page).await {
                Ok(payload) => {
                    have_page = true;
                    payload
                }
                Err(e) if !have_page => return Err(sampler_error(e)),
                Err(e) => {
                    warn!(attempt, page, error = %e, "top list page fetch failed");
                    continue;
                }
            };

            let mut items: Vec<_> = payload.films.iter().collect();
            shuffle(&mut items, rng);

            for item in items {
                if picked.len() >= take {
                    break;
                }
                let Some(summary) = map_top_item(item) else {
                    continue;
                };
                if request.excludes(summary.external_id)
                    || !picked_ids.insert(summary.external_id)
                {
                    continue;
                }
                picked.push(summary);
            }
        }

        debug!(
            requested = take,
            returned = picked.len(),
            "film sample drawn"
        );

        self.reconcile_first_sightings(&picked).await;

        Ok(SampleResult { items: picked })
    }

    async fn resolve_page(
        &self,
        page: u32,
    ) -> std::result::Result<Arc<TopFilmsPage>, ProviderError> {
        let kind = self.settings.top_list;
        if let Some(cached) = self.cache.get(kind, page) {
            return Ok(cached);
        }

        let fetched = self.provider.top_films_page(kind, page).await?;
        Ok(self.cache.insert(kind, page, fetched))
    }

    async fn reconcile_first_sightings(&self, picked: &[FilmSummary]) {
        let Some(reconciler) = &self.reconciler else {
            return;
        };

        let fresh: Vec<&FilmSummary> = picked
            .iter()
            .filter(|s| self.seen.insert(s.external_id))
            .collect();
        if fresh.is_empty() {
            return;
        }

        let outcomes =
            join_all(fresh.iter().map(|s| reconciler.reconcile_summary(s)))
                .await;

        for (summary, outcome) in fresh.iter().zip(outcomes) {
            // Failed ids are retried the next time they are sampled.
            if let PersistOutcome::Failed { .. } = outcome {
                self.seen.remove(&summary.external_id);
            }
        }
    }
}
