//! Upstream film catalogue: sampling, details, facts and reviews.

pub mod mapping;
pub mod page_cache;
pub mod random;
pub mod reconcile;
pub mod sampler;

use std::sync::Arc;

use afisha_model::{FactsPage, ReconciledFilm, ReviewsPage, SampleResult};

use crate::{
    database::FilmRepository,
    error::{AfishaError, Result},
    providers::FilmProvider,
};

pub use page_cache::{DEFAULT_PAGE_TTL, TopPageCache};
pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use reconcile::FilmReconciler;
pub use sampler::{FilmSampler, SampleRequest, SamplerSettings};

/// Everything the HTTP layer needs from the upstream film provider.
pub struct ExternalCatalog {
    provider: Arc<dyn FilmProvider>,
    sampler: FilmSampler,
    reconciler: FilmReconciler,
}

impl std::fmt::Debug for ExternalCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalCatalog")
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}

fn check_id(external_id: i64) -> Result<()> {
    if external_id <= 0 {
        return Err(AfishaError::InvalidInput(format!(
            "film id must be positive, got {external_id}"
        )));
    }
    Ok(())
}

impl ExternalCatalog {
    pub fn new(
        provider: Arc<dyn FilmProvider>,
        films: Arc<dyn FilmRepository>,
        cache: TopPageCache,
        settings: SamplerSettings,
    ) -> Self {
        let reconciler = FilmReconciler::new(provider.clone(), films);
        let sampler = FilmSampler::new(provider.clone(), cache, settings)
            .with_reconciler(reconciler.clone());
        Self {
            provider,
            sampler,
            reconciler,
        }
    }

    pub fn sampler(&self) -> &FilmSampler {
        &self.sampler
    }

    pub async fn sample<R>(
        &self,
        request: &SampleRequest,
        rng: &mut R,
    ) -> Result<SampleResult>
    where
        R: RandomSource + Send,
    {
        self.sampler.sample(request, rng).await
    }

    pub async fn details(&self, external_id: i64) -> Result<ReconciledFilm> {
        check_id(external_id)?;
        self.reconciler.reconcile(external_id).await
    }

    pub async fn facts(&self, external_id: i64) -> Result<FactsPage> {
        check_id(external_id)?;
        let payload = self.provider.film_facts(external_id).await?;
        Ok(mapping::map_facts(payload))
    }

    pub async fn reviews(
        &self,
        external_id: i64,
        page: u32,
    ) -> Result<ReviewsPage> {
        check_id(external_id)?;
        let payload = self.provider.film_reviews(external_id, page.max(1)).await?;
        Ok(mapping::map_reviews(payload))
    }
}
