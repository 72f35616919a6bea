//! Upserts of upstream films into the local catalogue, keyed by external id.

use std::sync::Arc;

use afisha_model::{
    Film, FilmDetail, FilmPatch, FilmSummary, NewFilm, PersistOutcome,
    ReconciledFilm,
};
use tracing::{debug, info, warn};

use crate::{
    catalog::mapping,
    database::FilmRepository,
    error::Result,
    providers::FilmProvider,
};

#[derive(Clone)]
pub struct FilmReconciler {
    provider: Arc<dyn FilmProvider>,
    films: Arc<dyn FilmRepository>,
}

impl std::fmt::Debug for FilmReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilmReconciler").finish_non_exhaustive()
    }
}

/// Fields of `detail` that carry a value, as a patch.
fn detail_patch(detail: &FilmDetail) -> FilmPatch {
    FilmPatch {
        title: Some(detail.title.clone()),
        description: detail.description.clone(),
        poster_url: detail.poster_url.clone(),
        release_date: detail.release_date,
        rating: Some(detail.rating),
        genres: (!detail.genres.is_empty()).then(|| detail.genres.clone()),
        director: detail.director.clone(),
        actors: (!detail.actors.is_empty()).then(|| detail.actors.clone()),
        duration: detail.duration,
        kinopoisk_id: None,
    }
}

fn new_film_from_detail(detail: &FilmDetail) -> NewFilm {
    NewFilm {
        title: detail.title.clone(),
        description: detail.description.clone(),
        poster_url: detail.poster_url.clone(),
        release_date: detail.release_date,
        rating: detail.rating,
        genres: detail.genres.clone(),
        director: detail.director.clone(),
        actors: detail.actors.clone(),
        duration: detail.duration,
        kinopoisk_id: Some(detail.external_id),
    }
}

fn new_film_from_summary(summary: &FilmSummary) -> NewFilm {
    NewFilm {
        title: summary.title.clone(),
        poster_url: summary.poster_url.clone(),
        rating: summary.rating,
        genres: summary.genres.clone(),
        kinopoisk_id: Some(summary.external_id),
        ..Default::default()
    }
}

impl FilmReconciler {
    pub fn new(
        provider: Arc<dyn FilmProvider>,
        films: Arc<dyn FilmRepository>,
    ) -> Self {
        Self { provider, films }
    }

    /// Create a summary-level record unless one already exists. Failures
    /// are reported as [`PersistOutcome::Failed`].
    pub async fn reconcile_summary(&self, summary: &FilmSummary) -> PersistOutcome {
        let result: Result<PersistOutcome> = async {
            if let Some(existing) =
                self.films.find_by_external_id(summary.external_id).await?
            {
                return Ok(PersistOutcome::Unchanged {
                    local_id: existing.id,
                });
            }
            let created =
                self.films.create(new_film_from_summary(summary)).await?;
            Ok(PersistOutcome::Created {
                local_id: created.id,
            })
        }
        .await;

        result.unwrap_or_else(|e| {
            warn!(
                external_id = summary.external_id,
                error = %e,
                "failed to persist film summary"
            );
            PersistOutcome::Failed {
                reason: e.to_string(),
            }
        })
    }

    /// Fetch full details and upsert them. Upstream detail failures are
    /// returned; persistence failures only mark the outcome.
    pub async fn reconcile(&self, external_id: i64) -> Result<ReconciledFilm> {
        let payload = self.provider.film_details(external_id).await?;

        let staff = match self.provider.film_staff(external_id).await {
            Ok(staff) => staff,
            Err(e) => {
                warn!(external_id, error = %e, "staff lookup failed, continuing without crew");
                Vec::new()
            }
        };

        let detail = mapping::map_details(external_id, &payload, &staff);
        let persistence = self.persist_detail(&detail).await;

        Ok(ReconciledFilm::new(detail, persistence))
    }

    async fn persist_detail(&self, detail: &FilmDetail) -> PersistOutcome {
        match self.upsert_detail(detail).await {
            Ok(outcome) => {
                debug!(external_id = detail.external_id, ?outcome, "film reconciled");
                outcome
            }
            Err(e) => {
                warn!(
                    external_id = detail.external_id,
                    error = %e,
                    "failed to persist film details"
                );
                PersistOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn upsert_detail(&self, detail: &FilmDetail) -> Result<PersistOutcome> {
        let Some(existing) =
            self.films.find_by_external_id(detail.external_id).await?
        else {
            let created = self.films.create(new_film_from_detail(detail)).await?;
            info!(
                external_id = detail.external_id,
                local_id = created.id,
                "film added to catalogue"
            );
            return Ok(PersistOutcome::Created {
                local_id: created.id,
            });
        };

        let patch = detail_patch(detail);
        if !changes(&existing, &patch) {
            return Ok(PersistOutcome::Unchanged {
                local_id: existing.id,
            });
        }

        match self.films.update(existing.id, patch).await? {
            Some(updated) => Ok(PersistOutcome::Updated {
                local_id: updated.id,
            }),
            // Deleted between lookup and update.
            None => {
                let created =
                    self.films.create(new_film_from_detail(detail)).await?;
                Ok(PersistOutcome::Created {
                    local_id: created.id,
                })
            }
        }
    }
}

fn changes(existing: &Film, patch: &FilmPatch) -> bool {
    let mut patched = existing.clone();
    patch.apply_to(&mut patched);
    patched != *existing
}
