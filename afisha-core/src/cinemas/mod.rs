pub mod seed;

use std::sync::Arc;

use afisha_model::{
    Cinema, CinemaFilter, CinemaListing, CinemaLocation, CinemaPatch,
    CinemaSource, Coordinates, NewCinema,
};
use tracing::{debug, warn};

use crate::{
    database::CinemaRepository,
    error::{AfishaError, Result},
    geo,
};

pub use seed::static_cinemas;

/// Cinema lookups over a repository. Listings fall back to the static seed
/// when the store errors or has nothing to show.
#[derive(Clone)]
pub struct CinemaDirectory {
    repo: Arc<dyn CinemaRepository>,
}

impl std::fmt::Debug for CinemaDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CinemaDirectory").finish_non_exhaustive()
    }
}

fn from_seed(filter: &CinemaFilter) -> CinemaListing {
    CinemaListing {
        cinemas: static_cinemas()
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect(),
        source: CinemaSource::StaticSeed,
    }
}

fn or_seed(
    result: Result<Vec<Cinema>>,
    filter: &CinemaFilter,
    context: &str,
) -> CinemaListing {
    match result {
        Ok(cinemas) if !cinemas.is_empty() => CinemaListing {
            cinemas,
            source: CinemaSource::Database,
        },
        Ok(_) => {
            debug!(context, "no cinemas stored, serving static seed");
            from_seed(filter)
        }
        Err(e) => {
            warn!(context, error = %e, "cinema lookup failed, serving static seed");
            from_seed(filter)
        }
    }
}

fn validate_new(cinema: &NewCinema) -> Result<()> {
    if cinema.name.trim().is_empty() || cinema.address.trim().is_empty() {
        return Err(AfishaError::InvalidInput(
            "cinema name and address are required".to_string(),
        ));
    }
    validate_point(&cinema.coordinates)
}

fn validate_point(wkt: &str) -> Result<()> {
    match geo::parse_wkt_point(wkt) {
        Some(_) => Ok(()),
        None => Err(AfishaError::InvalidInput(format!(
            "coordinates must be POINT(longitude latitude), got {wkt:?}"
        ))),
    }
}

impl CinemaDirectory {
    pub fn new(repo: Arc<dyn CinemaRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filter: &CinemaFilter) -> CinemaListing {
        or_seed(self.repo.list(filter).await, filter, "list")
    }

    pub async fn for_film(&self, film_id: i32) -> CinemaListing {
        or_seed(
            self.repo.list_for_film(film_id).await,
            &CinemaFilter::all(),
            "film cinemas",
        )
    }

    /// Cinemas showing a film, ranked by distance from `origin`.
    pub async fn locations(
        &self,
        film_id: i32,
        origin: Option<Coordinates>,
        query: Option<&str>,
    ) -> Vec<CinemaLocation> {
        let listing = self.for_film(film_id).await;
        geo::rank_cinemas(listing.cinemas, origin, query)
    }

    pub async fn get(&self, id: i32) -> Result<Cinema> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AfishaError::NotFound(format!("cinema {id}")))
    }

    pub async fn create(&self, cinema: NewCinema) -> Result<Cinema> {
        validate_new(&cinema)?;
        self.repo.create(cinema).await
    }

    pub async fn update(&self, id: i32, patch: CinemaPatch) -> Result<Cinema> {
        if let Some(wkt) = &patch.coordinates {
            validate_point(wkt)?;
        }
        self.repo
            .update(id, patch)
            .await?
            .ok_or_else(|| AfishaError::NotFound(format!("cinema {id}")))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(AfishaError::NotFound(format!("cinema {id}")))
        }
    }
}
