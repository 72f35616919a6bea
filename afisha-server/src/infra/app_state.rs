use std::{fmt, sync::Arc};

use afisha_core::{
    catalog::{ExternalCatalog, TopPageCache},
    cinemas::CinemaDirectory,
    database::{CinemaRepository, FilmRepository},
    films::FilmCatalog,
    geo::{GeocodingService, RoutePlanner},
    providers::{FilmProvider, Geocoder, RouteProvider},
};

use crate::infra::config::Config;

/// Ports the services are built over. Production wires real providers and
/// Postgres; tests wire fakes and in-memory stores.
pub struct Adapters {
    pub film_provider: Arc<dyn FilmProvider>,
    pub films: Arc<dyn FilmRepository>,
    pub cinemas: Arc<dyn CinemaRepository>,
    pub primary_router: Option<Arc<dyn RouteProvider>>,
    pub fallback_router: Arc<dyn RouteProvider>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl fmt::Debug for Adapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapters")
            .field("primary_router", &self.primary_router.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub external: Arc<ExternalCatalog>,
    pub films: FilmCatalog,
    pub cinemas: CinemaDirectory,
    pub routes: RoutePlanner,
    pub geocoding: GeocodingService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Arc<Config>, adapters: Adapters) -> Self {
        let Adapters {
            film_provider,
            films,
            cinemas,
            primary_router,
            fallback_router,
            geocoder,
        } = adapters;

        // One cache for the lifetime of the process, shared by every request.
        let cache = TopPageCache::new(config.kinopoisk.page_ttl);
        let external = ExternalCatalog::new(
            film_provider,
            films.clone(),
            cache,
            config.kinopoisk.sampler_settings(),
        );

        Self {
            external: Arc::new(external),
            films: FilmCatalog::new(films),
            cinemas: CinemaDirectory::new(cinemas),
            routes: RoutePlanner::new(primary_router, fallback_router),
            geocoding: GeocodingService::new(geocoder),
            config,
        }
    }
}
