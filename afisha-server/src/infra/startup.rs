use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use afisha_core::{
    cinemas::static_cinemas,
    database::{
        CinemaRepository, FilmRepository, InMemoryCinemaRepository,
        InMemoryFilmRepository, PostgresDatabase,
    },
    providers::{
        GraphHopperRouter, KinopoiskProvider, NominatimGeocoder, OsrmRouter,
        RouteProvider, http,
    },
};

use crate::infra::{app_state::Adapters, config::Config};

/// Where films and cinemas are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Postgres,
    /// Process-local maps, seeded with the static cinemas.
    InMemory,
}

pub async fn connect_database(config: &Config) -> Result<PostgresDatabase> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is required unless --in-memory is set")?;
    let db = PostgresDatabase::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    Ok(db)
}

/// Build upstream clients and storage adapters from configuration.
pub async fn build_adapters(
    config: &Config,
    storage: StorageMode,
) -> Result<Adapters> {
    let http_client =
        http::build_client(config.upstream.timeout, &config.upstream.user_agent)
            .context("failed to build HTTP client")?;

    let film_provider = KinopoiskProvider::new(
        http_client.clone(),
        &config.kinopoisk.base_url,
        config.kinopoisk.api_key.clone(),
    )
    .context("invalid Kinopoisk base URL")?;

    let primary_router: Option<Arc<dyn RouteProvider>> =
        match &config.routing.graphhopper_api_key {
            Some(key) => Some(Arc::new(
                GraphHopperRouter::new(
                    http_client.clone(),
                    &config.routing.graphhopper_base_url,
                    key.clone(),
                )
                .context("invalid GraphHopper configuration")?,
            )),
            None => None,
        };
    let fallback_router = OsrmRouter::new(
        http_client.clone(),
        &config.routing.osrm_base_url,
    )
    .context("invalid OSRM base URL")?;

    let geocoder = NominatimGeocoder::new(
        http_client,
        &config.geocoding.nominatim_base_url,
        config.geocoding.language.clone(),
    )
    .context("invalid Nominatim base URL")?;

    let (films, cinemas): (Arc<dyn FilmRepository>, Arc<dyn CinemaRepository>) =
        match storage {
            StorageMode::Postgres => {
                let db = connect_database(config).await?;
                if let Err(err) = db.migrate().await {
                    warn!(error = %err, "migrations failed; continuing with the existing schema");
                }
                (Arc::new(db.films()), Arc::new(db.cinemas()))
            }
            StorageMode::InMemory => {
                info!("using in-memory storage seeded with static cinemas");
                (
                    Arc::new(InMemoryFilmRepository::new()),
                    Arc::new(InMemoryCinemaRepository::with_cinemas(
                        static_cinemas(),
                    )),
                )
            }
        };

    Ok(Adapters {
        film_provider: Arc::new(film_provider),
        films,
        cinemas,
        primary_router,
        fallback_router: Arc::new(fallback_router),
        geocoder: Arc::new(geocoder),
    })
}
