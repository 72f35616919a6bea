mod cinemas;
mod films;

use std::{fmt, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::error::{AfishaError, Result};

pub use cinemas::PostgresCinemaRepository;
pub use films::PostgresFilmRepository;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    films: PostgresFilmRepository,
    cinemas: PostgresCinemaRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| {
                AfishaError::Persistence(format!(
                    "Database connection failed: {e}"
                ))
            })?;

        info!(max_connections, "database pool initialized");

        Ok(Self::from_pool(pool, max_connections))
    }

    pub fn from_pool(pool: PgPool, max_connections: u32) -> Self {
        Self {
            films: PostgresFilmRepository::new(pool.clone()),
            cinemas: PostgresCinemaRepository::new(pool.clone()),
            pool,
            max_connections,
        }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            AfishaError::Persistence(format!("Failed to run migrations: {e}"))
        })?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn films(&self) -> PostgresFilmRepository {
        self.films.clone()
    }

    pub fn cinemas(&self) -> PostgresCinemaRepository {
        self.cinemas.clone()
    }
}
