use afisha_model::{Cinema, CinemaFilter, CinemaPatch, NewCinema};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::{database::ports::CinemaRepository, error::Result};

// Coordinates are stored as geography and read back as WKT text.
const CINEMA_COLUMNS: &str = "c.id, c.name, c.address, \
     ST_AsText(c.coordinates) AS coordinates, c.phone_number, c.open_hours, \
     c.created_at, c.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CinemaRow {
    id: i32,
    name: String,
    address: String,
    coordinates: String,
    phone_number: Option<String>,
    open_hours: Option<Value>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<CinemaRow> for Cinema {
    fn from(row: CinemaRow) -> Self {
        Cinema {
            id: row.id,
            name: row.name,
            address: row.address,
            coordinates: row.coordinates,
            phone_number: row.phone_number,
            open_hours: row.open_hours,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresCinemaRepository {
    pool: PgPool,
}

impl PostgresCinemaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CinemaRepository for PostgresCinemaRepository {
    async fn list(&self, filter: &CinemaFilter) -> Result<Vec<Cinema>> {
        let pattern = filter
            .address_contains
            .as_ref()
            .map(|needle| format!("%{needle}%"));

        // LOWER folds Cyrillic only under a Unicode-aware collation; a `C`
        // locale database never matches the city needles.
        let rows = sqlx::query_as::<_, CinemaRow>(&format!(
            r#"
            SELECT {CINEMA_COLUMNS}
            FROM cinemas c
            WHERE $1::TEXT IS NULL OR LOWER(c.address) LIKE $1
            ORDER BY c.id
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Cinema::from).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Cinema>> {
        let row = sqlx::query_as::<_, CinemaRow>(&format!(
            "SELECT {CINEMA_COLUMNS} FROM cinemas c WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cinema::from))
    }

    async fn create(&self, cinema: NewCinema) -> Result<Cinema> {
        let row = sqlx::query_as::<_, CinemaRow>(&format!(
            r#"
            WITH c AS (
                INSERT INTO cinemas (name, address, coordinates, phone_number, open_hours)
                VALUES ($1, $2, ST_GeogFromText($3), $4, $5)
                RETURNING *
            )
            SELECT {CINEMA_COLUMNS} FROM c
            "#
        ))
        .bind(&cinema.name)
        .bind(&cinema.address)
        .bind(&cinema.coordinates)
        .bind(&cinema.phone_number)
        .bind(&cinema.open_hours)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: i32,
        patch: CinemaPatch,
    ) -> Result<Option<Cinema>> {
        let row = sqlx::query_as::<_, CinemaRow>(&format!(
            r#"
            WITH c AS (
                UPDATE cinemas SET
                    name = COALESCE($2, name),
                    address = COALESCE($3, address),
                    coordinates = COALESCE(ST_GeogFromText($4), coordinates),
                    phone_number = COALESCE($5, phone_number),
                    open_hours = COALESCE($6, open_hours),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {CINEMA_COLUMNS} FROM c
            "#
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.address)
        .bind(&patch.coordinates)
        .bind(&patch.phone_number)
        .bind(&patch.open_hours)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cinema::from))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cinemas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_film(&self, film_id: i32) -> Result<Vec<Cinema>> {
        let rows = sqlx::query_as::<_, CinemaRow>(&format!(
            r#"
            SELECT {CINEMA_COLUMNS}
            FROM cinemas c
            JOIN film_cinema_relationships r ON r.cinema_id = c.id
            WHERE r.film_id = $1
            ORDER BY c.id
            "#
        ))
        .bind(film_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Cinema::from).collect())
    }
}
