use afisha_model::{Film, FilmPatch, NewFilm};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::{database::ports::FilmRepository, error::Result};

const FILM_COLUMNS: &str = "id, title, description, poster_url, release_date, \
     rating, genres, director, actors, duration, kinopoisk_id, created_at, \
     updated_at";

#[derive(Debug, sqlx::FromRow)]
struct FilmRow {
    id: i32,
    title: String,
    description: Option<String>,
    poster_url: Option<String>,
    release_date: Option<NaiveDate>,
    rating: f64,
    genres: Vec<String>,
    director: Option<String>,
    actors: Vec<String>,
    duration: Option<i32>,
    kinopoisk_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FilmRow> for Film {
    fn from(row: FilmRow) -> Self {
        Film {
            id: row.id,
            title: row.title,
            description: row.description,
            poster_url: row.poster_url,
            release_date: row.release_date,
            rating: row.rating,
            genres: row.genres,
            director: row.director,
            actors: row.actors,
            duration: row.duration,
            kinopoisk_id: row.kinopoisk_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresFilmRepository {
    pool: PgPool,
}

impl PostgresFilmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilmRepository for PostgresFilmRepository {
    async fn list(&self) -> Result<Vec<Film>> {
        let rows = sqlx::query_as::<_, FilmRow>(&format!(
            "SELECT {FILM_COLUMNS} FROM films ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Film::from).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Film>> {
        let row = sqlx::query_as::<_, FilmRow>(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Film::from))
    }

    async fn find_by_external_id(
        &self,
        external_id: i64,
    ) -> Result<Option<Film>> {
        let row = sqlx::query_as::<_, FilmRow>(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE kinopoisk_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Film::from))
    }

    async fn create(&self, film: NewFilm) -> Result<Film> {
        let row = sqlx::query_as::<_, FilmRow>(&format!(
            r#"
            INSERT INTO films (
                title, description, poster_url, release_date, rating,
                genres, director, actors, duration, kinopoisk_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {FILM_COLUMNS}
            "#
        ))
        .bind(&film.title)
        .bind(&film.description)
        .bind(&film.poster_url)
        .bind(film.release_date)
        .bind(film.rating.max(0.0))
        .bind(&film.genres)
        .bind(&film.director)
        .bind(&film.actors)
        .bind(film.duration)
        .bind(film.kinopoisk_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i32, patch: FilmPatch) -> Result<Option<Film>> {
        let row = sqlx::query_as::<_, FilmRow>(&format!(
            r#"
            UPDATE films SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                poster_url = COALESCE($4, poster_url),
                release_date = COALESCE($5, release_date),
                rating = COALESCE($6, rating),
                genres = COALESCE($7, genres),
                director = COALESCE($8, director),
                actors = COALESCE($9, actors),
                duration = COALESCE($10, duration),
                kinopoisk_id = COALESCE($11, kinopoisk_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FILM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.poster_url)
        .bind(patch.release_date)
        .bind(patch.rating.map(|r| r.max(0.0)))
        .bind(&patch.genres)
        .bind(&patch.director)
        .bind(&patch.actors)
        .bind(patch.duration)
        .bind(patch.kinopoisk_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Film::from))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
