//! Local film catalogue.

use std::sync::Arc;

use afisha_model::{Film, FilmPatch, NewFilm};

use crate::{
    database::FilmRepository,
    error::{AfishaError, Result},
};

#[derive(Clone)]
pub struct FilmCatalog {
    repo: Arc<dyn FilmRepository>,
}

impl std::fmt::Debug for FilmCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilmCatalog").finish_non_exhaustive()
    }
}

fn not_found(id: i32) -> AfishaError {
    AfishaError::NotFound(format!("film {id}"))
}

fn validate_rating(rating: f64) -> Result<()> {
    if !rating.is_finite() || rating < 0.0 {
        return Err(AfishaError::InvalidInput(
            "rating must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

impl FilmCatalog {
    pub fn new(repo: Arc<dyn FilmRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> Arc<dyn FilmRepository> {
        Arc::clone(&self.repo)
    }

    pub async fn list(&self) -> Result<Vec<Film>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Film> {
        self.repo.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, mut film: NewFilm) -> Result<Film> {
        film.title = film.title.trim().to_string();
        if film.title.is_empty() {
            return Err(AfishaError::InvalidInput(
                "film title is required".to_string(),
            ));
        }
        validate_rating(film.rating)?;
        self.repo.create(film).await
    }

    pub async fn update(&self, id: i32, patch: FilmPatch) -> Result<Film> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AfishaError::InvalidInput(
                "film title must not be blank".to_string(),
            ));
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        self.repo.update(id, patch).await?.ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}
