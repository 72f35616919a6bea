use afisha_model::{Film, FilmPatch, NewFilm};
use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait FilmRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Film>>;

    async fn get(&self, id: i32) -> Result<Option<Film>>;

    /// Lookup by the upstream provider's identifier.
    async fn find_by_external_id(&self, external_id: i64)
    -> Result<Option<Film>>;

    async fn create(&self, film: NewFilm) -> Result<Film>;

    /// `Ok(None)` when no film has this id.
    async fn update(&self, id: i32, patch: FilmPatch) -> Result<Option<Film>>;

    /// `Ok(false)` when no film has this id.
    async fn delete(&self, id: i32) -> Result<bool>;
}
