use afisha_model::{Cinema, CinemaFilter, CinemaPatch, NewCinema};
use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait CinemaRepository: Send + Sync {
    async fn list(&self, filter: &CinemaFilter) -> Result<Vec<Cinema>>;

    async fn get(&self, id: i32) -> Result<Option<Cinema>>;

    async fn create(&self, cinema: NewCinema) -> Result<Cinema>;

    async fn update(
        &self,
        id: i32,
        patch: CinemaPatch,
    ) -> Result<Option<Cinema>>;

    async fn delete(&self, id: i32) -> Result<bool>;

    /// Cinemas linked to a film through the relationship table.
    async fn list_for_film(&self, film_id: i32) -> Result<Vec<Cinema>>;
}
