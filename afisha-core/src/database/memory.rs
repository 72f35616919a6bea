//! Process-local repositories used by `--in-memory` mode and by tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::atomic::{AtomicBool, Ordering},
};

use afisha_model::{
    Cinema, CinemaFilter, CinemaPatch, Film, FilmPatch, NewCinema, NewFilm,
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    database::ports::{CinemaRepository, FilmRepository},
    error::{AfishaError, Result},
};

/// Makes every call fail with [`AfishaError::Persistence`] while set.
#[derive(Debug, Default)]
struct FailureSwitch(AtomicBool);

impl FailureSwitch {
    fn set(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }

    fn check(&self, op: &str) -> Result<()> {
        if self.0.load(Ordering::SeqCst) {
            Err(AfishaError::Persistence(format!("{op}: store unavailable")))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
struct FilmTable {
    next_id: i32,
    rows: BTreeMap<i32, Film>,
}

#[derive(Debug, Default)]
pub struct InMemoryFilmRepository {
    table: RwLock<FilmTable>,
    failure: FailureSwitch,
}

impl InMemoryFilmRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failure.set(failing);
    }
}

#[async_trait]
impl FilmRepository for InMemoryFilmRepository {
    async fn list(&self) -> Result<Vec<Film>> {
        self.failure.check("list films")?;
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Film>> {
        self.failure.check("get film")?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_external_id(
        &self,
        external_id: i64,
    ) -> Result<Option<Film>> {
        self.failure.check("find film")?;
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|f| f.kinopoisk_id == Some(external_id))
            .cloned())
    }

    async fn create(&self, film: NewFilm) -> Result<Film> {
        self.failure.check("create film")?;
        let mut table = self.table.write().await;

        if let Some(external_id) = film.kinopoisk_id
            && table
                .rows
                .values()
                .any(|f| f.kinopoisk_id == Some(external_id))
        {
            return Err(AfishaError::Persistence(format!(
                "film with kinopoisk id {external_id} already exists"
            )));
        }

        table.next_id += 1;
        let now = Utc::now();
        let row = Film {
            id: table.next_id,
            title: film.title,
            description: film.description,
            poster_url: film.poster_url,
            release_date: film.release_date,
            rating: film.rating,
            genres: film.genres,
            director: film.director,
            actors: film.actors,
            duration: film.duration,
            kinopoisk_id: film.kinopoisk_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, patch: FilmPatch) -> Result<Option<Film>> {
        self.failure.check("update film")?;
        let mut table = self.table.write().await;
        let Some(film) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(film);
        film.updated_at = Utc::now();
        Ok(Some(film.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        self.failure.check("delete film")?;
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
struct CinemaTable {
    next_id: i32,
    rows: BTreeMap<i32, Cinema>,
    links: BTreeSet<(i32, i32)>,
}

#[derive(Debug, Default)]
pub struct InMemoryCinemaRepository {
    table: RwLock<CinemaTable>,
    failure: FailureSwitch,
}

impl InMemoryCinemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated with `cinemas`, keeping their ids.
    pub fn with_cinemas(cinemas: impl IntoIterator<Item = Cinema>) -> Self {
        let mut table = CinemaTable::default();
        for cinema in cinemas {
            table.next_id = table.next_id.max(cinema.id);
            table.rows.insert(cinema.id, cinema);
        }
        Self {
            table: RwLock::new(table),
            failure: FailureSwitch::default(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failure.set(failing);
    }

    /// Show `film_id` at `cinema_id`. Idempotent.
    pub async fn link_film(&self, film_id: i32, cinema_id: i32) -> Result<()> {
        self.failure.check("link film")?;
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&cinema_id) {
            return Err(AfishaError::NotFound(format!("cinema {cinema_id}")));
        }
        table.links.insert((film_id, cinema_id));
        Ok(())
    }
}

#[async_trait]
impl CinemaRepository for InMemoryCinemaRepository {
    async fn list(&self, filter: &CinemaFilter) -> Result<Vec<Cinema>> {
        self.failure.check("list cinemas")?;
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Cinema>> {
        self.failure.check("get cinema")?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, cinema: NewCinema) -> Result<Cinema> {
        self.failure.check("create cinema")?;
        let mut table = self.table.write().await;
        table.next_id += 1;
        let now = Utc::now();
        let row = Cinema {
            id: table.next_id,
            name: cinema.name,
            address: cinema.address,
            coordinates: cinema.coordinates,
            phone_number: cinema.phone_number,
            open_hours: cinema.open_hours,
            created_at: Some(now),
            updated_at: Some(now),
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        patch: CinemaPatch,
    ) -> Result<Option<Cinema>> {
        self.failure.check("update cinema")?;
        let mut table = self.table.write().await;
        let Some(cinema) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(cinema);
        cinema.updated_at = Some(Utc::now());
        Ok(Some(cinema.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        self.failure.check("delete cinema")?;
        let mut table = self.table.write().await;
        table.links.retain(|(_, cinema_id)| *cinema_id != id);
        Ok(table.rows.remove(&id).is_some())
    }

    async fn list_for_film(&self, film_id: i32) -> Result<Vec<Cinema>> {
        self.failure.check("list film cinemas")?;
        let table = self.table.read().await;
        Ok(table
            .links
            .iter()
            .filter(|(f, _)| *f == film_id)
            .filter_map(|(_, c)| table.rows.get(c).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_film(title: &str, external_id: Option<i64>) -> NewFilm {
        NewFilm {
            title: title.to_string(),
            kinopoisk_id: external_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn film_crud_round() {
        let repo = InMemoryFilmRepository::new();
        let created = repo.create(new_film("Сталкер", Some(43911))).await.unwrap();
        assert_eq!(created.id, 1);

        let found = repo.find_by_external_id(43911).await.unwrap().unwrap();
        assert_eq!(found.title, "Сталкер");

        let patch = FilmPatch {
            rating: Some(8.1),
            ..Default::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.rating, 8.1);
        assert_eq!(updated.title, "Сталкер");

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.update(created.id, FilmPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_external_id_is_rejected() {
        let repo = InMemoryFilmRepository::new();
        repo.create(new_film("A", Some(1))).await.unwrap();
        assert!(matches!(
            repo.create(new_film("B", Some(1))).await,
            Err(AfishaError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn failing_switch_surfaces_persistence_errors() {
        let repo = InMemoryCinemaRepository::new();
        repo.set_failing(true);
        assert!(matches!(
            repo.list(&CinemaFilter::all()).await,
            Err(AfishaError::Persistence(_))
        ));
        repo.set_failing(false);
        assert!(repo.list(&CinemaFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn links_resolve_to_cinemas() {
        let repo = InMemoryCinemaRepository::new();
        let cinema = repo
            .create(NewCinema {
                name: "Пионер".into(),
                address: "Москва, Кутузовский проспект, 21".into(),
                coordinates: "POINT(37.5425 55.7449)".into(),
                phone_number: None,
                open_hours: None,
            })
            .await
            .unwrap();

        repo.link_film(7, cinema.id).await.unwrap();
        repo.link_film(7, cinema.id).await.unwrap();

        let linked = repo.list_for_film(7).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert!(repo.list_for_film(8).await.unwrap().is_empty());
        assert!(repo.link_film(7, 99).await.is_err());
    }

    #[tokio::test]
    async fn city_filter_folds_cyrillic_case() {
        let repo = InMemoryCinemaRepository::new();
        repo.create(NewCinema {
            name: "Художественный".into(),
            address: "МОСКВА, Арбатская площадь, 14".into(),
            coordinates: "POINT(37.6010 55.7522)".into(),
            phone_number: None,
            open_hours: None,
        })
        .await
        .unwrap();

        let found = repo
            .list(&CinemaFilter::for_city(Some("Moscow")))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(
            repo.list(&CinemaFilter::for_city(Some("spb")))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
