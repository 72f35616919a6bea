#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, AtomicUsize, Ordering},
    },
};

use afisha_core::{
    cinemas::static_cinemas,
    database::{InMemoryCinemaRepository, InMemoryFilmRepository},
    model::{
        Cinema, Coordinates, GeocodeHit, Route, RouteProfile, RouteSource,
        TopListKind,
    },
    providers::{
        FilmProvider, Geocoder, ProviderError, RouteProvider,
        kinopoisk_types::{
            FactItem, FactsPayload, FilmDetailsPayload, GenreEntry, ReviewItem,
            ReviewsPayload, StaffEntry, TopFilmItem, TopFilmsPage,
        },
        nominatim::ReverseAddress,
    },
};
use afisha_server::{Adapters, AppState, create_app, infra::config::Config};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Scripted stand-in for the Kinopoisk API.
#[derive(Default)]
pub struct FakeFilmProvider {
    pages: HashMap<u32, Vec<i64>>,
    details: HashMap<i64, FilmDetailsPayload>,
    missing_key: bool,
    page_calls: AtomicUsize,
    last_review_page: AtomicU32,
}

impl FakeFilmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, ids: &[i64]) -> Self {
        self.pages.insert(page, ids.to_vec());
        self
    }

    pub fn with_details(mut self, id: i64, title: &str, rating: f64) -> Self {
        self.details.insert(
            id,
            FilmDetailsPayload {
                kinopoisk_id: Some(id),
                name_ru: Some(title.to_string()),
                description: Some(format!("{title}: описание")),
                rating_kinopoisk: Some(rating),
                year: Some(1979),
                film_length: Some(163),
                genres: vec![GenreEntry {
                    genre: "фантастика".into(),
                }],
                ..Default::default()
            },
        );
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.missing_key = true;
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn last_review_page(&self) -> u32 {
        self.last_review_page.load(Ordering::SeqCst)
    }

    fn check_key(&self) -> Result<(), ProviderError> {
        if self.missing_key {
            return Err(ProviderError::MissingApiKey("kinopoisk"));
        }
        Ok(())
    }
}

#[async_trait]
impl FilmProvider for FakeFilmProvider {
    async fn top_films_page(
        &self,
        _kind: TopListKind,
        page: u32,
    ) -> Result<TopFilmsPage, ProviderError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.check_key()?;
        let ids = self.pages.get(&page).ok_or(ProviderError::NotFound)?;
        Ok(TopFilmsPage {
            pages_count: Some(self.pages.len() as u32),
            films: ids
                .iter()
                .map(|id| TopFilmItem {
                    film_id: Some(*id),
                    name_ru: Some(format!("Фильм {id}")),
                    rating: Some(json!("7.5")),
                    genres: vec![GenreEntry {
                        genre: "драма".into(),
                    }],
                    ..Default::default()
                })
                .collect(),
        })
    }

    async fn film_details(
        &self,
        external_id: i64,
    ) -> Result<FilmDetailsPayload, ProviderError> {
        self.check_key()?;
        self.details
            .get(&external_id)
            .cloned()
            .ok_or(ProviderError::NotFound)
    }

    async fn film_staff(
        &self,
        _external_id: i64,
    ) -> Result<Vec<StaffEntry>, ProviderError> {
        Ok(vec![
            StaffEntry {
                staff_id: Some(1),
                name_ru: Some("Андрей Тарковский".into()),
                name_en: None,
                profession_key: Some("DIRECTOR".into()),
            },
            StaffEntry {
                staff_id: Some(2),
                name_ru: Some("Александр Кайдановский".into()),
                name_en: None,
                profession_key: Some("ACTOR".into()),
            },
        ])
    }

    async fn film_facts(
        &self,
        _external_id: i64,
    ) -> Result<FactsPayload, ProviderError> {
        self.check_key()?;
        Ok(FactsPayload {
            total: 1,
            items: vec![FactItem {
                text: "Фильм пересняли почти целиком.".into(),
                kind: Some("FACT".into()),
                spoiler: false,
            }],
        })
    }

    async fn film_reviews(
        &self,
        external_id: i64,
        page: u32,
    ) -> Result<ReviewsPayload, ProviderError> {
        self.check_key()?;
        self.last_review_page.store(page, Ordering::SeqCst);
        Ok(ReviewsPayload {
            total: 1,
            total_pages: 1,
            items: vec![ReviewItem {
                kinopoisk_id: Some(external_id * 10),
                kind: Some("POSITIVE".into()),
                author: Some("зритель".into()),
                description: Some("Шедевр".into()),
                positive_rating: 12,
                ..Default::default()
            }],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterBehaviour {
    Found,
    NoRoute,
    Fail,
}

pub struct FakeRouter {
    source: RouteSource,
    behaviour: RouterBehaviour,
    pub last_profile: Mutex<Option<RouteProfile>>,
}

impl FakeRouter {
    pub fn new(source: RouteSource, behaviour: RouterBehaviour) -> Self {
        Self {
            source,
            behaviour,
            last_profile: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RouteProvider for FakeRouter {
    fn source(&self) -> RouteSource {
        self.source
    }

    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        profile: RouteProfile,
    ) -> Result<Option<Route>, ProviderError> {
        *self.last_profile.lock().unwrap() = Some(profile);
        match self.behaviour {
            RouterBehaviour::Found => Ok(Some(Route {
                coordinates: vec![
                    [from.latitude, from.longitude],
                    [to.latitude, to.longitude],
                ],
                distance: Some(2500.0),
                duration: Some(420.0),
                source: self.source,
            })),
            RouterBehaviour::NoRoute => Ok(None),
            RouterBehaviour::Fail => {
                Err(ProviderError::ApiError("router is down".into()))
            }
        }
    }
}

#[derive(Default)]
pub struct FakeGeocoder {
    pub hit: Option<GeocodeHit>,
    pub address: Option<ReverseAddress>,
    pub fail: bool,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(
        &self,
        _query: &str,
    ) -> Result<Option<GeocodeHit>, ProviderError> {
        if self.fail {
            return Err(ProviderError::RateLimited);
        }
        Ok(self.hit.clone())
    }

    async fn reverse(
        &self,
        _at: Coordinates,
    ) -> Result<Option<ReverseAddress>, ProviderError> {
        if self.fail {
            return Err(ProviderError::RateLimited);
        }
        Ok(self.address.clone())
    }
}

/// Everything a test may want to swap out before building the app.
pub struct TestDeps {
    pub provider: FakeFilmProvider,
    pub cinemas: Vec<Cinema>,
    pub primary_router: Option<FakeRouter>,
    pub fallback_router: FakeRouter,
    pub geocoder: FakeGeocoder,
    pub config: Config,
}

impl Default for TestDeps {
    fn default() -> Self {
        let mut config = Config::default();
        config.kinopoisk.max_pages = Some(1);
        Self {
            provider: FakeFilmProvider::new(),
            cinemas: Vec::new(),
            primary_router: None,
            fallback_router: FakeRouter::new(
                RouteSource::Osrm,
                RouterBehaviour::Found,
            ),
            geocoder: FakeGeocoder::default(),
            config,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<FakeFilmProvider>,
    pub films: Arc<InMemoryFilmRepository>,
    pub cinemas: Arc<InMemoryCinemaRepository>,
    pub fallback_router: Arc<FakeRouter>,
}

impl TestDeps {
    pub fn with_provider(provider: FakeFilmProvider) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    pub fn build(self) -> TestApp {
        let provider = Arc::new(self.provider);
        let films = Arc::new(InMemoryFilmRepository::new());
        let cinemas = Arc::new(InMemoryCinemaRepository::with_cinemas(self.cinemas));
        let fallback_router = Arc::new(self.fallback_router);

        let adapters = Adapters {
            film_provider: provider.clone(),
            films: films.clone(),
            cinemas: cinemas.clone(),
            primary_router: self
                .primary_router
                .map(|r| Arc::new(r) as Arc<dyn RouteProvider>),
            fallback_router: fallback_router.clone(),
            geocoder: Arc::new(self.geocoder),
        };
        let state = AppState::new(Arc::new(self.config), adapters);

        TestApp {
            router: create_app(state),
            provider,
            films,
            cinemas,
            fallback_router,
        }
    }
}

pub fn build_test_app() -> TestApp {
    TestDeps::default().build()
}

/// App whose cinema store holds the static Moscow cinemas.
pub fn build_seeded_test_app() -> TestApp {
    TestDeps {
        cinemas: static_cinemas(),
        ..TestDeps::default()
    }
    .build()
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: &Value,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }
}

pub fn assert_error(body: &Value, status: StatusCode) {
    assert_eq!(body["error"]["status"], json!(status.as_u16()), "body: {body}");
    assert!(body["error"]["message"].is_string(), "body: {body}");
}
