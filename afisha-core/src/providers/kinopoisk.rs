use std::fmt;

use afisha_model::TopListKind;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{
    ProviderError, http,
    kinopoisk_types::{
        FactsPayload, FilmDetailsPayload, ReviewsPayload, StaffEntry,
        TopFilmsPage,
    },
};

pub const KINOPOISK_DEFAULT_BASE: &str =
    "https://kinopoiskapiunofficial.tech/api";
const API_KEY_HEADER: &str = "X-API-KEY";

/// Upstream film-data provider.
#[async_trait]
pub trait FilmProvider: Send + Sync {
    async fn top_films_page(
        &self,
        kind: TopListKind,
        page: u32,
    ) -> Result<TopFilmsPage, ProviderError>;

    async fn film_details(
        &self,
        external_id: i64,
    ) -> Result<FilmDetailsPayload, ProviderError>;

    async fn film_staff(
        &self,
        external_id: i64,
    ) -> Result<Vec<StaffEntry>, ProviderError>;

    async fn film_facts(
        &self,
        external_id: i64,
    ) -> Result<FactsPayload, ProviderError>;

    async fn film_reviews(
        &self,
        external_id: i64,
        page: u32,
    ) -> Result<ReviewsPayload, ProviderError>;
}

pub struct KinopoiskProvider {
    http: Client,
    base: Url,
    api_key: Option<String>,
}

impl fmt::Debug for KinopoiskProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KinopoiskProvider")
            .field("base", &self.base.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl KinopoiskProvider {
    /// A blank key is treated as absent; calls then fail with
    /// [`ProviderError::MissingApiKey`].
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            base: http::parse_base_url(base_url)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_json<Q, T>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ProviderError>
    where
        Q: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("kinopoisk"))?;
        let url = http::join(&self.base, path)?;

        debug!(url = %url, "kinopoisk request");

        let request = self
            .http
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);

        http::send_json(request).await
    }
}

#[async_trait]
impl FilmProvider for KinopoiskProvider {
    async fn top_films_page(
        &self,
        kind: TopListKind,
        page: u32,
    ) -> Result<TopFilmsPage, ProviderError> {
        self.get_json(
            "v2.2/films/top",
            &[("type", kind.as_str().to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }

    async fn film_details(
        &self,
        external_id: i64,
    ) -> Result<FilmDetailsPayload, ProviderError> {
        self.get_json(&format!("v2.2/films/{external_id}"), &[] as &[(&str, &str)])
            .await
    }

    async fn film_staff(
        &self,
        external_id: i64,
    ) -> Result<Vec<StaffEntry>, ProviderError> {
        self.get_json("v1/staff", &[("filmId", external_id)]).await
    }

    async fn film_facts(
        &self,
        external_id: i64,
    ) -> Result<FactsPayload, ProviderError> {
        self.get_json(
            &format!("v2.2/films/{external_id}/facts"),
            &[] as &[(&str, &str)],
        )
        .await
    }

    async fn film_reviews(
        &self,
        external_id: i64,
        page: u32,
    ) -> Result<ReviewsPayload, ProviderError> {
        self.get_json(
            "v1/reviews",
            &[("filmId", external_id), ("page", i64::from(page.max(1)))],
        )
        .await
    }
}
