use std::fmt;

use afisha_model::{Coordinates, GeocodeHit};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{ProviderError, http};

pub const NOMINATIM_DEFAULT_BASE: &str = "https://nominatim.openstreetmap.org";

/// Address fields returned by a reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReverseAddress {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a free-form address, if any.
    async fn search(
        &self,
        query: &str,
    ) -> Result<Option<GeocodeHit>, ProviderError>;

    async fn reverse(
        &self,
        at: Coordinates,
    ) -> Result<Option<ReverseAddress>, ProviderError>;
}

pub struct NominatimGeocoder {
    http: Client,
    base: Url,
    language: String,
}

impl fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("base", &self.base.as_str())
            .field("language", &self.language)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReversePayload {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<AddressParts>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AddressParts {
    #[serde(default)]
    road: Option<String>,
    #[serde(default)]
    house_number: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(
        http: Client,
        base_url: &str,
        language: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            base: http::parse_base_url(base_url)?,
            language: language.into(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(
        &self,
        query: &str,
    ) -> Result<Option<GeocodeHit>, ProviderError> {
        let url = http::join(&self.base, "search")?;
        let request = self.http.get(url).query(&[
            ("format", "json"),
            ("q", query),
            ("limit", "1"),
            ("accept-language", self.language.as_str()),
        ]);

        let hits: Vec<SearchHit> = http::send_json(request).await?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let latitude = hit.lat.trim().parse::<f64>().map_err(|e| {
            ProviderError::ParseError(format!("latitude {}: {e}", hit.lat))
        })?;
        let longitude = hit.lon.trim().parse::<f64>().map_err(|e| {
            ProviderError::ParseError(format!("longitude {}: {e}", hit.lon))
        })?;

        Ok(Some(GeocodeHit {
            coordinates: Coordinates::new(latitude, longitude),
            display_name: hit.display_name,
        }))
    }

    async fn reverse(
        &self,
        at: Coordinates,
    ) -> Result<Option<ReverseAddress>, ProviderError> {
        let url = http::join(&self.base, "reverse")?;
        let request = self.http.get(url).query(&[
            ("format", "json".to_string()),
            ("lat", at.latitude.to_string()),
            ("lon", at.longitude.to_string()),
            ("accept-language", self.language.clone()),
        ]);

        let payload: ReversePayload = http::send_json(request).await?;
        if payload.error.is_some() {
            return Ok(None);
        }

        let parts = payload.address.unwrap_or_default();
        Ok(Some(ReverseAddress {
            display_name: payload.display_name,
            road: parts.road,
            house_number: parts.house_number,
            city: parts.city,
            town: parts.town,
            village: parts.village,
        }))
    }
}
