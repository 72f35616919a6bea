use std::fmt;

use afisha_model::{Coordinates, Route, RouteProfile, RouteSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{ProviderError, http};

pub const GRAPHHOPPER_DEFAULT_BASE: &str = "https://graphhopper.com/api/1";
pub const OSRM_DEFAULT_BASE: &str = "https://router.project-osrm.org";

#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn source(&self) -> RouteSource;

    /// `Ok(None)` when the provider answered but found no route.
    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        profile: RouteProfile,
    ) -> Result<Option<Route>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct LineString {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl LineString {
    /// GeoJSON is `[lon, lat]`; routes are exposed as `[lat, lon]`.
    fn into_lat_lon(self) -> Vec<[f64; 2]> {
        self.coordinates
            .into_iter()
            .map(|[lon, lat]| [lat, lon])
            .collect()
    }
}

/// A route without a polyline counts as no route.
fn polyline(line: Option<LineString>) -> Option<Vec<[f64; 2]>> {
    line.map(LineString::into_lat_lon)
        .filter(|coordinates| !coordinates.is_empty())
}

#[derive(Debug, Deserialize)]
struct GraphHopperResponse {
    #[serde(default)]
    paths: Vec<GraphHopperPath>,
}

#[derive(Debug, Deserialize)]
struct GraphHopperPath {
    #[serde(default)]
    distance: Option<f64>,
    /// Milliseconds.
    #[serde(default)]
    time: Option<f64>,
    points: Option<LineString>,
}

pub struct GraphHopperRouter {
    http: Client,
    base: Url,
    api_key: String,
    locale: String,
}

impl fmt::Debug for GraphHopperRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphHopperRouter")
            .field("base", &self.base.as_str())
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl GraphHopperRouter {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: String,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("graphhopper"));
        }
        Ok(Self {
            http,
            base: http::parse_base_url(base_url)?,
            api_key,
            locale: "ru".to_string(),
        })
    }
}

#[async_trait]
impl RouteProvider for GraphHopperRouter {
    fn source(&self) -> RouteSource {
        RouteSource::GraphHopper
    }

    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        _profile: RouteProfile,
    ) -> Result<Option<Route>, ProviderError> {
        // GraphHopper always routes by car; the profile only picks the OSRM
        // network.
        let url = http::join(&self.base, "route")?;
        let request = self.http.get(url).query(&[
            ("point", format!("{},{}", from.latitude, from.longitude)),
            ("point", format!("{},{}", to.latitude, to.longitude)),
            ("vehicle", "car".to_string()),
            ("locale", self.locale.clone()),
            ("points_encoded", "false".to_string()),
            ("key", self.api_key.clone()),
        ]);

        let response: GraphHopperResponse = http::send_json(request).await?;
        let Some(path) = response.paths.into_iter().next() else {
            return Ok(None);
        };

        let Some(coordinates) = polyline(path.points) else {
            debug!("graphhopper path has no points");
            return Ok(None);
        };

        debug!(distance = ?path.distance, "graphhopper route resolved");

        Ok(Some(Route {
            coordinates,
            distance: path.distance,
            duration: path.time.map(|ms| ms / 1000.0),
            source: RouteSource::GraphHopper,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
    geometry: Option<LineString>,
}

#[derive(Debug)]
pub struct OsrmRouter {
    http: Client,
    base: Url,
}

impl OsrmRouter {
    pub fn new(http: Client, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            base: http::parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl RouteProvider for OsrmRouter {
    fn source(&self) -> RouteSource {
        RouteSource::Osrm
    }

    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        profile: RouteProfile,
    ) -> Result<Option<Route>, ProviderError> {
        let path = format!(
            "route/v1/{}/{},{};{},{}",
            profile.as_str(),
            from.longitude,
            from.latitude,
            to.longitude,
            to.latitude
        );
        let url = http::join(&self.base, &path)?;
        let request = self
            .http
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("language", "ru"),
            ]);

        let response: OsrmResponse = http::send_json(request).await?;
        if response.code.as_deref().is_some_and(|c| c != "Ok") {
            return Ok(None);
        }
        let Some(route) = response.routes.into_iter().next() else {
            return Ok(None);
        };

        let Some(coordinates) = polyline(route.geometry) else {
            return Ok(None);
        };

        Ok(Some(Route {
            coordinates,
            distance: route.distance,
            duration: route.duration,
            source: RouteSource::Osrm,
        }))
    }
}
