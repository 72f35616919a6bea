use std::sync::Arc;

use afisha_model::{Coordinates, Route, RouteProfile};
use tracing::{info, warn};

use crate::{
    error::{AfishaError, Result},
    providers::RouteProvider,
};

/// A validated route query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub from: Coordinates,
    pub to: Coordinates,
    pub profile: RouteProfile,
}

impl RouteRequest {
    /// Parse raw query values. Every coordinate must be present and a
    /// finite number.
    pub fn parse(
        from_lat: Option<&str>,
        from_lon: Option<&str>,
        to_lat: Option<&str>,
        to_lon: Option<&str>,
        profile: Option<&str>,
    ) -> Result<Self> {
        let from = Coordinates::new(
            finite("fromLat", from_lat)?,
            finite("fromLon", from_lon)?,
        );
        let to =
            Coordinates::new(finite("toLat", to_lat)?, finite("toLon", to_lon)?);
        let profile = profile
            .and_then(|p| p.parse::<RouteProfile>().ok())
            .unwrap_or_default();

        Ok(Self { from, to, profile })
    }
}

fn finite(name: &str, raw: Option<&str>) -> Result<f64> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AfishaError::InvalidInput(format!(
                "{name} must be a finite number"
            ))
        })
}

/// Tries the primary provider when one is configured, then the fallback.
#[derive(Clone)]
pub struct RoutePlanner {
    primary: Option<Arc<dyn RouteProvider>>,
    fallback: Arc<dyn RouteProvider>,
}

impl std::fmt::Debug for RoutePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("primary", &self.primary.as_ref().map(|p| p.source()))
            .field("fallback", &self.fallback.source())
            .finish()
    }
}

impl RoutePlanner {
    pub fn new(
        primary: Option<Arc<dyn RouteProvider>>,
        fallback: Arc<dyn RouteProvider>,
    ) -> Self {
        Self { primary, fallback }
    }

    pub async fn plan(&self, request: RouteRequest) -> Result<Route> {
        let RouteRequest { from, to, profile } = request;

        if let Some(primary) = &self.primary {
            match primary.route(from, to, profile).await {
                Ok(Some(route)) => return Ok(route),
                Ok(None) => {
                    info!(source = ?primary.source(), "primary router found no route, falling back");
                }
                Err(e) => {
                    warn!(source = ?primary.source(), error = %e, "primary router failed, falling back");
                }
            }
        }

        match self.fallback.route(from, to, profile).await {
            Ok(Some(route)) => Ok(route),
            Ok(None) => Err(AfishaError::UpstreamUnavailable(
                "no route found between the given points".to_string(),
            )),
            Err(e) => Err(AfishaError::UpstreamUnavailable(format!(
                "routing failed: {e}"
            ))),
        }
    }
}
