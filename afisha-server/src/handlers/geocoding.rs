use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use afisha_core::model::{Coordinates, GeocodeHit, ResolvedAddress};

use super::parse_coordinate;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReverseQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<GeocodeHit>> {
    let q = query.q.unwrap_or_default();
    Ok(Json(state.geocoding.locate(&q).await?))
}

/// Human-readable label for a point. Never fails on upstream errors; the
/// label degrades to the formatted coordinates and `fallback` is set.
pub async fn reverse_handler(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> AppResult<Json<ResolvedAddress>> {
    let lat = parse_coordinate(query.lat.as_deref(), "lat")?;
    let lon = parse_coordinate(query.lon.as_deref(), "lon")?;
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(AppError::bad_request("lat and lon are required"));
    };

    let point = Coordinates::new(lat, lon);
    if !point.is_valid() {
        return Err(AppError::bad_request("lat/lon out of range"));
    }
    Ok(Json(state.geocoding.describe(point).await))
}
