use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use afisha_core::{geo::RouteRequest, model::Route};

use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub from_lat: Option<String>,
    pub from_lon: Option<String>,
    pub to_lat: Option<String>,
    pub to_lon: Option<String>,
    pub profile: Option<String>,
}

/// Route between two points. GraphHopper answers when configured, OSRM
/// otherwise or when GraphHopper fails.
///
/// # Response
///
/// ```json
/// {
///   "coordinates": [[55.7558, 37.6173], [55.7601, 37.6189]],
///   "distance": 1532.4,
///   "duration": 311.0,
///   "source": "graphhopper"
/// }
/// ```
pub async fn route_handler(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> AppResult<Json<Route>> {
    let request = RouteRequest::parse(
        query.from_lat.as_deref(),
        query.from_lon.as_deref(),
        query.to_lat.as_deref(),
        query.to_lon.as_deref(),
        query.profile.as_deref(),
    )?;
    Ok(Json(state.routes.plan(request).await?))
}
