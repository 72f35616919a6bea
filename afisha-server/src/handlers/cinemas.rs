use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use afisha_core::model::{Cinema, CinemaFilter, CinemaPatch, NewCinema};

use super::{MessageResponse, parse_id};
use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Serialize)]
pub struct CinemaResponse {
    pub message: &'static str,
    pub cinema: Cinema,
}

#[derive(Debug, Default, Deserialize)]
pub struct CinemaListQuery {
    pub city: Option<String>,
}

/// All cinemas, optionally narrowed to a city (`moscow` or `spb`). Serves
/// the static list when the store is empty or unreachable.
pub async fn list_cinemas_handler(
    State(state): State<AppState>,
    Query(query): Query<CinemaListQuery>,
) -> AppResult<Json<Vec<Cinema>>> {
    let filter = CinemaFilter::for_city(query.city.as_deref());
    let listing = state.cinemas.list(&filter).await;
    tracing::debug!(source = ?listing.source, count = listing.cinemas.len(), "cinemas listed");
    Ok(Json(listing.cinemas))
}

pub async fn create_cinema_handler(
    State(state): State<AppState>,
    body: Result<Json<NewCinema>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CinemaResponse>)> {
    let Json(cinema) = body?;
    let cinema = state.cinemas.create(cinema).await?;
    Ok((
        StatusCode::CREATED,
        Json(CinemaResponse {
            message: "Cinema created successfully",
            cinema,
        }),
    ))
}

pub async fn get_cinema_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Cinema>> {
    let id = parse_id::<i32>(&id, "cinema")?;
    Ok(Json(state.cinemas.get(id).await?))
}

pub async fn update_cinema_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CinemaPatch>, JsonRejection>,
) -> AppResult<Json<CinemaResponse>> {
    let id = parse_id::<i32>(&id, "cinema")?;
    let Json(patch) = body?;
    let cinema = state.cinemas.update(id, patch).await?;
    Ok(Json(CinemaResponse {
        message: "Cinema updated successfully",
        cinema,
    }))
}

pub async fn delete_cinema_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id::<i32>(&id, "cinema")?;
    state.cinemas.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Cinema deleted successfully",
    }))
}
