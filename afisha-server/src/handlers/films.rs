use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use afisha_core::model::{Cinema, CinemaLocation, Coordinates, Film, FilmPatch, NewFilm};

use super::{MessageResponse, parse_coordinate, parse_id};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Serialize)]
pub struct FilmResponse {
    pub message: &'static str,
    pub film: Film,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationsQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub q: Option<String>,
}

pub async fn list_films_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.films.list().await?))
}

pub async fn create_film_handler(
    State(state): State<AppState>,
    body: Result<Json<NewFilm>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FilmResponse>)> {
    let Json(film) = body?;
    let film = state.films.create(film).await?;
    Ok((
        StatusCode::CREATED,
        Json(FilmResponse {
            message: "Film created successfully",
            film,
        }),
    ))
}

pub async fn get_film_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Film>> {
    let id = parse_id::<i32>(&id, "film")?;
    Ok(Json(state.films.get(id).await?))
}

pub async fn update_film_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FilmPatch>, JsonRejection>,
) -> AppResult<Json<FilmResponse>> {
    let id = parse_id::<i32>(&id, "film")?;
    let Json(patch) = body?;
    let film = state.films.update(id, patch).await?;
    Ok(Json(FilmResponse {
        message: "Film updated successfully",
        film,
    }))
}

pub async fn delete_film_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id::<i32>(&id, "film")?;
    state.films.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Film deleted successfully",
    }))
}

/// Cinemas showing a film. Falls back to the static cinema list when the
/// store has none or is unreachable.
pub async fn film_cinemas_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Cinema>>> {
    let id = parse_id::<i32>(&id, "film")?;
    Ok(Json(state.cinemas.for_film(id).await.cinemas))
}

/// Cinemas showing a film, nearest first when `lat`/`lon` are given, and
/// narrowed by `q` against name and address.
pub async fn film_locations_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LocationsQuery>,
) -> AppResult<Json<Vec<CinemaLocation>>> {
    let id = parse_id::<i32>(&id, "film")?;

    let origin = match (
        parse_coordinate(query.lat.as_deref(), "lat")?,
        parse_coordinate(query.lon.as_deref(), "lon")?,
    ) {
        (Some(lat), Some(lon)) => {
            let point = Coordinates::new(lat, lon);
            if !point.is_valid() {
                return Err(AppError::bad_request("lat/lon out of range"));
            }
            Some(point)
        }
        (None, None) => None,
        _ => {
            return Err(AppError::bad_request(
                "lat and lon must be given together",
            ));
        }
    };

    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    Ok(Json(state.cinemas.locations(id, origin, search).await))
}
