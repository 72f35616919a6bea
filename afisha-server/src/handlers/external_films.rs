use axum::{
    Json,
    extract::{Path, Query, State},
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;

use afisha_core::{
    catalog::{RngSource, SampleRequest},
    model::{FactsPage, ReconciledFilm, ReviewsPage, SampleResult},
};

use super::parse_id;
use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct RandomFilmsQuery {
    pub take: Option<String>,
    pub exclude: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    pub page: Option<String>,
}

/// Random films from the configured top list
///
/// # Query
///
/// - `take`: how many films to return, default 10, capped at 30
/// - `exclude`: comma separated external ids the client has already seen
///
/// # Response
///
/// ```json
/// {
///   "items": [
///     {
///       "externalId": 326,
///       "title": "Побег из Шоушенка",
///       "posterUrl": "https://kinopoiskapiunofficial.tech/images/posters/kp_small/326.jpg",
///       "rating": 9.1,
///       "genres": ["драма"]
///     }
///   ]
/// }
/// ```
///
/// Fewer than `take` items are returned when the top list runs out of
/// films that are not excluded. Films seen for the first time are saved to
/// the local catalogue before responding; a failed save does not fail the
/// request.
pub async fn random_films_handler(
    State(state): State<AppState>,
    Query(query): Query<RandomFilmsQuery>,
) -> AppResult<Json<SampleResult>> {
    let request =
        SampleRequest::from_query(query.take.as_deref(), query.exclude.as_deref());
    let mut rng = RngSource(StdRng::from_os_rng());
    let result = state.external.sample(&request, &mut rng).await?;
    Ok(Json(result))
}

/// Full details of an upstream film, reconciled into the local catalogue.
/// The response carries `localId` and `persistence` next to the film fields.
pub async fn film_details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReconciledFilm>> {
    let external_id = parse_id::<i64>(&id, "film")?;
    Ok(Json(state.external.details(external_id).await?))
}

pub async fn film_facts_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FactsPage>> {
    let external_id = parse_id::<i64>(&id, "film")?;
    Ok(Json(state.external.facts(external_id).await?))
}

pub async fn film_reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReviewsQuery>,
) -> AppResult<Json<ReviewsPage>> {
    let external_id = parse_id::<i64>(&id, "film")?;
    // Unparseable pages fall back to the first one.
    let page = query
        .page
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(1);
    Ok(Json(state.external.reviews(external_id, page).await?))
}
