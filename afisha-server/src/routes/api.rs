use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::{
    AppState,
    handlers::{cinemas, external_films, films, geocoding, routing},
};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .merge(create_film_routes())
        .merge(create_cinema_routes())
        .route("/routing/route", get(routing::route_handler))
        .route("/geocode/search", get(geocoding::search_handler))
        .route("/geocode/reverse", get(geocoding::reverse_handler))
}

fn create_film_routes() -> Router<AppState> {
    Router::new()
        // Upstream catalogue
        .route(
            "/film/external/random",
            get(external_films::random_films_handler),
        )
        .route(
            "/film/external/{id}",
            get(external_films::film_details_handler),
        )
        .route(
            "/film/external/{id}/facts",
            get(external_films::film_facts_handler),
        )
        .route(
            "/film/external/{id}/reviews",
            get(external_films::film_reviews_handler),
        )
        // Local catalogue
        .route("/film", get(films::list_films_handler))
        .route("/film/", get(films::list_films_handler))
        .route("/film/create", post(films::create_film_handler))
        .route("/film/{id}", get(films::get_film_handler))
        .route("/film/{id}/update", patch(films::update_film_handler))
        .route("/film/{id}/delete", delete(films::delete_film_handler))
        .route("/film/{id}/cinemas", get(films::film_cinemas_handler))
        .route("/film/{id}/locations", get(films::film_locations_handler))
}

fn create_cinema_routes() -> Router<AppState> {
    Router::new()
        .route("/cinema", get(cinemas::list_cinemas_handler))
        .route("/cinema/", get(cinemas::list_cinemas_handler))
        .route("/cinema/create", post(cinemas::create_cinema_handler))
        .route("/cinema/{id}", get(cinemas::get_cinema_handler))
        .route("/cinema/{id}/update", patch(cinemas::update_cinema_handler))
        .route("/cinema/{id}/delete", delete(cinemas::delete_cinema_handler))
}
