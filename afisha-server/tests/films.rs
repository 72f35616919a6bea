use axum::http::StatusCode;
use serde_json::json;

#[path = "support/mod.rs"]
mod support;

use support::{assert_error, build_seeded_test_app, build_test_app};

#[tokio::test]
async fn health_probe_reports_working() {
    let app = build_test_app();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "WORKING" }));
}

#[tokio::test]
async fn film_crud_round_trip() {
    let app = build_test_app();

    let (status, created) = app
        .send_json(
            "POST",
            "/api/film/create",
            &json!({
                "title": "  Солярис  ",
                "rating": 8.0,
                "genres": ["фантастика", "драма"],
                "releaseDate": "1972-03-20"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Film created successfully");
    assert_eq!(created["film"]["title"], "Солярис");
    let id = created["film"]["id"].as_i64().unwrap();

    let (status, list) = app.get("/api/film/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = app
        .send_json(
            "PATCH",
            &format!("/api/film/{id}/update"),
            &json!({ "director": "Андрей Тарковский" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Film updated successfully");
    assert_eq!(updated["film"]["director"], "Андрей Тарковский");
    assert_eq!(updated["film"]["rating"], 8.0);

    let (status, fetched) = app.get(&format!("/api/film/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["genres"], json!(["фантастика", "драма"]));

    let request = axum::http::Request::delete(format!("/api/film/{id}/delete"))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, deleted) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Film deleted successfully");

    let (status, body) = app.get(&format!("/api/film/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, status);
}

#[tokio::test]
async fn absent_films_are_not_found() {
    let app = build_test_app();

    let (status, _) = app.get("/api/film/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send_json("PATCH", "/api/film/42/update", &json!({ "rating": 5.0 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, status);

    let request = axum::http::Request::delete("/api/film/42/delete")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_film_payloads_are_bad_requests() {
    let app = build_test_app();

    let (status, body) = app
        .send_json("POST", "/api/film/create", &json!({ "title": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, status);

    let (status, body) = app
        .send_json(
            "POST",
            "/api/film/create",
            &json!({ "title": "Зеркало", "rating": -1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, status);

    let (status, body) = app
        .send_json("POST", "/api/film/create", &json!({ "rating": "high" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, status);

    let (status, body) = app.get("/api/film/seven").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, status);
}

#[tokio::test]
async fn film_cinemas_fall_back_to_static_list() {
    let app = build_test_app();

    let (status, body) = app.get("/api/film/1/cinemas").await;

    assert_eq!(status, StatusCode::OK);
    let cinemas = body.as_array().unwrap();
    assert_eq!(cinemas.len(), 5);
    assert!(cinemas[0]["coordinates"].as_str().unwrap().starts_with("POINT("));
}

#[tokio::test]
async fn film_cinemas_use_linked_rows_when_present() {
    let app = build_seeded_test_app();
    app.cinemas.link_film(3, 4).await.unwrap();

    let (status, body) = app.get("/api/film/3/cinemas").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4]);
}

#[tokio::test]
async fn locations_are_ranked_by_distance() {
    let app = build_test_app();

    // Near Aviapark in the north-west of Moscow.
    let (status, body) = app
        .get("/api/film/1/locations?lat=55.7905&lon=37.5310")
        .await;

    assert_eq!(status, StatusCode::OK);
    let ranked = body.as_array().unwrap();
    assert_eq!(ranked.len(), 5);
    let distances: Vec<f64> = ranked
        .iter()
        .map(|l| l["distanceKm"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(ranked[0]["location"]["latitude"].is_number());
}

#[tokio::test]
async fn locations_reject_half_or_bad_coordinates() {
    let app = build_test_app();

    for uri in [
        "/api/film/1/locations?lat=55.7",
        "/api/film/1/locations?lat=north&lon=37.6",
        "/api/film/1/locations?lat=155&lon=37.6",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_error(&body, status);
    }
}
