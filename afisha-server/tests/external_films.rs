use std::collections::HashSet;

use afisha_core::database::FilmRepository;
use axum::http::StatusCode;
use serde_json::Value;

#[path = "support/mod.rs"]
mod support;

use support::{FakeFilmProvider, TestDeps, assert_error};

fn ids(body: &Value) -> Vec<i64> {
    body["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["externalId"].as_i64().expect("externalId"))
        .collect()
}

#[tokio::test]
async fn random_films_skip_excluded_ids() {
    let app = TestDeps::with_provider(
        FakeFilmProvider::new().with_page(1, &[10, 11, 12, 20, 21]),
    )
    .build();

    let (status, body) = app
        .get("/api/film/external/random?take=3&exclude=10,20")
        .await;

    assert_eq!(status, StatusCode::OK);
    let got: HashSet<i64> = ids(&body).into_iter().collect();
    assert_eq!(got, HashSet::from([11, 12, 21]));
}

#[tokio::test]
async fn random_films_return_short_result_when_list_runs_out() {
    let app =
        TestDeps::with_provider(FakeFilmProvider::new().with_page(1, &[1, 2]))
            .build();

    let (status, body) = app.get("/api/film/external/random?take=5").await;

    assert_eq!(status, StatusCode::OK);
    let mut got = ids(&body);
    got.sort_unstable();
    assert_eq!(got, vec![1, 2]);
}

#[tokio::test]
async fn random_films_have_summary_shape() {
    let app =
        TestDeps::with_provider(FakeFilmProvider::new().with_page(1, &[7]))
            .build();

    let (_, body) = app.get("/api/film/external/random?take=1").await;
    let item = &body["items"][0];

    assert_eq!(item["externalId"], 7);
    assert_eq!(item["title"], "Фильм 7");
    assert_eq!(item["rating"], 7.5);
    assert_eq!(item["genres"][0], "драма");
}

#[tokio::test]
async fn random_films_reuse_cached_pages() {
    let app = TestDeps::with_provider(
        FakeFilmProvider::new().with_page(1, &[1, 2, 3]),
    )
    .build();

    for _ in 0..3 {
        let (status, _) = app.get("/api/film/external/random?take=2").await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.provider.page_calls(), 1);
}

#[tokio::test]
async fn sampled_films_are_saved_once() {
    let app = TestDeps::with_provider(
        FakeFilmProvider::new().with_page(1, &[5, 6]),
    )
    .build();

    app.get("/api/film/external/random?take=2").await;
    app.get("/api/film/external/random?take=2").await;

    let stored = app.films.list().await.unwrap();
    let mut external: Vec<i64> =
        stored.iter().filter_map(|f| f.kinopoisk_id).collect();
    external.sort_unstable();
    assert_eq!(external, vec![5, 6]);
}

#[tokio::test]
async fn random_films_without_api_key_is_a_server_error() {
    let app = TestDeps::with_provider(
        FakeFilmProvider::new().with_page(1, &[1]).without_api_key(),
    )
    .build();

    let (status, body) = app.get("/api/film/external/random").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error(&body, status);
}

#[tokio::test]
async fn random_films_upstream_failure_is_bad_gateway() {
    // Page 1 is not scripted, so the first fetch fails.
    let app = TestDeps::with_provider(FakeFilmProvider::new()).build();

    let (status, body) = app.get("/api/film/external/random?take=3").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_error(&body, status);
}

#[tokio::test]
async fn details_are_reconciled_into_catalogue() {
    let app = TestDeps::with_provider(
        FakeFilmProvider::new().with_details(43911, "Сталкер", 8.1),
    )
    .build();

    let (status, body) = app.get("/api/film/external/43911").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["externalId"], 43911);
    assert_eq!(body["title"], "Сталкер");
    assert_eq!(body["director"], "Андрей Тарковский");
    assert_eq!(body["actors"][0], "Александр Кайдановский");
    assert_eq!(body["releaseDate"], "1979-01-01");
    assert_eq!(body["localId"], 1);
    assert_eq!(body["persistence"]["status"], "created");

    let (_, again) = app.get("/api/film/external/43911").await;
    assert_eq!(again["persistence"]["status"], "unchanged");
    assert_eq!(again["localId"], 1);

    let (status, local) = app.get("/api/film/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(local["kinopoiskId"], 43911);
}

#[tokio::test]
async fn unknown_upstream_film_is_not_found() {
    let app = TestDeps::with_provider(FakeFilmProvider::new()).build();

    let (status, body) = app.get("/api/film/external/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, status);
}

#[tokio::test]
async fn malformed_or_non_positive_ids_are_bad_requests() {
    let app = TestDeps::default().build();

    for uri in [
        "/api/film/external/abc",
        "/api/film/external/0",
        "/api/film/external/-4/facts",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_error(&body, status);
    }
}

#[tokio::test]
async fn facts_and_reviews_pass_through() {
    let app = TestDeps::default().build();

    let (status, facts) = app.get("/api/film/external/301/facts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(facts["total"], 1);
    assert_eq!(facts["items"][0]["spoiler"], false);

    let (status, reviews) =
        app.get("/api/film/external/301/reviews?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews["totalPages"], 1);
    assert_eq!(reviews["items"][0]["id"], 3010);
    assert_eq!(app.provider.last_review_page(), 2);

    app.get("/api/film/external/301/reviews?page=zero").await;
    assert_eq!(app.provider.last_review_page(), 1);
}
