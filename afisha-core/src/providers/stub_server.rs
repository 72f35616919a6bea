//! Local HTTP upstream for adapter tests. Answers every request with one
//! canned status and JSON body and records what it was asked.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Value,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubServer {
    pub base_url: String,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(answer).with_state(Canned {
            status,
            body,
            log: log.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            log,
        }
    }

    pub async fn ok(body: Value) -> Self {
        Self::start(StatusCode::OK, body).await
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.log
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("stub server received no request")
    }
}

async fn answer(
    State(canned): State<Canned>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let query = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    canned.log.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
        headers,
    });
    (canned.status, Json(canned.body))
}
