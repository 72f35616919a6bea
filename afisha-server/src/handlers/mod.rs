pub mod cinemas;
pub mod external_films;
pub mod films;
pub mod geocoding;
pub mod health;
pub mod routing;

use std::str::FromStr;

use serde::Serialize;

use crate::infra::errors::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Path ids arrive as raw strings so that malformed ones get the JSON
/// error envelope instead of axum's plain-text rejection.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid {what} id: {raw:?}")))
}

pub(crate) fn parse_coordinate(raw: Option<&str>, name: &str) -> AppResult<Option<f64>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| {
                AppError::bad_request(format!("{name} must be a finite number"))
            }),
    }
}
