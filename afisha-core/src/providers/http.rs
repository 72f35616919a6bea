use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::ProviderError;

pub const DEFAULT_USER_AGENT: &str =
    concat!("AfishaApp/", env!("CARGO_PKG_VERSION"));

/// Shared client for every upstream call. The timeout is the only deadline
/// applied to upstream requests.
pub fn build_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(ProviderError::from)
}

/// Parse a base URL so that relative joins append to its path instead of
/// replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ProviderError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| ProviderError::ParseError(format!("invalid base url {raw}: {e}")))
}

pub fn join(base: &Url, path: &str) -> Result<Url, ProviderError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ProviderError::ParseError(format!("invalid path {path}: {e}")))
}

/// Send a request and decode a JSON body, mapping non-success statuses.
pub async fn send_json<T>(request: RequestBuilder) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;

    let status = response.status();
    if status.is_success() {
        let body = response.bytes().await?;
        return serde_json::from_slice::<T>(&body)
            .map_err(|e| ProviderError::ParseError(e.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let message = if text.trim().is_empty() {
        format!("upstream request failed with status {status}")
    } else {
        format!("upstream request failed with status {status}: {}", text.trim())
    };

    Err(ProviderError::from_status(status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_its_path_when_joined() {
        let base =
            parse_base_url("https://kinopoiskapiunofficial.tech/api").unwrap();
        let url = join(&base, "v2.2/films/top").unwrap();
        assert_eq!(
            url.as_str(),
            "https://kinopoiskapiunofficial.tech/api/v2.2/films/top"
        );

        let url = join(&base, "/v1/staff").unwrap();
        assert_eq!(
            url.as_str(),
            "https://kinopoiskapiunofficial.tech/api/v1/staff"
        );
    }

    #[test]
    fn invalid_base_url_is_a_parse_error() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ProviderError::ParseError(_))
        ));
    }
}
