#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API key for {0} is not configured")]
    MissingApiKey(&'static str),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// Map a non-success upstream status onto the provider taxonomy.
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => ProviderError::InvalidApiKey,
            404 => ProviderError::NotFound,
            429 => ProviderError::RateLimited,
            _ => ProviderError::ApiError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::error::AfishaError;

    #[test]
    fn statuses_map_to_provider_and_domain_errors() {
        let cases: [(u16, fn(&ProviderError) -> bool, fn(&AfishaError) -> bool); 6] = [
            (
                401,
                |e| matches!(e, ProviderError::InvalidApiKey),
                |e| matches!(e, AfishaError::Configuration(_)),
            ),
            (
                403,
                |e| matches!(e, ProviderError::InvalidApiKey),
                |e| matches!(e, AfishaError::Configuration(_)),
            ),
            (
                404,
                |e| matches!(e, ProviderError::NotFound),
                |e| matches!(e, AfishaError::NotFound(_)),
            ),
            (
                429,
                |e| matches!(e, ProviderError::RateLimited),
                |e| matches!(e, AfishaError::UpstreamUnavailable(_)),
            ),
            (
                500,
                |e| matches!(e, ProviderError::ApiError(_)),
                |e| matches!(e, AfishaError::UpstreamUnavailable(_)),
            ),
            (
                502,
                |e| matches!(e, ProviderError::ApiError(_)),
                |e| matches!(e, AfishaError::UpstreamUnavailable(_)),
            ),
        ];

        for (code, provider_kind, domain_kind) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            let err = ProviderError::from_status(status, format!("status {code}"));
            assert!(provider_kind(&err), "{code}: {err:?}");

            let domain = AfishaError::from(err);
            assert!(domain_kind(&domain), "{code}: {domain:?}");
        }
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let domain = AfishaError::from(ProviderError::MissingApiKey("kinopoisk"));
        assert!(matches!(domain, AfishaError::Configuration(_)));
    }
}
