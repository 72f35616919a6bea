use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("SAMPLER_RETRY_BUDGET must be at least 1")]
    ZeroRetryBudget,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    if config.kinopoisk.retry_budget == 0 {
        return Err(ConfigGuardRailError::ZeroRetryBudget);
    }

    if config.kinopoisk.api_key.is_none() {
        warnings.push_with_hint(
            "KINOPOISK_API_KEY not configured; external film endpoints will fail",
            "Request a key at kinopoiskapiunofficial.tech and set KINOPOISK_API_KEY",
        );
    }

    if config.routing.graphhopper_api_key.is_none() {
        warnings.push(
            "GRAPHHOPPER_API_KEY not configured; routes are served by OSRM only",
        );
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not configured",
            "Set DATABASE_URL or start with --in-memory",
        );
    }

    if !config.dev_mode && config.cors.allowed_origins.is_empty() {
        warnings.push_with_hint(
            "No CORS origins configured; requests from any origin are allowed",
            "Set CORS_ALLOWED_ORIGINS to restrict browser access",
        );
    }

    Ok(warnings)
}
