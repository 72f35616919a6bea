use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use afisha_core::model::TopListKind;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub upstream: FileUpstreamConfig,
    #[serde(default)]
    pub kinopoisk: FileKinopoiskConfig,
    #[serde(default)]
    pub routing: FileRoutingConfig,
    #[serde(default)]
    pub geocoding: FileGeocodingConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUpstreamConfig {
    /// Humantime string, e.g. `"15s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileKinopoiskConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_list: Option<TopListKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_budget: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileRoutingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphhopper_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphhopper_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osrm_base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileGeocodingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominatim_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
    pub upstream_timeout: Option<String>,
    pub upstream_user_agent: Option<String>,
    pub kinopoisk_base_url: Option<String>,
    pub kinopoisk_api_key: Option<String>,
    pub kinopoisk_top_list: Option<String>,
    pub kinopoisk_max_pages: Option<u32>,
    pub kinopoisk_page_ttl: Option<String>,
    pub sampler_retry_budget: Option<usize>,
    pub graphhopper_base_url: Option<String>,
    pub graphhopper_api_key: Option<String>,
    pub osrm_base_url: Option<String>,
    pub nominatim_base_url: Option<String>,
    pub geocoder_language: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &str| var(name).and_then(|s| s.trim().parse().ok());

        Self {
            config_path: var("AFISHA_CONFIG_PATH").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT").and_then(|s| s.trim().parse().ok()),
            database_url: var("DATABASE_URL"),
            database_max_connections: number("DATABASE_MAX_CONNECTIONS")
                .and_then(|n: u64| u32::try_from(n).ok()),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_csv(&raw)),
            dev_mode: var("DEV_MODE").and_then(|raw| parse_bool(&raw)),
            upstream_timeout: var("UPSTREAM_TIMEOUT"),
            upstream_user_agent: var("UPSTREAM_USER_AGENT"),
            kinopoisk_base_url: var("KINOPOISK_BASE_URL"),
            kinopoisk_api_key: var("KINOPOISK_API_KEY"),
            kinopoisk_top_list: var("KINOPOISK_TOP_LIST"),
            kinopoisk_max_pages: number("KINOPOISK_MAX_PAGES")
                .and_then(|n: u64| u32::try_from(n).ok()),
            kinopoisk_page_ttl: var("KINOPOISK_PAGE_TTL"),
            sampler_retry_budget: number("SAMPLER_RETRY_BUDGET")
                .and_then(|n: u64| usize::try_from(n).ok()),
            graphhopper_base_url: var("GRAPHHOPPER_BASE_URL"),
            graphhopper_api_key: var("GRAPHHOPPER_API_KEY"),
            osrm_base_url: var("OSRM_BASE_URL"),
            nominatim_base_url: var("NOMINATIM_BASE_URL"),
            geocoder_language: var("GEOCODER_LANGUAGE"),
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn blank_and_malformed_values_are_ignored() {
        let cfg = env(&[
            ("KINOPOISK_API_KEY", "   "),
            ("SERVER_PORT", "eighty"),
            ("DEV_MODE", "maybe"),
        ]);
        assert_eq!(cfg.kinopoisk_api_key, None);
        assert_eq!(cfg.server_port, None);
        assert_eq!(cfg.dev_mode, None);
    }

    #[test]
    fn csv_origins_drop_empty_entries() {
        let cfg = env(&[(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:3000, ,https://afisha.example",
        )]);
        assert_eq!(
            cfg.cors_allowed_origins.unwrap(),
            vec!["http://localhost:3000", "https://afisha.example"]
        );
    }
}
