use std::{path::PathBuf, time::Duration};

use afisha_core::{
    catalog::{DEFAULT_PAGE_TTL, SamplerSettings, sampler::DEFAULT_RETRY_BUDGET},
    model::TopListKind,
    providers::{
        http::DEFAULT_USER_AGENT, kinopoisk::KINOPOISK_DEFAULT_BASE,
        nominatim::NOMINATIM_DEFAULT_BASE,
        routing::{GRAPHHOPPER_DEFAULT_BASE, OSRM_DEFAULT_BASE},
    },
};

pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_GEOCODER_LANGUAGE: &str = "ru";

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
    pub kinopoisk: KinopoiskConfig,
    pub routing: RoutingConfig,
    pub geocoding: GeocodingConfig,
    /// Relaxes CORS to any origin.
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Applied to every outbound request through the shared client.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KinopoiskConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub top_list: TopListKind,
    /// Overrides the page depth of `top_list`.
    pub max_pages: Option<u32>,
    pub page_ttl: Duration,
    pub retry_budget: usize,
}

impl Default for KinopoiskConfig {
    fn default() -> Self {
        Self {
            base_url: KINOPOISK_DEFAULT_BASE.to_string(),
            api_key: None,
            top_list: TopListKind::default(),
            max_pages: None,
            page_ttl: DEFAULT_PAGE_TTL,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}

impl KinopoiskConfig {
    pub fn sampler_settings(&self) -> SamplerSettings {
        let mut settings = SamplerSettings::for_list(self.top_list);
        settings.retry_budget = self.retry_budget;
        if let Some(max_pages) = self.max_pages.filter(|pages| *pages > 0) {
            settings.max_pages = max_pages;
        }
        settings
    }
}

#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub graphhopper_base_url: String,
    /// Without a key only OSRM is used.
    pub graphhopper_api_key: Option<String>,
    pub osrm_base_url: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            graphhopper_base_url: GRAPHHOPPER_DEFAULT_BASE.to_string(),
            graphhopper_api_key: None,
            osrm_base_url: OSRM_DEFAULT_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub nominatim_base_url: String,
    pub language: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_base_url: NOMINATIM_DEFAULT_BASE.to_string(),
            language: DEFAULT_GEOCODER_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
