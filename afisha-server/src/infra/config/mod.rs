//! Layered configuration: defaults, then `afisha.toml`, then environment.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, GeocodingConfig,
    KinopoiskConfig, RoutingConfig, ServerConfig, UpstreamConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
