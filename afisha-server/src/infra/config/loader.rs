use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use afisha_core::model::TopListKind;

use super::{
    models::{
        Config, ConfigMetadata, CorsConfig, DatabaseConfig, GeocodingConfig,
        KinopoiskConfig, RoutingConfig, ServerConfig, UpstreamConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["afisha.toml", "config/afisha.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env`, the process environment and the config file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolve against an explicit environment snapshot. Does not read
    /// `.env` or the process environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) = compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        match result {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let requested = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match requested {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();
    if config_path.is_none() {
        warnings.push("No afisha.toml detected; using environment variables and defaults");
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        cors: file_cors,
        upstream: file_upstream,
        kinopoisk: file_kinopoisk,
        routing: file_routing,
        geocoding: file_geocoding,
        dev_mode: file_dev_mode,
    } = file.unwrap_or_default();

    let server_defaults = ServerConfig::default();
    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or(server_defaults.host),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(server_defaults.port),
    };

    let database = DatabaseConfig {
        url: env
            .database_url
            .or(file_database.url)
            .filter(|url| !url.trim().is_empty()),
        max_connections: env
            .database_max_connections
            .or(file_database.max_connections)
            .unwrap_or(DatabaseConfig::default().max_connections),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let upstream_defaults = UpstreamConfig::default();
    let upstream = UpstreamConfig {
        timeout: duration_setting(
            "UPSTREAM_TIMEOUT",
            env.upstream_timeout.or(file_upstream.timeout),
            upstream_defaults.timeout,
        )?,
        user_agent: env
            .upstream_user_agent
            .or(file_upstream.user_agent)
            .unwrap_or(upstream_defaults.user_agent),
    };

    let kinopoisk_defaults = KinopoiskConfig::default();
    let top_list = match env.kinopoisk_top_list {
        Some(raw) => raw
            .parse::<TopListKind>()
            .map_err(|reason| ConfigLoadError::InvalidTopList { reason })?,
        None => file_kinopoisk
            .top_list
            .unwrap_or(kinopoisk_defaults.top_list),
    };
    let kinopoisk = KinopoiskConfig {
        base_url: env
            .kinopoisk_base_url
            .or(file_kinopoisk.base_url)
            .unwrap_or(kinopoisk_defaults.base_url),
        api_key: env
            .kinopoisk_api_key
            .or(file_kinopoisk.api_key)
            .filter(|key| !key.trim().is_empty()),
        top_list,
        max_pages: env.kinopoisk_max_pages.or(file_kinopoisk.max_pages),
        page_ttl: duration_setting(
            "KINOPOISK_PAGE_TTL",
            env.kinopoisk_page_ttl.or(file_kinopoisk.page_ttl),
            kinopoisk_defaults.page_ttl,
        )?,
        retry_budget: env
            .sampler_retry_budget
            .or(file_kinopoisk.retry_budget)
            .unwrap_or(kinopoisk_defaults.retry_budget),
    };

    let routing_defaults = RoutingConfig::default();
    let routing = RoutingConfig {
        graphhopper_base_url: env
            .graphhopper_base_url
            .or(file_routing.graphhopper_base_url)
            .unwrap_or(routing_defaults.graphhopper_base_url),
        graphhopper_api_key: env
            .graphhopper_api_key
            .or(file_routing.graphhopper_api_key)
            .filter(|key| !key.trim().is_empty()),
        osrm_base_url: env
            .osrm_base_url
            .or(file_routing.osrm_base_url)
            .unwrap_or(routing_defaults.osrm_base_url),
    };

    let geocoding_defaults = GeocodingConfig::default();
    let geocoding = GeocodingConfig {
        nominatim_base_url: env
            .nominatim_base_url
            .or(file_geocoding.nominatim_base_url)
            .unwrap_or(geocoding_defaults.nominatim_base_url),
        language: env
            .geocoder_language
            .or(file_geocoding.language)
            .unwrap_or(geocoding_defaults.language),
    };

    let config = Config {
        server,
        database,
        cors,
        upstream,
        kinopoisk,
        routing,
        geocoding,
        dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);

    Ok((config, warnings))
}

fn duration_setting(
    key: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match raw {
        Some(value) => humantime::parse_duration(value.trim()).map_err(|source| {
            ConfigLoadError::InvalidDuration { key, value, source }
        }),
        None => Ok(default),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration for {key}: {value:?}")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid KINOPOISK_TOP_LIST: {reason}")]
    InvalidTopList { reason: String },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|name| vars.get(name).cloned())
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ConfigLoader::new()
            .with_config_path(&missing)
            .load_with_env(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn file_values_fill_in_and_env_wins() {
        let file = config_file(
            r#"
            dev_mode = true

            [server]
            host = "127.0.0.1"
            port = 8080

            [kinopoisk]
            api_key = "file-key"
            top_list = "TOP_250_BEST_FILMS"
            page_ttl = "5m"
            retry_budget = 4

            [upstream]
            timeout = "3s"
            "#,
        );

        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env(&[
                ("SERVER_PORT", "9090"),
                ("KINOPOISK_API_KEY", "env-key"),
            ]))
            .unwrap();
        let config = load.config;

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.kinopoisk.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.kinopoisk.top_list, TopListKind::Top250Best);
        assert_eq!(config.kinopoisk.page_ttl, Duration::from_secs(300));
        assert_eq!(config.kinopoisk.retry_budget, 4);
        assert_eq!(config.upstream.timeout, Duration::from_secs(3));
        assert!(config.dev_mode);
        assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));

        let settings = config.kinopoisk.sampler_settings();
        assert_eq!(settings.max_pages, 13);
        assert_eq!(settings.retry_budget, 4);
    }

    #[test]
    fn env_only_uses_defaults_and_warns() {
        let file = config_file("");
        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env(&[]))
            .unwrap();

        assert_eq!(load.config.server.port, 5050);
        assert_eq!(load.config.upstream.timeout, Duration::from_secs(15));
        assert_eq!(load.config.kinopoisk.page_ttl, Duration::from_secs(600));
        assert_eq!(load.config.kinopoisk.retry_budget, 8);
        assert!(!load.warnings.is_empty());
    }

    #[test]
    fn bad_duration_is_an_error() {
        let file = config_file("");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env(&[("KINOPOISK_PAGE_TTL", "ten minutes")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidDuration {
                key: "KINOPOISK_PAGE_TTL",
                ..
            }
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = config_file("[server\nport = ");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn unknown_top_list_in_env_is_rejected() {
        let file = config_file("");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env(&[("KINOPOISK_TOP_LIST", "TOP_10")]))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidTopList { .. }));
    }
}
