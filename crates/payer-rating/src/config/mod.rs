use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::workflows::payers::AggregationConfig;
use crate::workflows::rating::RatingConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rating: RatingSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let rating = match env::var("RATING_CONFIG_PATH") {
            Ok(path) if !path.trim().is_empty() => RatingSettings::from_path(path.trim())?,
            _ => RatingSettings::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rating,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Ingestion and rating knobs, read from the JSON file named by `RATING_CONFIG_PATH`.
///
/// Every section is optional; omitted values keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    pub aggregation: AggregationConfig,
    pub rating: RatingConfig,
}

impl RatingSettings {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::RatingFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|err| match err {
            ConfigError::RatingFormat { source, .. } => ConfigError::RatingFormat {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(raw)
            .map_err(|source| ConfigError::RatingFormat { path: None, source })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rating
            .validate()
            .map_err(|reason| ConfigError::InvalidRatingSettings { reason })?;
        if self.aggregation.default_credit_days <= 0 {
            return Err(ConfigError::InvalidRatingSettings {
                reason: "default_credit_days must be positive".to_string(),
            });
        }
        if self.aggregation.date_formats.formats().is_empty() {
            return Err(ConfigError::InvalidRatingSettings {
                reason: "at least one date format is required".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    RatingFile {
        path: PathBuf,
        source: std::io::Error,
    },
    RatingFormat {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    InvalidRatingSettings {
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::RatingFile { path, .. } => {
                write!(f, "unable to read rating config {}", path.display())
            }
            ConfigError::RatingFormat { path: Some(path), source } => {
                write!(f, "invalid rating config {}: {}", path.display(), source)
            }
            ConfigError::RatingFormat { path: None, source } => {
                write!(f, "invalid rating config: {}", source)
            }
            ConfigError::InvalidRatingSettings { reason } => {
                write!(f, "invalid rating settings: {}", reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRatingSettings { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RatingFile { source, .. } => Some(source),
            ConfigError::RatingFormat { source, .. } => Some(source),
        }
    }
}
