use crate::analytics::query::DEFAULT_TOP_N;
use crate::analytics::scoring::{RiskWeight, DEFAULT_WEIGHT_FAKE};
use crate::analytics::TaxRates;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATASET_PATH: &str = "data/listings_enriched.csv";

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
    pub dataset: DatasetConfig,
    pub scoring: ScoringConfig,
    pub tax: TaxRates,
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
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let dataset_path = env::var("APP_DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH));

        let default_weight_fake = match env::var("APP_DEFAULT_WEIGHT_FAKE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|value| RiskWeight::new(value).ok())
                .ok_or(ConfigError::InvalidWeight { value: raw })?,
            Err(_) => RiskWeight::default(),
        };

        let ranking_top_n = match env::var("APP_RANKING_TOP_N") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidTopN { value: raw })?,
            Err(_) => DEFAULT_TOP_N,
        };

        let defaults = TaxRates::default();
        let tax = TaxRates {
            registration: rate_from_env("APP_TAX_REGISTRATION_RATE", defaults.registration)?,
            land_use: rate_from_env("APP_TAX_LAND_USE_RATE", defaults.land_use)?,
            transfer: rate_from_env("APP_TAX_TRANSFER_RATE", defaults.transfer)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            dataset: DatasetConfig { path: dataset_path },
            scoring: ScoringConfig {
                default_weight_fake,
                ranking_top_n,
            },
            tax,
        })
    }
}

fn rate_from_env(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(ConfigError::InvalidTaxRate { key, value: raw }),
        Err(_) => Ok(default),
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
    pub ansi: bool,
}

/// Where the listings export is read from at startup.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

/// Defaults applied when a request leaves scoring knobs unset.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub default_weight_fake: RiskWeight,
    pub ranking_top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_weight_fake: RiskWeight::default(),
            ranking_top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { value: String },
    InvalidTopN { value: String },
    InvalidTaxRate { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { value } => write!(
                f,
                "APP_DEFAULT_WEIGHT_FAKE must be a number within [0, 1], got '{}' (default {})",
                value, DEFAULT_WEIGHT_FAKE
            ),
            ConfigError::InvalidTopN { value } => write!(
                f,
                "APP_RANKING_TOP_N must be a positive integer, got '{}'",
                value
            ),
            ConfigError::InvalidTaxRate { key, value } => write!(
                f,
                "{} must be a finite non-negative number, got '{}'",
                key, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWeight { .. }
            | ConfigError::InvalidTopN { .. }
            | ConfigError::InvalidTaxRate { .. } => None,
        }
    }
}
