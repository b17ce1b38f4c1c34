use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::pricing::{DiscountRates, RatesError};

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
    pub pricing: PricingConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing: PricingConfig::from_env()?,
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

/// Where the pricing tables come from and how the optional discounts are rated.
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    /// JSON tables replacing the built-in catalog and partner directory.
    pub tables_path: Option<PathBuf>,
    pub rates: DiscountRates,
    /// Fixed pricing date, used for demos and reproducing historical quotes.
    pub as_of: Option<NaiveDate>,
}

impl PricingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = DiscountRates::default();
        let rates = DiscountRates {
            promotional_percent: percent_var(
                "PRICING_PROMOTIONAL_PERCENT",
                defaults.promotional_percent,
            )?,
            residency_percent: percent_var("PRICING_RESIDENCY_PERCENT", defaults.residency_percent)?,
            alumni_percent: percent_var("PRICING_ALUMNI_PERCENT", defaults.alumni_percent)?,
        };
        rates.validate().map_err(ConfigError::Rates)?;

        let as_of = match non_empty_var("PRICING_AS_OF") {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidDate { value: raw })?,
            ),
            None => None,
        };

        Ok(Self {
            tables_path: non_empty_var("PRICING_TABLES_PATH").map(PathBuf::from),
            rates,
            as_of,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn percent_var(key: &'static str, default: Decimal) -> Result<Decimal, ConfigError> {
    match non_empty_var(key) {
        Some(raw) => Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidPercent {
            key,
            value: raw,
        }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPercent { key: &'static str, value: String },
    InvalidDate { value: String },
    Rates(RatesError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPercent { key, value } => {
                write!(f, "{key} must be a decimal percentage, got '{value}'")
            }
            ConfigError::InvalidDate { value } => {
                write!(f, "PRICING_AS_OF must be YYYY-MM-DD, got '{value}'")
            }
            ConfigError::Rates(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Rates(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidPercent { .. }
            | ConfigError::InvalidDate { .. } => None,
        }
    }
}
