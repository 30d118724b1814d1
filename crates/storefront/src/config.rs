//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for the session
//!   store (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `BOOKSTORE_API_URL` - Bookstore REST backend (default: <http://localhost:8080/>)
//! - `STORE_CONTACT_EMAIL` - Email shown on the order confirmation page
//! - `STORE_CONTACT_PHONE` - Phone number shown on the order confirmation page
//! - `STORE_ADDRESS` - Store address, lines separated by `|`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/";
const DEFAULT_CONTACT_EMAIL: &str = "admin@bookstore.com";
const DEFAULT_CONTACT_PHONE: &str = "+91 8163475881";
const DEFAULT_ADDRESS: &str = "42, 14th Main, 15th Cross, Sector 4,|\
Opp. to BDA complex, near Kumarakom restaurant,|\
HSR Layout, Bangalore 560034";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL for sessions (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Bookstore REST backend configuration
    pub bookstore: BookstoreApiConfig,
    /// Contact details shown to customers
    pub store: StoreContactConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Bookstore REST backend configuration.
#[derive(Debug, Clone)]
pub struct BookstoreApiConfig {
    /// Base URL, always ending in `/` so endpoint paths join beneath it.
    pub base_url: Url,
}

impl BookstoreApiConfig {
    /// Parse and normalise a backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not http(s).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEnvVar("BOOKSTORE_API_URL".to_string(), reason);

        let mut base_url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base_url.scheme())));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }
}

/// Store contact details for the order confirmation page.
#[derive(Debug, Clone)]
pub struct StoreContactConfig {
    pub email: String,
    pub phone: String,
    pub address_lines: Vec<String>,
}

impl Default for StoreContactConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_CONTACT_EMAIL.to_string(),
            phone: DEFAULT_CONTACT_PHONE.to_string(),
            address_lines: split_address(DEFAULT_ADDRESS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let bookstore =
            BookstoreApiConfig::parse(&get_env_or_default("BOOKSTORE_API_URL", DEFAULT_API_URL))?;
        let store = StoreContactConfig::from_env();

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            bookstore,
            store,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl StoreContactConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            email: get_optional_env("STORE_CONTACT_EMAIL").unwrap_or(defaults.email),
            phone: get_optional_env("STORE_CONTACT_PHONE").unwrap_or(defaults.phone),
            address_lines: get_optional_env("STORE_ADDRESS")
                .map_or(defaults.address_lines, |raw| split_address(&raw)),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Split a `|`-separated address into trimmed, non-empty lines.
fn split_address(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    parse_rate(key, &raw)
}

fn parse_rate(key: &str, raw: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            bookstore: BookstoreApiConfig::parse(DEFAULT_API_URL).unwrap(),
            store: StoreContactConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_base_url_scheme() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://books.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_api_url_gets_trailing_slash() {
        let api = BookstoreApiConfig::parse("http://backend:8080/api").unwrap();
        assert_eq!(api.base_url.as_str(), "http://backend:8080/api/");
        assert_eq!(
            api.base_url.join("book/allBooks").unwrap().as_str(),
            "http://backend:8080/api/book/allBooks"
        );
    }

    #[test]
    fn test_api_url_rejects_other_schemes() {
        let err = BookstoreApiConfig::parse("ftp://backend/").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(BookstoreApiConfig::parse("not a url").is_err());
    }

    #[test]
    fn test_default_store_address_has_three_lines() {
        let store = StoreContactConfig::default();
        assert_eq!(store.address_lines.len(), 3);
        assert_eq!(store.address_lines[2], "HSR Layout, Bangalore 560034");
    }

    #[test]
    fn test_split_address_drops_blank_lines() {
        assert_eq!(split_address(" a | | b "), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_rate_bounds() {
        assert!((parse_rate("X", "0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(parse_rate("X", "1.5").is_err());
        assert!(parse_rate("X", "lots").is_err());
    }

    #[test]
    fn test_config_debug_redacts_database_url() {
        let output = format!("{:?}", test_config());
        assert!(!output.contains("postgres://localhost/test"));
    }
}
