//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CART_DIR` - Directory for the saved cart (default: .data/cart)
//! - `STOREFRONT_CART_KEY` - Storage key for the saved cart (default: `shopfront_cart`)
//! - `STOREFRONT_CART_CLEAR_ON_CHECKOUT` - Empty the cart after checkout (default: false)
//! - `STOREFRONT_CART_QUANTITY_POLICY` - `reject`, `clamp` or `pass-through` (default: reject)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use shopfront_cart::persistence::DEFAULT_STORAGE_KEY;
use shopfront_cart::{CartSettings, QuantityPolicy};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Cart storage and policy configuration
    pub cart: CartConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Cart storage and behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory the file backend writes into
    pub dir: PathBuf,
    /// Storage key of the saved cart
    pub key: String,
    /// Handling of out-of-range quantities
    pub quantity_policy: QuantityPolicy,
    /// Empty the cart after checkout
    pub clear_on_checkout: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".data/cart"),
            key: DEFAULT_STORAGE_KEY.to_string(),
            quantity_policy: QuantityPolicy::default(),
            clear_on_checkout: false,
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let cart = CartConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cart,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CartConfig {
    /// Load cart configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an unknown policy, an
    /// unparsable boolean or an empty key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let key = get_env_or_default("STOREFRONT_CART_KEY", &defaults.key);
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CART_KEY".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            dir: get_optional_env("STOREFRONT_CART_DIR").map_or(defaults.dir, PathBuf::from),
            key,
            quantity_policy: parse_env("STOREFRONT_CART_QUANTITY_POLICY", "reject")?,
            clear_on_checkout: parse_bool(
                "STOREFRONT_CART_CLEAR_ON_CHECKOUT",
                &get_env_or_default("STOREFRONT_CART_CLEAR_ON_CHECKOUT", "false"),
            )?,
        })
    }

    /// Store settings derived from this configuration.
    #[must_use]
    pub const fn settings(&self) -> CartSettings {
        CartSettings {
            quantity_policy: self.quantity_policy,
            clear_on_checkout: self.clear_on_checkout,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
