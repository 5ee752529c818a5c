//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The configuration file path defaults to `config.yaml` but
//! can be specified via the `-f` flag or the `REELIST_CONFIG` environment
//! variable.
//!
//! ## Loading Priority
//!
//! Sources are merged in order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `REELIST_`
//! 3. **DATABASE_URL** - Special case: overrides `database.url` if set
//!
//! For nested config values, use double underscores in environment
//! variables: `REELIST_CATALOG__API_KEY=...` sets `catalog.api_key`.
//!
//! Secrets (the session signing key and the catalog API key) are only
//! ever supplied this way; there are no compiled-in defaults for them and
//! startup fails without them.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "REELIST_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and
/// environment variables. All fields have sensible defaults except the
/// secrets checked by [`Config::validate`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Raw DATABASE_URL override; applied to `database.url` during load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// SQLite database configuration
    pub database: DatabaseConfig,
    /// Secret key for signing session tokens (required)
    pub secret_key: Option<String>,
    /// Session and password policy configuration
    pub auth: AuthConfig,
    /// External movie-metadata provider configuration
    pub catalog: CatalogConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
            database: DatabaseConfig::default(),
            secret_key: None,
            auth: AuthConfig::default(),
            catalog: CatalogConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite connection string
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:reelist.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub session: SessionConfig,
    pub password: PasswordConfig,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the session cookie
    pub cookie_name: String,
    /// Whether to set the Secure attribute (disable for plain-HTTP dev)
    pub cookie_secure: bool,
    /// SameSite attribute value
    pub cookie_same_site: String,
    /// Session lifetime
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "reelist_session".to_string(),
            cookie_secure: false,
            cookie_same_site: "Strict".to_string(),
            timeout: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Password policy for registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

/// External movie-metadata provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base URL of the provider API
    pub base_url: Url,
    /// Base URL that poster paths are appended to
    pub image_base_url: String,
    /// Provider API key (required)
    pub api_key: Option<String>,
    /// Per-request timeout for outbound lookups
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3/".parse().expect("static URL is valid"),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins allowed to call the API; empty means same-origin only
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("REELIST_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // if database_url is set, it wins over the structured setting
        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.secret_key.is_none() {
            return Err(Error::Internal {
                operation: "Config validation: secret_key is not configured. \
                     Set the REELIST_SECRET_KEY environment variable or add secret_key to the config file."
                    .to_string(),
            });
        }

        if self.catalog.api_key.is_none() {
            return Err(Error::Internal {
                operation: "Config validation: catalog.api_key is not configured. \
                     Set the REELIST_CATALOG__API_KEY environment variable or add catalog.api_key to the config file."
                    .to_string(),
            });
        }

        if self.auth.password.min_length > self.auth.password.max_length {
            return Err(Error::Internal {
                operation: "Config validation: auth.password.min_length exceeds max_length".to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
