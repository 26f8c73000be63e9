//! Service configuration loaded from environment variables.
//!
//! Every service reads the same set of variables under its own prefix, derived
//! from the service name (`user-service` -> `USER_SERVICE_`).
//!
//! # Environment Variables
//!
//! ## Per service (`<P>` = `USER_SERVICE_`, `PRODUCT_SERVICE_`, `ORDER_SERVICE_`)
//! - `<P>HOST` - Bind address (default: 127.0.0.1)
//! - `<P>PORT` - Listen port (default: 8700 / 8500 / 8300)
//! - `<P>STORAGE` - `postgres` (default) or `memory`
//! - `<P>DATABASE_URL` - `PostgreSQL` connection string, falls back to
//!   `DATABASE_URL`. Required when storage is `postgres`.
//! - `<P>CONTEXT_PATH` - Extra route prefix (e.g. `/user-service`)
//! - `<P>PUBLIC_URL` - URL advertised to the service registry
//!
//! ## Shared
//! - `REGISTRY_URL` - Eureka base URL (e.g. `http://localhost:8761/eureka`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 1.0)
//! - `LOG_FORMAT` - `text` (default) or `json`

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where a service keeps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("expected `postgres` or `memory`, got `{other}`")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Sentry settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 1.0,
        }
    }
}

/// Runtime configuration for one service.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Logical service name (`user-service`).
    pub service_name: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Record store
    pub storage: StorageBackend,
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Normalized route prefix, always starting with `/` and never ending with one
    pub context_path: Option<String>,
    /// URL advertised to the registry
    pub public_url: Option<Url>,
    /// Service registry base URL
    pub registry_url: Option<String>,
    pub sentry: SentryConfig,
    pub log_format: LogFormat,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service_name", &self.service_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storage", &self.storage)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("context_path", &self.context_path)
            .field("public_url", &self.public_url)
            .field("registry_url", &self.registry_url)
            .field("sentry", &self.sentry)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed, or if the `postgres`
    /// store is selected without a database URL.
    pub fn from_env(service_name: &str, default_port: u16) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(service_name, default_port, |key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceConfig::from_env`].
    pub fn from_lookup<F>(
        service_name: &str,
        default_port: u16,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars {
            prefix: env_prefix(service_name),
            lookup,
        };

        let host = vars.parse_or("HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = vars.parse_or("PORT", default_port)?;
        let storage: StorageBackend = vars.parse_or("STORAGE", StorageBackend::default())?;

        let database_url = vars
            .get("DATABASE_URL")
            .or_else(|| vars.get_shared("DATABASE_URL"))
            .map(SecretString::from);
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar(vars.key("DATABASE_URL")));
        }

        let context_path = match vars.get("CONTEXT_PATH") {
            Some(raw) => normalize_context_path(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar(vars.key("CONTEXT_PATH"), e))?,
            None => None,
        };
        let public_url = vars
            .get("PUBLIC_URL")
            .map(|u| {
                Url::parse(&u)
                    .map_err(|e| ConfigError::InvalidEnvVar(vars.key("PUBLIC_URL"), e.to_string()))
            })
            .transpose()?;

        let sentry = SentryConfig {
            dsn: vars.get_shared("SENTRY_DSN"),
            environment: vars.get_shared("SENTRY_ENVIRONMENT"),
            sample_rate: vars
                .get_shared("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            traces_sample_rate: vars
                .get_shared("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        };

        let log_format = match vars.get_shared("LOG_FORMAT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("LOG_FORMAT".to_string(), e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            service_name: service_name.to_string(),
            host,
            port,
            storage,
            database_url,
            context_path,
            public_url,
            registry_url: vars.get_shared("REGISTRY_URL"),
            sentry,
            log_format,
        })
    }

    /// Configuration for an in-process instance: memory store, ephemeral
    /// port, no registry, no Sentry.
    #[must_use]
    pub fn in_memory(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            storage: StorageBackend::Memory,
            database_url: None,
            context_path: None,
            public_url: None,
            registry_url: None,
            sentry: SentryConfig::default(),
            log_format: LogFormat::Text,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The URL peers should use to reach this instance once it is bound to
    /// `bound`.
    ///
    /// Uses `PUBLIC_URL` when set. Otherwise builds one from the bound address
    /// and the context path, replacing an unspecified bind address with
    /// loopback.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the context path produces an invalid URL.
    pub fn advertised_url(&self, bound: SocketAddr) -> Result<Url, url::ParseError> {
        if let Some(url) = &self.public_url {
            return Ok(url.clone());
        }

        let ip = if bound.ip().is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            bound.ip()
        };
        let authority = SocketAddr::new(ip, bound.port());
        let path = self.context_path.as_deref().unwrap_or("");

        Url::parse(&format!("http://{authority}{path}/"))
    }
}

/// `user-service` -> `USER_SERVICE_`.
#[must_use]
pub fn env_prefix(service_name: &str) -> String {
    let mut prefix = service_name.to_ascii_uppercase().replace('-', "_");
    prefix.push('_');
    prefix
}

/// Ensure a leading `/`, strip trailing ones. Blank or `/` means no prefix.
///
/// # Errors
///
/// Returns the reason when a segment is empty or holds anything besides
/// ASCII letters, digits, `-`, `.`, `_` or `~`. Route syntax such as `{id}`
/// or `*rest` is refused here rather than reaching the router.
pub fn normalize_context_path(raw: &str) -> Result<Option<String>, String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }
    for segment in trimmed.split('/') {
        if segment.is_empty() {
            return Err("empty path segment".to_string());
        }
        if let Some(bad) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
        {
            return Err(format!("'{bad}' is not allowed in a context path"));
        }
    }
    Ok(Some(format!("/{trimmed}")))
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F> {
    prefix: String,
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Get an optional, non-blank, prefixed variable.
    fn get(&self, name: &str) -> Option<String> {
        self.get_shared(&self.key(name))
    }

    /// Get an optional, non-blank, unprefixed variable.
    fn get_shared(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a prefixed variable, falling back to `default` when unset.
    fn parse_or<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(self.key(name), e.to_string())),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServiceConfig::from_lookup("user-service", 8700, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(env_prefix("user-service"), "USER_SERVICE_");
        assert_eq!(env_prefix("order-service"), "ORDER_SERVICE_");
    }

    #[test]
    fn test_defaults_with_memory_store() {
        let config = load(&[("USER_SERVICE_STORAGE", "memory")]).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8700");
        assert!(config.database_url.is_none());
        assert!(config.context_path.is_none());
        assert!(config.registry_url.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
        assert!((config.sentry.sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "USER_SERVICE_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_falls_back_to_generic() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/users")]).unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/users"
        );

        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/shared"),
            ("USER_SERVICE_DATABASE_URL", "postgres://localhost/own"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/own"
        );
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let err = load(&[
            ("USER_SERVICE_STORAGE", "memory"),
            ("USER_SERVICE_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "USER_SERVICE_PORT"));
    }

    #[test]
    fn test_invalid_storage_is_reported() {
        let err = load(&[("USER_SERVICE_STORAGE", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "USER_SERVICE_STORAGE"));
    }

    #[test]
    fn test_context_path_normalization() {
        assert_eq!(normalize_context_path("user-service").unwrap().as_deref(), Some("/user-service"));
        assert_eq!(normalize_context_path("/user-service/").unwrap().as_deref(), Some("/user-service"));
        assert_eq!(normalize_context_path("/v1/users").unwrap().as_deref(), Some("/v1/users"));
        assert_eq!(normalize_context_path("/").unwrap(), None);
        assert_eq!(normalize_context_path("  ").unwrap(), None);
    }

    #[test]
    fn test_context_path_rejects_route_syntax() {
        for raw in ["{id}", "/users/*rest", "api//v1", "with space", "a?b"] {
            assert!(normalize_context_path(raw).is_err(), "{raw}");
        }

        let err = load(&[
            ("USER_SERVICE_STORAGE", "memory"),
            ("USER_SERVICE_CONTEXT_PATH", "/{tenant}"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "USER_SERVICE_CONTEXT_PATH"));
    }

    #[test]
    fn test_advertised_url() {
        let mut config = load(&[
            ("USER_SERVICE_STORAGE", "memory"),
            ("USER_SERVICE_HOST", "0.0.0.0"),
            ("USER_SERVICE_CONTEXT_PATH", "user-service"),
        ])
        .unwrap();
        let bound: SocketAddr = "0.0.0.0:8700".parse().unwrap();
        assert_eq!(
            config.advertised_url(bound).unwrap().as_str(),
            "http://127.0.0.1:8700/user-service/"
        );

        config.public_url = Some(Url::parse("http://users.internal:8700/").unwrap());
        assert_eq!(
            config.advertised_url(bound).unwrap().as_str(),
            "http://users.internal:8700/"
        );
    }

    #[test]
    fn test_shared_settings() {
        let config = load(&[
            ("USER_SERVICE_STORAGE", "memory"),
            ("REGISTRY_URL", "http://localhost:8761/eureka"),
            ("LOG_FORMAT", "json"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();
        assert_eq!(config.registry_url.as_deref(), Some("http://localhost:8761/eureka"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!((config.sentry.traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("USER_SERVICE_DATABASE_URL", "postgres://u:hunter2@db/users")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }
}
