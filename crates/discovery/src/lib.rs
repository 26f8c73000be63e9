//! Service discovery for Emporium.
//!
//! A service registry maps logical service names (`user-service`,
//! `product-service`, `order-service`) to live network instances. Discovery is
//! optional: no single-service operation depends on it, so every caller treats
//! registry failures as best-effort.
//!
//! # Implementations
//!
//! - [`NoopRegistry`] - registration succeeds silently, lookups are empty.
//!   Used when no registry is configured.
//! - [`EurekaRegistry`] - speaks the Eureka REST protocol over `reqwest`,
//!   caching lookups with `moka`.
//!
//! # Example
//!
//! ```rust,ignore
//! use emporium_discovery::{registry_from_url, ServiceInstance};
//!
//! let registry = registry_from_url(std::env::var("REGISTRY_URL").ok().as_deref())?;
//! let instance = ServiceInstance::new("user-service", "http://10.0.0.4:8700".parse()?);
//! registry.register(&instance).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod eureka;
mod noop;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use eureka::EurekaRegistry;
pub use noop::NoopRegistry;

/// Errors that can occur when talking to a service registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("registry unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry answered with a non-success status.
    #[error("registry returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// The registry response could not be understood.
    #[error("invalid registry response: {0}")]
    Parse(String),

    /// The registry URL is malformed.
    #[error("invalid registry url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Lifecycle status reported for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstanceStatus {
    #[default]
    Up,
    Down,
    Starting,
    OutOfService,
    Unknown,
}

impl InstanceStatus {
    /// Wire representation used by Eureka.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Starting => "STARTING",
            Self::OutOfService => "OUT_OF_SERVICE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse the wire representation; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "STARTING" => Self::Starting,
            "OUT_OF_SERVICE" => Self::OutOfService,
            _ => Self::Unknown,
        }
    }
}

/// A single network instance of a logical service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    /// Logical service name, lower-case (e.g. `user-service`).
    pub service: String,
    /// Unique id of this instance within the service.
    pub instance_id: String,
    /// Base URL peers should call (scheme, host, port, optional context path).
    pub base_url: Url,
    /// Reported status.
    pub status: InstanceStatus,
}

impl ServiceInstance {
    /// Describe an instance that is up, deriving its id from the URL authority.
    #[must_use]
    pub fn new(service: &str, base_url: Url) -> Self {
        let service = service.to_ascii_lowercase();
        let host = base_url.host_str().unwrap_or("localhost");
        let instance_id = match base_url.port_or_known_default() {
            Some(port) => format!("{host}:{service}:{port}"),
            None => format!("{host}:{service}"),
        };

        Self {
            service,
            instance_id,
            base_url,
            status: InstanceStatus::Up,
        }
    }

    /// Whether peers should route traffic to this instance.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == InstanceStatus::Up
    }
}

/// A directory mapping logical service names to live instances.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Short name for logs (e.g. "noop", "eureka").
    fn kind(&self) -> &'static str;

    /// Announce an instance.
    async fn register(&self, instance: &ServiceInstance) -> Result<(), RegistryError>;

    /// Renew an instance's lease.
    async fn heartbeat(&self, instance: &ServiceInstance) -> Result<(), RegistryError>;

    /// Withdraw an instance.
    async fn deregister(&self, instance: &ServiceInstance) -> Result<(), RegistryError>;

    /// All known instances of a service. Unknown services yield an empty list.
    async fn instances(&self, service: &str) -> Result<Vec<ServiceInstance>, RegistryError>;
}

/// Pick the first available instance of `service`, tolerating registry errors.
///
/// Returns `None` when the registry is empty, unreachable, or only knows about
/// instances that are not up.
pub async fn first_available(registry: &dyn ServiceRegistry, service: &str) -> Option<Url> {
    match registry.instances(service).await {
        Ok(instances) => instances
            .into_iter()
            .find(ServiceInstance::is_available)
            .map(|instance| instance.base_url),
        Err(e) => {
            tracing::warn!(
                registry = registry.kind(),
                service,
                error = %e,
                "Service lookup failed"
            );
            None
        }
    }
}

/// Build the registry for an optional registry URL.
///
/// `None` or a blank string selects [`NoopRegistry`].
///
/// # Errors
///
/// Returns `RegistryError::InvalidUrl` if the URL cannot be parsed.
pub fn registry_from_url(url: Option<&str>) -> Result<Arc<dyn ServiceRegistry>, RegistryError> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => Ok(Arc::new(EurekaRegistry::new(Url::parse(url)?))),
        None => Ok(Arc::new(NoopRegistry)),
    }
}
