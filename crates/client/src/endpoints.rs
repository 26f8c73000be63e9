//! Where each service lives.
//!
//! Resolution order per service:
//!
//! 1. `USER_SERVICE_URL` / `PRODUCT_SERVICE_URL` / `ORDER_SERVICE_URL`
//! 2. the registry at `REGISTRY_URL`, when one is configured
//! 3. the default localhost port
//!
//! An empty registry lookup is an error rather than a silent fallback to
//! localhost.

use std::fmt;

use emporium_discovery::{ServiceRegistry, first_available, registry_from_url};
use url::Url;

use crate::error::ClientError;

/// The three Emporium services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    User,
    Product,
    Order,
}

impl Service {
    /// Every service, in checkout order.
    pub const ALL: [Self; 3] = [Self::User, Self::Product, Self::Order];

    /// Logical name used for registration and lookup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "user-service",
            Self::Product => "product-service",
            Self::Order => "order-service",
        }
    }

    /// Environment variable holding an explicit base URL.
    #[must_use]
    pub const fn url_var(self) -> &'static str {
        match self {
            Self::User => "USER_SERVICE_URL",
            Self::Product => "PRODUCT_SERVICE_URL",
            Self::Order => "ORDER_SERVICE_URL",
        }
    }

    /// Base URL of a locally started service on its default port.
    #[must_use]
    pub const fn default_url(self) -> &'static str {
        match self {
            Self::User => "http://localhost:8700",
            Self::Product => "http://localhost:8500",
            Self::Order => "http://localhost:8300",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved base URLs for the three services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub user: Url,
    pub product: Url,
    pub order: Url,
}

impl Endpoints {
    /// All three services on their default localhost ports.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the defaults are valid URLs.
    pub fn localhost() -> Result<Self, ClientError> {
        Ok(Self {
            user: Url::parse(Service::User.default_url())?,
            product: Url::parse(Service::Product.default_url())?,
            order: Url::parse(Service::Order.default_url())?,
        })
    }

    /// The base URL of one service.
    #[must_use]
    pub const fn get(&self, service: Service) -> &Url {
        match service {
            Service::User => &self.user,
            Service::Product => &self.product,
            Service::Order => &self.order,
        }
    }

    /// Resolve from the process environment, consulting `REGISTRY_URL` when
    /// set.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` or `ClientError::Registry` for
    /// malformed configuration, and `ClientError::Unavailable` when the
    /// registry knows no live instance of a service.
    pub async fn from_env() -> Result<Self, ClientError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let registry = match lookup("REGISTRY_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(registry_from_url(Some(&url))?),
            None => None,
        };
        Self::resolve(lookup, registry.as_deref()).await
    }

    /// Resolve each service from `lookup` (environment-style keys), then the
    /// registry, then the localhost default.
    ///
    /// # Errors
    ///
    /// See [`Endpoints::from_env`].
    pub async fn resolve<F>(
        lookup: F,
        registry: Option<&dyn ServiceRegistry>,
    ) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            user: resolve_one(Service::User, &lookup, registry).await?,
            product: resolve_one(Service::Product, &lookup, registry).await?,
            order: resolve_one(Service::Order, &lookup, registry).await?,
        })
    }
}

async fn resolve_one<F>(
    service: Service,
    lookup: &F,
    registry: Option<&dyn ServiceRegistry>,
) -> Result<Url, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(service.url_var())
        && !raw.trim().is_empty()
    {
        return Ok(Url::parse(raw.trim())?);
    }

    if let Some(registry) = registry {
        let url = first_available(registry, service.name()).await.ok_or_else(|| {
            ClientError::Unavailable {
                service: service.name(),
                reason: format!("no available instance in the {} registry", registry.kind()),
            }
        })?;
        tracing::debug!(service = service.name(), url = %url, "Resolved from registry");
        return Ok(url);
    }

    Ok(Url::parse(service.default_url())?)
}
