//! Emporium Client - typed HTTP clients for the three services.
//!
//! # Overview
//!
//! - [`Endpoints`] - resolves each service's base URL from explicit
//!   configuration, the service registry, or the localhost defaults
//! - [`UserClient`], [`ProductClient`], [`OrderClient`] - CRUD over
//!   `/api/users`, `/api/products`, `/api/orders`
//! - [`CheckoutFlow`] - creates a user, a product and an order, then verifies
//!   them, carrying state in a [`CheckoutContext`]
//!
//! Every failure is a [`ClientError`]. A service that cannot be reached is
//! always `ClientError::Unavailable`, never a panic.
//!
//! # Example
//!
//! ```rust,ignore
//! use emporium_client::{EmporiumClient, Endpoints};
//!
//! let client = EmporiumClient::new(&Endpoints::from_env().await?)?;
//! for product in client.products().find_by_sku("LAPTOP-001").await? {
//!     println!("{product:?}");
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod endpoints;
pub mod error;
pub mod resource;

use std::time::Duration;

pub use checkout::{
    CheckoutContext, CheckoutError, CheckoutFlow, CheckoutReceipt, CheckoutRequest, CheckoutStep,
};
pub use endpoints::{Endpoints, Service};
pub use error::ClientError;
pub use resource::{Health, OrderClient, ProductClient, ResourceClient, UserClient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Clients for all three services sharing one connection pool.
#[derive(Debug, Clone)]
pub struct EmporiumClient {
    users: UserClient,
    products: ProductClient,
    orders: OrderClient,
}

impl EmporiumClient {
    /// Build clients for `endpoints` with a 10 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(endpoints: &Endpoints) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_http(http, endpoints))
    }

    /// Build clients over an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: reqwest::Client, endpoints: &Endpoints) -> Self {
        Self {
            users: UserClient::new(http.clone(), &endpoints.user),
            products: ProductClient::new(http.clone(), &endpoints.product),
            orders: OrderClient::new(http, &endpoints.order),
        }
    }

    #[must_use]
    pub const fn users(&self) -> &UserClient {
        &self.users
    }

    #[must_use]
    pub const fn products(&self) -> &ProductClient {
        &self.products
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderClient {
        &self.orders
    }

    /// Liveness of every service, in checkout order.
    pub async fn probe(&self) -> Vec<(Service, Health)> {
        vec![
            (Service::User, self.users.health().await),
            (Service::Product, self.products.health().await),
            (Service::Order, self.orders.health().await),
        ]
    }
}
