//! Typed CRUD client over one `/api/{resource}` collection.

use std::fmt;
use std::marker::PhantomData;

use emporium_core::{Collection, OrderDto, OrderId, ProductDto, ProductId, UserDto, UserId};
use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::endpoints::Service;
use crate::error::ClientError;

/// Describes one CRUD resource exposed by a service.
pub trait Resource {
    /// The service that owns the resource.
    const SERVICE: Service;
    /// Collection path, e.g. `/api/users`.
    const PATH: &'static str;
    /// Path id type.
    type Id: fmt::Display + Copy + Send + Sync;
    /// Wire record.
    type Record: Serialize + DeserializeOwned + Send + Sync;
}

/// Marker for `/api/users`.
#[derive(Debug, Clone, Copy)]
pub enum Users {}

/// Marker for `/api/products`.
#[derive(Debug, Clone, Copy)]
pub enum Products {}

/// Marker for `/api/orders`.
#[derive(Debug, Clone, Copy)]
pub enum Orders {}

impl Resource for Users {
    const SERVICE: Service = Service::User;
    const PATH: &'static str = "/api/users";
    type Id = UserId;
    type Record = UserDto;
}

impl Resource for Products {
    const SERVICE: Service = Service::Product;
    const PATH: &'static str = "/api/products";
    type Id = ProductId;
    type Record = ProductDto;
}

impl Resource for Orders {
    const SERVICE: Service = Service::Order;
    const PATH: &'static str = "/api/orders";
    type Id = OrderId;
    type Record = OrderDto;
}

pub type UserClient = ResourceClient<Users>;
pub type ProductClient = ResourceClient<Products>;
pub type OrderClient = ResourceClient<Orders>;

/// Liveness as seen from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Health {
    /// `/actuator/health` answered 2xx.
    Up,
    /// The service answered with this non-success status.
    Down(u16),
    /// Nothing answered.
    Unavailable(String),
}

impl Health {
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down(status) => write!(f, "down ({status})"),
            Self::Unavailable(_) => f.write_str("unavailable"),
        }
    }
}

/// HTTP client for one resource.
pub struct ResourceClient<R> {
    http: reqwest::Client,
    base: String,
    _resource: PhantomData<R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("service", &R::SERVICE.name())
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Client for the service at `base_url`. A context path in the URL is
    /// kept.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http,
            base: base_url.as_str().trim_end_matches('/').to_owned(),
            _resource: PhantomData,
        }
    }

    /// The service's base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base, R::PATH)
    }

    fn item_url(&self, id: R::Id) -> String {
        format!("{}{}/{id}", self.base, R::PATH)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let service = R::SERVICE.name();
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(service, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(service, status = status.as_u16(), "Request failed");
            return Err(ClientError::from_status(service, status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::UnexpectedResponse {
                service,
                detail: e.to_string(),
            })
    }

    /// `GET /api/{resource}`
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the request fails or is rejected.
    pub async fn list(&self) -> Result<Vec<R::Record>, ClientError> {
        let collection: Collection<R::Record> =
            self.send(self.http.get(self.collection_url())).await?;
        Ok(collection.into_inner())
    }

    /// `GET /api/{resource}/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    pub async fn get(&self, id: R::Id) -> Result<R::Record, ClientError> {
        self.send(self.http.get(self.item_url(id))).await
    }

    /// `POST /api/{resource}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` if the service refuses the record.
    pub async fn create(&self, record: &R::Record) -> Result<R::Record, ClientError> {
        self.send(self.http.post(self.collection_url()).json(record))
            .await
    }

    /// `PUT /api/{resource}` with the id inside the record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` without an id and
    /// `ClientError::NotFound` for an unknown one.
    pub async fn update(&self, record: &R::Record) -> Result<R::Record, ClientError> {
        self.send(self.http.put(self.collection_url()).json(record))
            .await
    }

    /// `PUT /api/{resource}/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    pub async fn update_by_id(&self, id: R::Id, record: &R::Record) -> Result<R::Record, ClientError> {
        self.send(self.http.put(self.item_url(id)).json(record)).await
    }

    /// `DELETE /api/{resource}/{id}`. Unknown ids succeed.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the request fails.
    pub async fn delete(&self, id: R::Id) -> Result<bool, ClientError> {
        self.send(self.http.delete(self.item_url(id))).await
    }

    /// `GET /actuator/health`, never failing.
    pub async fn health(&self) -> Health {
        match self
            .http
            .get(format!("{}/actuator/health", self.base))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Health::Up,
            Ok(response) => Health::Down(response.status().as_u16()),
            Err(e) => Health::Unavailable(e.to_string()),
        }
    }
}

impl ResourceClient<Products> {
    /// `GET /api/products?sku=...`
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the request fails or the URL is invalid.
    pub async fn find_by_sku(&self, sku: &str) -> Result<Vec<ProductDto>, ClientError> {
        let mut url = Url::parse(&self.collection_url())?;
        url.query_pairs_mut().append_pair("sku", sku);
        let collection: Collection<ProductDto> = self.send(self.http.get(url)).await?;
        Ok(collection.into_inner())
    }
}
