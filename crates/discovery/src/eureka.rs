//! Eureka-compatible registry client.
//!
//! Endpoints (relative to the configured base, e.g. `http://host:8761/eureka`):
//!
//! ```text
//! POST   /apps/{APP}                 register
//! PUT    /apps/{APP}/{instanceId}    heartbeat (404 means the lease expired)
//! DELETE /apps/{APP}/{instanceId}    deregister
//! GET    /apps/{APP}                 lookup
//! ```
//!
//! Lookups are cached for 30 seconds.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::{InstanceStatus, RegistryError, ServiceInstance, ServiceRegistry};

const LOOKUP_TTL: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a Eureka server.
#[derive(Clone)]
pub struct EurekaRegistry {
    inner: Arc<EurekaRegistryInner>,
}

struct EurekaRegistryInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, Vec<ServiceInstance>>,
}

impl std::fmt::Debug for EurekaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EurekaRegistry")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl EurekaRegistry {
    /// Create a client for the Eureka server at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(LOOKUP_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(EurekaRegistryInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        }
    }

    fn app_url(&self, service: &str) -> String {
        format!("{}/apps/{}", self.inner.base_url, app_name(service))
    }

    fn instance_url(&self, instance: &ServiceInstance) -> String {
        format!("{}/{}", self.app_url(&instance.service), instance.instance_id)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<(), RegistryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

#[async_trait]
impl ServiceRegistry for EurekaRegistry {
    fn kind(&self) -> &'static str {
        "eureka"
    }

    #[tracing::instrument(skip(self, instance), fields(service = %instance.service, instance_id = %instance.instance_id))]
    async fn register(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let response = self
            .inner
            .client
            .post(self.app_url(&instance.service))
            .json(&registration_body(instance))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        self.inner.cache.invalidate(&instance.service).await;
        tracing::info!("Registered with Eureka");
        Ok(())
    }

    async fn heartbeat(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let response = self
            .inner
            .client
            .put(self.instance_url(instance))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!(
                service = %instance.service,
                instance_id = %instance.instance_id,
                "Lease expired, re-registering"
            );
            return self.register(instance).await;
        }

        Self::ensure_success(response).await
    }

    async fn deregister(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let response = self
            .inner
            .client
            .delete(self.instance_url(instance))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        self.inner.cache.invalidate(&instance.service).await;
        tracing::info!(service = %instance.service, "Deregistered from Eureka");
        Ok(())
    }

    async fn instances(&self, service: &str) -> Result<Vec<ServiceInstance>, RegistryError> {
        let key = service.to_ascii_lowercase();

        if let Some(cached) = self.inner.cache.get(&key).await {
            tracing::debug!(service, "Cache hit for service lookup");
            return Ok(cached);
        }

        let response = self
            .inner
            .client
            .get(self.app_url(service))
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        let instances = parse_application(&text)?;
        self.inner.cache.insert(key, instances.clone()).await;
        Ok(instances)
    }
}

/// Eureka application names are upper-case.
fn app_name(service: &str) -> String {
    service.to_ascii_uppercase()
}

fn registration_body(instance: &ServiceInstance) -> serde_json::Value {
    let host = instance.base_url.host_str().unwrap_or("localhost");
    let port = instance.base_url.port_or_known_default().unwrap_or(80);
    let home = instance.base_url.as_str();
    let health = instance
        .base_url
        .join("actuator/health")
        .map_or_else(|_| home.to_owned(), |u| u.to_string());

    json!({
        "instance": {
            "instanceId": instance.instance_id,
            "hostName": host,
            "app": app_name(&instance.service),
            "ipAddr": host,
            "vipAddress": instance.service,
            "status": instance.status.as_str(),
            "port": { "$": port, "@enabled": "true" },
            "homePageUrl": home,
            "statusPageUrl": health,
            "healthCheckUrl": health,
            "dataCenterInfo": {
                "@class": "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo",
                "name": "MyOwn"
            }
        }
    })
}

// =============================================================================
// Lookup response parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApplicationEnvelope {
    application: Application,
}

#[derive(Debug, Deserialize)]
struct Application {
    name: String,
    #[serde(default)]
    instance: OneOrMany<EurekaInstance>,
}

/// Eureka renders a single instance as an object instead of a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EurekaInstance {
    instance_id: Option<String>,
    host_name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    port: Option<EurekaPort>,
    #[serde(default)]
    home_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EurekaPort {
    #[serde(rename = "$")]
    value: u16,
}

fn parse_application(text: &str) -> Result<Vec<ServiceInstance>, RegistryError> {
    let envelope: ApplicationEnvelope =
        serde_json::from_str(text).map_err(|e| RegistryError::Parse(e.to_string()))?;
    let service = envelope.application.name.to_ascii_lowercase();

    envelope
        .application
        .instance
        .into_vec()
        .into_iter()
        .map(|raw| -> Result<ServiceInstance, RegistryError> {
            let base_url = match raw.home_page_url.as_deref().map(Url::parse) {
                Some(Ok(url)) => url,
                _ => {
                    let port = raw.port.as_ref().map_or(80, |p| p.value);
                    Url::parse(&format!("http://{}:{port}/", raw.host_name))?
                }
            };
            let instance_id = raw
                .instance_id
                .unwrap_or_else(|| format!("{}:{service}", raw.host_name));

            Ok(ServiceInstance {
                service: service.clone(),
                instance_id,
                base_url,
                status: raw
                    .status
                    .as_deref()
                    .map_or(InstanceStatus::Unknown, InstanceStatus::parse),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance_array() {
        let text = r#"{
            "application": {
                "name": "ORDER-SERVICE",
                "instance": [
                    {"instanceId": "a", "hostName": "10.0.0.1", "status": "UP",
                     "port": {"$": 8300, "@enabled": "true"},
                     "homePageUrl": "http://10.0.0.1:8300/"},
                    {"instanceId": "b", "hostName": "10.0.0.2", "status": "DOWN",
                     "port": {"$": 8300, "@enabled": "true"}}
                ]
            }
        }"#;

        let instances = parse_application(text).unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].service, "order-service");
        assert_eq!(instances[0].base_url.as_str(), "http://10.0.0.1:8300/");
        assert!(instances[0].is_available());
        assert_eq!(instances[1].base_url.as_str(), "http://10.0.0.2:8300/");
        assert_eq!(instances[1].status, InstanceStatus::Down);
    }

    #[test]
    fn test_parse_single_instance_object() {
        let text = r#"{
            "application": {
                "name": "USER-SERVICE",
                "instance": {"hostName": "users.internal", "status": "UP",
                             "port": {"$": 8700}}
            }
        }"#;

        let instances = parse_application(text).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].instance_id, "users.internal:user-service");
        assert_eq!(instances[0].base_url.as_str(), "http://users.internal:8700/");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_application("<xml/>"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_registration_body_shape() {
        let instance = ServiceInstance::new(
            "product-service",
            Url::parse("http://10.0.0.9:8500/product-service/").unwrap(),
        );
        let body = registration_body(&instance);
        assert_eq!(body["instance"]["app"], "PRODUCT-SERVICE");
        assert_eq!(body["instance"]["port"]["$"], 8500);
        assert_eq!(
            body["instance"]["healthCheckUrl"],
            "http://10.0.0.9:8500/product-service/actuator/health"
        );
    }
}
