//! Integration tests for Emporium.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process scenarios (no database, no running services)
//! cargo test -p emporium-integration-tests
//!
//! # End-to-end against services started separately
//! cargo test -p emporium-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `scenarios` - all three services in-process over memory stores
//! - `discovery` - services registering with a registry and clients
//!   resolving through it
//! - `e2e` - `#[ignore]`d; targets `USER_SERVICE_URL` and friends and skips
//!   when a service is unavailable

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use emporium_client::{EmporiumClient, Endpoints, Service};
use emporium_discovery::{NoopRegistry, RegistryError, ServiceInstance, ServiceRegistry};
use emporium_runtime::ServiceConfig;
use emporium_runtime::server;
use tokio::net::TcpListener;
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;
use url::Url;

/// Options for [`TestContext::start_with`].
#[derive(Clone, Default)]
pub struct ContextOptions {
    /// Serve every service under `/{service-name}` as well as at the root.
    pub context_paths: bool,
    /// Registry the services register with. Defaults to [`NoopRegistry`].
    pub registry: Option<Arc<dyn ServiceRegistry>>,
}

/// The three services running in-process on ephemeral ports.
pub struct TestContext {
    pub client: EmporiumClient,
    pub endpoints: Endpoints,
    shutdown: Vec<oneshot::Sender<()>>,
    tasks: Vec<JoinHandle<io::Result<()>>>,
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl TestContext {
    /// Start all services with empty memory stores and no registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a port cannot be bound.
    pub async fn start() -> io::Result<Self> {
        Self::start_with(ContextOptions::default()).await
    }

    /// Start all services with `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if a port cannot be bound.
    pub async fn start_with(options: ContextOptions) -> io::Result<Self> {
        let registry = options
            .registry
            .unwrap_or_else(|| Arc::new(NoopRegistry));

        let mut shutdown = Vec::new();
        let mut tasks = Vec::new();
        let mut urls = HashMap::new();

        for service in Service::ALL {
            let mut config = ServiceConfig::in_memory(service.name());
            if options.context_paths {
                config.context_path = Some(format!("/{}", service.name()));
            }

            let router = match service {
                Service::User => {
                    emporium_user_service::app(emporium_user_service::AppState::in_memory())
                }
                Service::Product => emporium_product_service::app(
                    emporium_product_service::AppState::in_memory(),
                ),
                Service::Order => {
                    emporium_order_service::app(emporium_order_service::AppState::in_memory())
                }
            };

            let listener = TcpListener::bind(config.socket_addr()).await?;
            let url = config
                .advertised_url(listener.local_addr()?)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            urls.insert(service, url);

            let (tx, rx) = oneshot::channel::<()>();
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                server::run(listener, &config, router, registry, async move {
                    let _ = rx.await;
                })
                .await
            }));
            shutdown.push(tx);
        }

        let endpoints = Endpoints {
            user: take(&mut urls, Service::User)?,
            product: take(&mut urls, Service::Product)?,
            order: take(&mut urls, Service::Order)?,
        };
        let client = EmporiumClient::new(&endpoints).map_err(io::Error::other)?;

        Ok(Self {
            client,
            endpoints,
            shutdown,
            tasks,
        })
    }

    /// Stop every service and wait for it to finish (deregistration
    /// included).
    pub async fn stop(self) {
        for tx in self.shutdown {
            let _ = tx.send(());
        }
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

fn take(urls: &mut HashMap<Service, Url>, service: Service) -> io::Result<Url> {
    urls.remove(&service)
        .ok_or_else(|| io::Error::other(format!("{service} was not started")))
}

/// A registry that lives in the test process.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    instances: RwLock<HashMap<String, Vec<ServiceInstance>>>,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered instances across all services.
    pub async fn registered(&self) -> usize {
        self.instances.read().await.values().map(Vec::len).sum()
    }

    /// Wait until `count` instances are registered, up to `timeout`.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let poll = async {
            while self.registered().await < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }
}

#[async_trait]
impl ServiceRegistry for MemoryRegistry {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn register(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let mut instances = self.instances.write().await;
        let entries = instances.entry(instance.service.clone()).or_default();
        entries.retain(|i| i.instance_id != instance.instance_id);
        entries.push(instance.clone());
        Ok(())
    }

    async fn heartbeat(&self, _instance: &ServiceInstance) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn deregister(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        if let Some(entries) = self.instances.write().await.get_mut(&instance.service) {
            entries.retain(|i| i.instance_id != instance.instance_id);
        }
        Ok(())
    }

    async fn instances(&self, service: &str) -> Result<Vec<ServiceInstance>, RegistryError> {
        Ok(self
            .instances
            .read()
            .await
            .get(service)
            .cloned()
            .unwrap_or_default())
    }
}

/// Millisecond timestamp for unique emails and SKUs.
#[must_use]
pub fn unique_suffix() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Client for externally started services, or `None` when any of them is
/// not up.
pub async fn external_client() -> Option<EmporiumClient> {
    let endpoints = match Endpoints::from_env().await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            report_skip(&e.to_string());
            return None;
        }
    };
    let client = EmporiumClient::new(&endpoints).ok()?;

    for (service, health) in client.probe().await {
        if !health.is_up() {
            report_skip(&format!("{service} is {health}"));
            return None;
        }
    }
    Some(client)
}

#[allow(clippy::print_stderr)]
fn report_skip(reason: &str) {
    eprintln!("skipping: {reason}");
}
