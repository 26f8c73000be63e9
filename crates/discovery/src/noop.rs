//! Registry that does nothing.

use async_trait::async_trait;

use crate::{RegistryError, ServiceInstance, ServiceRegistry};

/// A registry for environments without discovery.
///
/// Registration always succeeds and lookups are always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistry;

#[async_trait]
impl ServiceRegistry for NoopRegistry {
    fn kind(&self) -> &'static str {
        "noop"
    }

    async fn register(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        tracing::debug!(service = %instance.service, "No registry configured, skipping registration");
        Ok(())
    }

    async fn heartbeat(&self, _instance: &ServiceInstance) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn deregister(&self, _instance: &ServiceInstance) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn instances(&self, _service: &str) -> Result<Vec<ServiceInstance>, RegistryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    #[tokio::test]
    async fn test_noop_accepts_everything_and_knows_nothing() {
        let instance = ServiceInstance::new("user-service", Url::parse("http://localhost:8700").unwrap());
        NoopRegistry.register(&instance).await.unwrap();
        NoopRegistry.heartbeat(&instance).await.unwrap();
        assert!(NoopRegistry.instances("user-service").await.unwrap().is_empty());
        NoopRegistry.deregister(&instance).await.unwrap();
    }
}
