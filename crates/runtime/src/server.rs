//! Server bootstrap: routing prefix, binding, registry lifecycle and graceful
//! shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use emporium_discovery::{ServiceInstance, ServiceRegistry};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ServiceConfig;
use crate::middleware::with_observability;

/// How often the registry lease is renewed.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Serve `router` under the optional context path as well as at the root.
pub fn with_context_path(router: Router, context_path: Option<&str>) -> Router {
    match context_path {
        Some(prefix) => Router::new()
            .nest(prefix, router.clone())
            .merge(router),
        None => router,
    }
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(
    config: &ServiceConfig,
    router: Router,
    registry: Arc<dyn ServiceRegistry>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    run(listener, config, router, registry, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// Registers with the registry after binding, renews the lease every
/// [`HEARTBEAT_INTERVAL`] and deregisters once in-flight requests finish.
/// Registry failures are logged and never stop the server.
///
/// # Errors
///
/// Returns an error if the server fails.
pub async fn run<F>(
    listener: TcpListener,
    config: &ServiceConfig,
    router: Router,
    registry: Arc<dyn ServiceRegistry>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = with_observability(with_context_path(router, config.context_path.as_deref()));

    let addr = listener.local_addr()?;
    tracing::info!(
        service = %config.service_name,
        context_path = config.context_path.as_deref().unwrap_or(""),
        "{} listening on {}",
        config.service_name,
        addr
    );

    let instance = match config.advertised_url(addr) {
        Ok(url) => Some(ServiceInstance::new(&config.service_name, url)),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot build advertised URL, skipping registration");
            None
        }
    };

    let heartbeat = match &instance {
        Some(instance) => {
            register(registry.as_ref(), instance).await;
            Some(spawn_heartbeat(Arc::clone(&registry), instance.clone()))
        }
        None => None,
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    if let Some(task) = heartbeat {
        task.abort();
    }
    if let Some(instance) = instance
        && let Err(e) = registry.deregister(&instance).await
    {
        tracing::warn!(registry = registry.kind(), error = %e, "Deregistration failed");
    }

    tracing::info!(service = %config.service_name, "Server stopped");
    Ok(())
}

/// Best-effort registration.
async fn register(registry: &dyn ServiceRegistry, instance: &ServiceInstance) {
    match registry.register(instance).await {
        Ok(()) => tracing::info!(
            registry = registry.kind(),
            instance_id = %instance.instance_id,
            url = %instance.base_url,
            "Registered instance"
        ),
        Err(e) => tracing::warn!(
            registry = registry.kind(),
            error = %e,
            "Registration failed, serving without discovery"
        ),
    }
}

/// Renew the lease until aborted.
fn spawn_heartbeat(registry: Arc<dyn ServiceRegistry>, instance: ServiceInstance) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = registry.heartbeat(&instance).await {
                tracing::warn!(registry = registry.kind(), error = %e, "Heartbeat failed");
            }
        }
    })
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
