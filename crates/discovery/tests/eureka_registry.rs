//! Eureka client tests against an in-process fake registry.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};
use emporium_discovery::{
    EurekaRegistry, RegistryError, ServiceInstance, ServiceRegistry, first_available,
};
use serde_json::{Value, json};
use url::Url;

type Apps = Arc<Mutex<HashMap<String, Vec<Value>>>>;

async fn register(State(apps): State<Apps>, Path(app): Path<String>, Json(body): Json<Value>) -> StatusCode {
    let instance = body["instance"].clone();
    apps.lock().unwrap().entry(app).or_default().push(instance);
    StatusCode::NO_CONTENT
}

async fn lookup(State(apps): State<Apps>, Path(app): Path<String>) -> Result<Json<Value>, StatusCode> {
    let apps = apps.lock().unwrap();
    match apps.get(&app) {
        Some(instances) if !instances.is_empty() => Ok(Json(json!({
            "application": { "name": app, "instance": instances }
        }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn renew(State(apps): State<Apps>, Path((app, id)): Path<(String, String)>) -> StatusCode {
    let apps = apps.lock().unwrap();
    let known = apps
        .get(&app)
        .is_some_and(|instances| instances.iter().any(|i| i["instanceId"] == id.as_str()));
    if known { StatusCode::OK } else { StatusCode::NOT_FOUND }
}

async fn cancel(State(apps): State<Apps>, Path((app, id)): Path<(String, String)>) -> StatusCode {
    if let Some(instances) = apps.lock().unwrap().get_mut(&app) {
        instances.retain(|i| i["instanceId"] != id.as_str());
    }
    StatusCode::OK
}

async fn spawn_fake_eureka() -> (Url, Apps) {
    let apps: Apps = Arc::default();
    let app = Router::new()
        .route("/eureka/apps/{app}", post(register).get(lookup))
        .route("/eureka/apps/{app}/{id}", put(renew).delete(cancel))
        .with_state(apps.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}/eureka")).unwrap(), apps)
}

#[tokio::test]
async fn test_register_lookup_deregister() {
    let (base, apps) = spawn_fake_eureka().await;
    let registry = EurekaRegistry::new(base);

    let instance = ServiceInstance::new("user-service", Url::parse("http://127.0.0.1:8700/").unwrap());
    registry.register(&instance).await.unwrap();
    assert_eq!(apps.lock().unwrap()["USER-SERVICE"].len(), 1);

    let found = registry.instances("user-service").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].base_url.as_str(), "http://127.0.0.1:8700/");
    assert_eq!(found[0].instance_id, instance.instance_id);

    registry.heartbeat(&instance).await.unwrap();

    registry.deregister(&instance).await.unwrap();
    assert!(registry.instances("user-service").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_heartbeat_re_registers_expired_lease() {
    let (base, apps) = spawn_fake_eureka().await;
    let registry = EurekaRegistry::new(base);

    let instance = ServiceInstance::new("order-service", Url::parse("http://127.0.0.1:8300/").unwrap());
    registry.heartbeat(&instance).await.unwrap();

    assert_eq!(apps.lock().unwrap()["ORDER-SERVICE"].len(), 1);
}

#[tokio::test]
async fn test_unknown_service_is_empty() {
    let (base, _apps) = spawn_fake_eureka().await;
    let registry = EurekaRegistry::new(base);

    assert!(registry.instances("payment-service").await.unwrap().is_empty());
    assert!(first_available(&registry, "payment-service").await.is_none());
}

#[tokio::test]
async fn test_unreachable_registry_is_tolerated() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let registry = EurekaRegistry::new(Url::parse(&format!("http://{addr}/eureka")).unwrap());
    assert!(matches!(
        registry.instances("user-service").await,
        Err(RegistryError::Http(_))
    ));
    assert!(first_available(&registry, "user-service").await.is_none());
}
