//! Report whether each service answers its liveness endpoint.

use emporium_client::{EmporiumClient, Endpoints, Health};

/// Print one line per service. Fails if any service is not up.
///
/// # Errors
///
/// Returns an error if endpoints cannot be resolved or a service is not up.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let endpoints = Endpoints::from_env().await?;
    let client = EmporiumClient::new(&endpoints)?;

    let mut failing = 0;
    for (service, health) in client.probe().await {
        if let Health::Unavailable(reason) = &health {
            tracing::debug!(%service, reason, "Probe failed");
        }
        if !health.is_up() {
            failing += 1;
        }
        #[allow(clippy::print_stdout)]
        {
            println!("{service:<16} {:<32} {health}", endpoints.get(service).as_str());
        }
    }

    if failing > 0 {
        return Err(format!("{failing} service(s) not up").into());
    }
    Ok(())
}

