//! Ingress Issuer Controller
//!
//! Keeps Ingress resources in line with a configured set of cert-manager
//! cluster issuers.
//!
//! For every Ingress host matching an issuer's hostname pattern, the
//! controller sets the `cert-manager.io/cluster-issuer` annotation and adds a
//! TLS entry for the host, so cert-manager can issue the certificate.

mod config;
mod controller;
mod error;
mod issuer;
mod plan;
mod reconciler;
mod scheduler;

#[cfg(test)]
mod test_utils;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use controller::Controller;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    // kube's rustls needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    info!("Starting Ingress Issuer Controller");

    // Load configuration from environment variables
    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Cluster issuers: {}", config.issuers.len());
    for (position, issuer) in config.issuers.iter().enumerate() {
        info!(
            "  Cluster issuer {}: {} (pattern {})",
            position + 1,
            issuer.name(),
            issuer.pattern()
        );
    }
    info!("  Reconcile interval: {:?}", config.reconcile_interval);
    info!("  List failure policy: {}", config.list_failure_policy);
    info!("  Issuer match policy: {}", config.match_policy);
    info!(
        "  Namespace: {}",
        config.namespace.as_deref().unwrap_or("all namespaces")
    );

    // Initialize and run controller
    let controller = Controller::new(config).await?;
    controller.run().await?;

    info!("Ingress Issuer Controller stopped");
    Ok(())
}
