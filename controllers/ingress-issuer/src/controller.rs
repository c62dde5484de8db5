//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the Kubernetes
//! client, the reconciler and the scheduler together and handles shutdown
//! signals.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::scheduler::Scheduler;
use ingress_client::KubeIngressClient;
use kube::Client;
use tokio::sync::watch;
use tracing::{info, warn};

/// Main controller for Ingress issuer management.
#[derive(Debug)]
pub struct Controller {
    reconciler: Reconciler,
    scheduler: Scheduler,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing Ingress Issuer Controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;
        let ingress_client = KubeIngressClient::new(kube_client, config.namespace);

        let reconciler = Reconciler::new(
            Box::new(ingress_client),
            config.issuers,
            config.match_policy,
        );
        let scheduler = Scheduler::new(config.reconcile_interval, config.list_failure_policy);

        Ok(Self {
            reconciler,
            scheduler,
        })
    }

    /// Runs the controller until shutdown or a fatal error.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Ingress Issuer Controller running");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let terminate = terminate_signal()?;

        tokio::spawn(async move {
            let interrupt = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            tokio::select! {
                _ = interrupt => {
                    info!("Interrupt received, finishing current pass");
                }
                _ = terminate => {
                    info!("Termination signal received, finishing current pass");
                }
            }
            let _ = shutdown_tx.send(true);
        });

        self.scheduler.run(&self.reconciler, shutdown_rx).await
    }
}

/// Resolves on SIGTERM, the signal Kubernetes sends when stopping a pod.
#[cfg(unix)]
fn terminate_signal()
-> Result<impl std::future::Future<Output = ()> + Send + 'static, ControllerError> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        terminate.recv().await;
    })
}

#[cfg(not(unix))]
fn terminate_signal()
-> Result<impl std::future::Future<Output = ()> + Send + 'static, ControllerError> {
    Ok(std::future::pending::<()>())
}
