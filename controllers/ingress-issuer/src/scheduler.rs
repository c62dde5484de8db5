//! Fixed-interval pass scheduler.
//!
//! Runs a reconciliation pass immediately, then again a fixed delay after the
//! previous one finished, until shutdown is requested. Passes never overlap.

use crate::config::ListFailurePolicy;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Drives the reconciler at a fixed interval.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    list_failure_policy: ListFailurePolicy,
}

impl Scheduler {
    pub fn new(interval: Duration, list_failure_policy: ListFailurePolicy) -> Self {
        Self {
            interval,
            list_failure_policy,
        }
    }

    /// Runs passes until `shutdown` turns true or its sender is dropped.
    ///
    /// A pass in progress always runs to completion. A failed list call ends
    /// the loop with the error under `ListFailurePolicy::Exit`; under
    /// `ListFailurePolicy::Retry` it is logged and the next pass runs after
    /// the usual interval.
    pub async fn run(
        &self,
        reconciler: &Reconciler,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), ControllerError> {
        info!(
            "Scheduler started: interval {:?}, list failure policy {}",
            self.interval, self.list_failure_policy
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = reconciler.run_pass().await {
                match self.list_failure_policy {
                    ListFailurePolicy::Exit => {
                        error!("Reconciliation pass failed, stopping: {}", e);
                        return Err(e);
                    }
                    ListFailurePolicy::Retry => {
                        warn!(
                            "Reconciliation pass failed, retrying in {:?}: {}",
                            self.interval, e
                        );
                    }
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // sender gone, nobody can request shutdown any more
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped");
        Ok(())
    }
}
