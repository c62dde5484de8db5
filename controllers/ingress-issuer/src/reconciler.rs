//! Reconciliation pass over all Ingresses.
//!
//! One pass lists every Ingress and, for each host rule and each matching
//! cluster issuer, makes sure the Ingress carries the issuer annotation and a
//! TLS entry for the host. cert-manager picks it up from there.
//!
//! Each Ingress is processed as a unit on its own snapshot. The annotation
//! and the TLS entry are written with two separate updates; either may fail
//! on its own and the next pass finishes the job.

use crate::config::MatchPolicy;
use crate::error::ControllerError;
use crate::issuer::{IssuerRule, IssuerRuleSet};
use crate::plan::{self, MutationPlan};
use chrono::{DateTime, Utc};
use ingress_client::{Ingress, IngressClientTrait};
use kube::ResourceExt;
use tracing::{debug, error, info};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub started_at: DateTime<Utc>,
    /// Ingresses returned by the list call
    pub ingresses: usize,
    pub updates_applied: usize,
    pub updates_failed: usize,
}

impl PassSummary {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            ingresses: 0,
            updates_applied: 0,
            updates_failed: 0,
        }
    }
}

/// Reconciles Ingress issuer annotations and TLS entries.
pub struct Reconciler {
    client: Box<dyn IngressClientTrait>,
    issuers: IssuerRuleSet,
    match_policy: MatchPolicy,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("issuers", &self.issuers)
            .field("match_policy", &self.match_policy)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        client: Box<dyn IngressClientTrait>,
        issuers: IssuerRuleSet,
        match_policy: MatchPolicy,
    ) -> Self {
        Self {
            client,
            issuers,
            match_policy,
        }
    }

    /// Runs one full pass.
    ///
    /// Only a failed list call fails the pass. Update failures are logged,
    /// counted and left for the next pass.
    pub async fn run_pass(&self) -> Result<PassSummary, ControllerError> {
        let mut summary = PassSummary::new();

        let ingresses = self
            .client
            .list_ingresses()
            .await
            .map_err(ControllerError::ListIngresses)?;
        summary.ingresses = ingresses.len();

        for ingress in ingresses {
            self.reconcile_ingress(ingress, &mut summary).await;
        }

        info!(
            "Reconciliation pass started at {} complete: {} Ingresses, {} updates applied, {} updates failed",
            summary.started_at.to_rfc3339(),
            summary.ingresses,
            summary.updates_applied,
            summary.updates_failed
        );
        Ok(summary)
    }

    /// Processes every host of one Ingress against every issuer rule.
    ///
    /// `ingress` is this unit's snapshot: local mutations land on it and a
    /// successful update replaces it with the stored object.
    async fn reconcile_ingress(&self, mut ingress: Ingress, summary: &mut PassSummary) {
        let name = ingress.name_any();
        let namespace = ingress.namespace().unwrap_or_default();
        debug!("Processing Ingress {}/{}", namespace, name);

        for host in plan::host_rules(&ingress) {
            for issuer in &self.issuers {
                if !issuer.matches(&host) {
                    continue;
                }
                debug!(
                    "Ingress {}/{} host {} matches cluster issuer {} ({})",
                    namespace,
                    name,
                    host,
                    issuer.name(),
                    issuer.pattern()
                );

                match plan::plan(&ingress, &host, issuer) {
                    Some(mutation) => {
                        self.apply_plan(&mut ingress, &host, issuer, &mutation, summary)
                            .await;
                    }
                    None => {
                        debug!(
                            "Ingress {}/{} already has TLS and annotation for {}",
                            namespace, name, host
                        );
                    }
                }

                if self.match_policy == MatchPolicy::First {
                    break;
                }
            }
        }
    }

    /// Issues the annotation update and the TLS update independently.
    async fn apply_plan(
        &self,
        ingress: &mut Ingress,
        host: &str,
        issuer: &IssuerRule,
        mutation: &MutationPlan,
        summary: &mut PassSummary,
    ) {
        let name = ingress.name_any();
        let namespace = ingress.namespace().unwrap_or_default();

        if mutation.needs_annotation {
            plan::set_issuer_annotation(ingress, issuer.name());
            match self.client.update_ingress(ingress).await {
                Ok(updated) => {
                    info!(
                        "Ingress {}/{} annotation {} set to {}",
                        namespace,
                        name,
                        plan::CLUSTER_ISSUER_ANNOTATION,
                        issuer.name()
                    );
                    *ingress = updated;
                    summary.updates_applied += 1;
                }
                Err(e) => {
                    error!(
                        "Unable to update annotations of Ingress {}/{} for cluster issuer {}: {}",
                        namespace,
                        name,
                        issuer.name(),
                        e
                    );
                    summary.updates_failed += 1;
                }
            }
        }

        if mutation.needs_tls_entry {
            plan::append_tls_entry(ingress, host, &mutation.secret_name);
            match self.client.update_ingress(ingress).await {
                Ok(updated) => {
                    info!(
                        "Ingress {}/{} TLS entry added for host {} (secret {})",
                        namespace, name, host, mutation.secret_name
                    );
                    *ingress = updated;
                    summary.updates_applied += 1;
                }
                Err(e) => {
                    error!(
                        "Unable to update TLS section of Ingress {}/{} for host {} and cluster issuer {}: {}",
                        namespace,
                        name,
                        host,
                        issuer.name(),
                        e
                    );
                    summary.updates_failed += 1;
                }
            }
        }
    }
}
