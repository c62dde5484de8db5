//! Desired state calculation for a single Ingress host.
//!
//! Pure functions only: given an Ingress snapshot, one of its hosts and an
//! issuer rule, decide which pieces (issuer annotation, TLS entry) are
//! missing. The reconciler applies the result.

use crate::issuer::IssuerRule;
use ingress_client::{Ingress, IngressSpec, IngressTLS};
use kube::ResourceExt;

/// Annotation read by cert-manager to pick the ClusterIssuer
pub const CLUSTER_ISSUER_ANNOTATION: &str = "cert-manager.io/cluster-issuer";

/// Changes needed to bring one host of an Ingress to the desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationPlan {
    /// Issuer annotation is absent or names another issuer
    pub needs_annotation: bool,
    /// No TLS entry lists the host
    pub needs_tls_entry: bool,
    /// Secret name the new TLS entry would use
    pub secret_name: String,
}

/// Computes the mutations needed for `host` under `issuer`.
///
/// Returns `None` when the issuer's pattern does not match the host, or when
/// the host already has a TLS entry and the annotation already names this
/// issuer.
pub fn plan(ingress: &Ingress, host: &str, issuer: &IssuerRule) -> Option<MutationPlan> {
    if host.is_empty() || !issuer.matches(host) {
        return None;
    }

    let needs_annotation = !has_issuer_annotation(ingress, issuer.name());
    let needs_tls_entry = !has_tls_host(ingress, host);
    if !needs_annotation && !needs_tls_entry {
        return None;
    }

    Some(MutationPlan {
        needs_annotation,
        needs_tls_entry,
        secret_name: secret_name_for(host),
    })
}

/// Secret name for a host: every `.` becomes `-`, then `-crt` is appended.
pub fn secret_name_for(host: &str) -> String {
    format!("{}-crt", host.replace('.', "-"))
}

/// Non-empty hosts of the Ingress rules, in declaration order, duplicates kept.
pub fn host_rules(ingress: &Ingress) -> Vec<String> {
    ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.rules.as_ref())
        .map(|rules| {
            rules
                .iter()
                .filter_map(|rule| rule.host.as_deref())
                .filter(|host| !host.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// True when some TLS entry lists `host`.
pub fn has_tls_host(ingress: &Ingress, host: &str) -> bool {
    ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.tls.as_ref())
        .map(|entries| {
            entries.iter().any(|tls| {
                tls.hosts
                    .as_ref()
                    .is_some_and(|hosts| hosts.iter().any(|h| h == host))
            })
        })
        .unwrap_or(false)
}

/// True when the issuer annotation is present and equals `issuer`.
pub fn has_issuer_annotation(ingress: &Ingress, issuer: &str) -> bool {
    ingress
        .annotations()
        .get(CLUSTER_ISSUER_ANNOTATION)
        .is_some_and(|value| value == issuer)
}

/// Sets the issuer annotation on the local snapshot.
pub fn set_issuer_annotation(ingress: &mut Ingress, issuer: &str) {
    ingress
        .annotations_mut()
        .insert(CLUSTER_ISSUER_ANNOTATION.to_string(), issuer.to_string());
}

/// Appends `{hosts: [host], secretName}` to the local snapshot's TLS list.
///
/// Existing entries are left untouched.
pub fn append_tls_entry(ingress: &mut Ingress, host: &str, secret_name: &str) {
    ingress
        .spec
        .get_or_insert_with(IngressSpec::default)
        .tls
        .get_or_insert_with(Vec::new)
        .push(IngressTLS {
            hosts: Some(vec![host.to_string()]),
            secret_name: Some(secret_name.to_string()),
        });
}

/// Applies a plan to the local snapshot, both parts at once.
#[cfg(test)]
pub fn apply(ingress: &mut Ingress, host: &str, issuer: &IssuerRule, plan: &MutationPlan) {
    if plan.needs_annotation {
        set_issuer_annotation(ingress, issuer.name());
    }
    if plan.needs_tls_entry {
        append_tls_entry(ingress, host, &plan.secret_name);
    }
}
