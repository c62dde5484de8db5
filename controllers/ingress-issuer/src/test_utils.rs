//! Test utilities for unit testing the reconciler
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crate::issuer::{IssuerRule, IssuerRuleSet};
#[cfg(test)]
use ingress_client::Ingress;

#[cfg(test)]
pub const DEV_ISSUER_PATTERN: &str = r"(.*)\.dev\.cloud\.domain\.de";
#[cfg(test)]
pub const TEST_ISSUER_PATTERN: &str = r"(.*)\.test\.cloud\.domain\.de";

/// `dev-cloud-issuer` and `test-cloud-issuer`, in that order
#[cfg(test)]
pub fn cloud_issuers() -> Vec<IssuerRule> {
    vec![
        IssuerRule::new("dev-cloud-issuer", DEV_ISSUER_PATTERN).unwrap(),
        IssuerRule::new("test-cloud-issuer", TEST_ISSUER_PATTERN).unwrap(),
    ]
}

#[cfg(test)]
pub fn cloud_issuer_set() -> IssuerRuleSet {
    IssuerRuleSet::new(cloud_issuers()).unwrap()
}

/// Helper to create a test Ingress with one rule per host and no TLS section
#[cfg(test)]
pub fn create_test_ingress(name: &str, namespace: &str, hosts: &[&str]) -> Ingress {
    let rules: Vec<_> = hosts
        .iter()
        .map(|host| serde_json::json!({ "host": host }))
        .collect();

    serde_json::from_value(serde_json::json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": { "name": name, "namespace": namespace },
        "spec": { "rules": rules }
    }))
    .unwrap()
}
