//! Mock IngressClient for unit testing
//!
//! This module provides an in-memory implementation of `IngressClientTrait`
//! that behaves like the API server where it matters to the controller:
//! listing order is stable, every write must carry the current
//! `resourceVersion`, and each successful write bumps it.

use crate::error::IngressClientError;
use crate::ingress_trait::IngressClientTrait;
use k8s_openapi::api::networking::v1::Ingress;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock IngressClient for testing
///
/// Cloning shares the underlying store, so a test can hand one clone to the
/// code under test and inspect the store through another.
#[derive(Clone, Debug, Default)]
pub struct MockIngressClient {
    // Stored objects, in listing order
    ingresses: Arc<Mutex<Vec<Ingress>>>,
    // Every object passed to update_ingress, including rejected ones
    update_calls: Arc<Mutex<Vec<Ingress>>>,
    // 1-based update call numbers that fail
    failing_updates: Arc<Mutex<HashSet<usize>>>,
    fail_list: Arc<Mutex<bool>>,
    list_calls: Arc<Mutex<usize>>,
}

impl MockIngressClient {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an Ingress to the mock store (for test setup)
    ///
    /// Objects without a `resourceVersion` are stored at version `1`.
    pub fn add_ingress(&self, mut ingress: Ingress) {
        if ingress.metadata.resource_version.is_none() {
            ingress.metadata.resource_version = Some("1".to_string());
        }
        self.ingresses.lock().unwrap().push(ingress);
    }

    /// Current stored copy of an Ingress
    pub fn get(&self, namespace: &str, name: &str) -> Option<Ingress> {
        self.ingresses
            .lock()
            .unwrap()
            .iter()
            .find(|i| is_same_object(i, namespace, name))
            .cloned()
    }

    /// Make every following `list_ingresses` call fail (or succeed again)
    pub fn set_list_failure(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    /// Make the given update calls fail, counted from 1 over the mock's lifetime
    pub fn fail_update_calls(&self, calls: &[usize]) {
        self.failing_updates.lock().unwrap().extend(calls.iter().copied());
    }

    /// Objects passed to `update_ingress`, in call order
    pub fn update_calls(&self) -> Vec<Ingress> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Number of `list_ingresses` calls so far
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

fn is_same_object(ingress: &Ingress, namespace: &str, name: &str) -> bool {
    ingress.metadata.namespace.as_deref() == Some(namespace)
        && ingress.metadata.name.as_deref() == Some(name)
}

fn next_resource_version(current: Option<&str>) -> String {
    let version = current.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
    (version + 1).to_string()
}

#[async_trait::async_trait]
impl IngressClientTrait for MockIngressClient {
    async fn list_ingresses(&self) -> Result<Vec<Ingress>, IngressClientError> {
        *self.list_calls.lock().unwrap() += 1;
        if *self.fail_list.lock().unwrap() {
            return Err(IngressClientError::Unavailable(
                "injected list failure for ingresses.networking.k8s.io".to_string(),
            ));
        }
        Ok(self.ingresses.lock().unwrap().clone())
    }

    async fn update_ingress(&self, ingress: &Ingress) -> Result<Ingress, IngressClientError> {
        let call = {
            let mut calls = self.update_calls.lock().unwrap();
            calls.push(ingress.clone());
            calls.len()
        };

        let name = ingress
            .metadata
            .name
            .clone()
            .ok_or_else(|| IngressClientError::MissingField("metadata.name".to_string()))?;
        let namespace = ingress.metadata.namespace.clone().ok_or_else(|| {
            IngressClientError::MissingField(format!("metadata.namespace of Ingress {}", name))
        })?;

        if self.failing_updates.lock().unwrap().contains(&call) {
            return Err(IngressClientError::Conflict(format!(
                "injected failure for update call {} on {}/{}",
                call, namespace, name
            )));
        }

        let mut store = self.ingresses.lock().unwrap();
        let stored = store
            .iter_mut()
            .find(|i| is_same_object(i, &namespace, &name))
            .ok_or_else(|| {
                IngressClientError::NotFound(format!("Ingress {}/{}", namespace, name))
            })?;

        if stored.metadata.resource_version != ingress.metadata.resource_version {
            return Err(IngressClientError::Conflict(format!(
                "Ingress {}/{} has resourceVersion {:?}, update was based on {:?}",
                namespace, name, stored.metadata.resource_version, ingress.metadata.resource_version
            )));
        }

        let mut updated = ingress.clone();
        updated.metadata.resource_version = Some(next_resource_version(
            stored.metadata.resource_version.as_deref(),
        ));
        *stored = updated.clone();
        Ok(updated)
    }
}
