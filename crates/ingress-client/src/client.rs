//! Kubernetes Ingress client
//!
//! Implements `IngressClientTrait` on top of `kube::Api<Ingress>`.

use crate::error::IngressClientError;
use crate::ingress_trait::IngressClientTrait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{ListParams, PostParams};
use kube::{Api, Client, ResourceExt};
use tracing::debug;

/// Ingress API client backed by a live cluster
#[derive(Clone)]
pub struct KubeIngressClient {
    client: Client,
    namespace: Option<String>,
}

impl std::fmt::Debug for KubeIngressClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeIngressClient")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl KubeIngressClient {
    /// Create a new Ingress client
    ///
    /// # Arguments
    /// * `client` - Kubernetes client
    /// * `namespace` - Restrict listing to this namespace, `None` lists all namespaces
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        Self { client, namespace }
    }

    fn list_api(&self) -> Api<Ingress> {
        match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

#[async_trait::async_trait]
impl IngressClientTrait for KubeIngressClient {
    async fn list_ingresses(&self) -> Result<Vec<Ingress>, IngressClientError> {
        debug!(
            "Listing Ingresses in {}",
            self.namespace.as_deref().unwrap_or("all namespaces")
        );
        let list = self.list_api().list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn update_ingress(&self, ingress: &Ingress) -> Result<Ingress, IngressClientError> {
        let name = ingress
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| IngressClientError::MissingField("metadata.name".to_string()))?;
        let namespace = ingress.namespace().ok_or_else(|| {
            IngressClientError::MissingField(format!("metadata.namespace of Ingress {}", name))
        })?;

        debug!(
            "Replacing Ingress {}/{} at resourceVersion {}",
            namespace,
            name,
            ingress.resource_version().as_deref().unwrap_or("<none>")
        );

        let api: Api<Ingress> = Api::namespaced(self.client.clone(), &namespace);
        let updated = api.replace(name, &PostParams::default(), ingress).await?;
        Ok(updated)
    }
}
