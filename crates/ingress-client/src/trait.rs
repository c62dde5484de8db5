//! IngressClient trait for mocking
//!
//! This trait abstracts the Ingress API so the reconciler can be unit tested
//! against an in-memory store. `KubeIngressClient` implements it for a real
//! cluster.

use crate::error::IngressClientError;
use k8s_openapi::api::networking::v1::Ingress;

/// Trait for Ingress API operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait IngressClientTrait: Send + Sync {
    /// List every Ingress visible to the client, in the order the store returns them.
    async fn list_ingresses(&self) -> Result<Vec<Ingress>, IngressClientError>;

    /// Replace an Ingress with the given object.
    ///
    /// The object's `resourceVersion` is sent along, so a write against a
    /// stale copy fails instead of clobbering newer state. Returns the object
    /// as stored, including its new `resourceVersion`.
    async fn update_ingress(&self, ingress: &Ingress) -> Result<Ingress, IngressClientError>;
}
