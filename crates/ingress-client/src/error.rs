//! Ingress client errors

use thiserror::Error;

/// Errors that can occur when talking to the Ingress API
#[derive(Debug, Error)]
pub enum IngressClientError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Write rejected because the object changed since it was read
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Ingress store could not be reached
    #[error("Ingress store unavailable: {0}")]
    Unavailable(String),

    /// Object is missing a field required to address it (name, namespace)
    #[error("Missing field: {0}")]
    MissingField(String),
}
