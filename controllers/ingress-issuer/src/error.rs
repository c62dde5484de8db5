//! Controller-specific error types.
//!
//! This module defines error types specific to the Ingress Issuer Controller
//! that are not covered by upstream library errors.

use ingress_client::IngressClientError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Ingress Issuer Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Required environment variable missing or empty
    #[error("Environment variable {0} must be provided")]
    MissingEnv(String),

    /// Issuer hostname pattern does not compile
    #[error("Invalid regular expression in {key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listing Ingresses failed, the pass could not run
    #[error("Failed to list Ingresses: {0}")]
    ListIngresses(#[source] IngressClientError),

    /// Installing a shutdown signal handler failed
    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}
