//! Ingress Client
//!
//! Thin client over the `networking.k8s.io/v1` Ingress API used by the
//! ingress issuer controller. Only the two operations the controller needs
//! are exposed: listing every Ingress and replacing a single Ingress.
//!
//! # Example
//!
//! ```no_run
//! use ingress_client::{IngressClientTrait, KubeIngressClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KubeIngressClient::new(kube::Client::try_default().await?, None);
//!
//! for ingress in client.list_ingresses().await? {
//!     println!("{:?}", ingress.metadata.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Optimistic concurrency**: updates are whole-object replaces carrying the
//!   object's `resourceVersion`, stale writes are rejected by the API server
//! - **Namespace scoping**: list across all namespaces or a single one
//! - **Mocking**: `MockIngressClient` behind the `test-util` feature

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod ingress_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::KubeIngressClient;
pub use error::IngressClientError;
pub use ingress_trait::IngressClientTrait;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockIngressClient;

pub use k8s_openapi::api::networking::v1::{Ingress, IngressSpec, IngressTLS};
