//! Kubernetes Cluster Client
//!
//! The narrow set of Kubernetes API operations the deployer needs:
//! Deployment and Service CRUD, label-selector pod listing, and pod log
//! streaming, all scoped to one namespace per call.
//!
//! # Example
//!
//! ```no_run
//! use cluster_client::{ClientConfig, ClusterClientTrait, KubeClusterClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Infer configuration (in-cluster, KUBECONFIG, ~/.kube/config)
//! let client = KubeClusterClient::connect(&ClientConfig::default()).await?;
//!
//! // List the pods of a workload
//! let pods = client.list_pods("default", "app=web").await?;
//! println!("{} pods", pods.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **test-util**: enables [`MockClusterClient`], an in-memory implementation
//!   of [`ClusterClientTrait`] for unit tests

pub mod client;
#[path = "trait.rs"]
pub mod cluster_trait;
pub mod error;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod types;

pub use client::KubeClusterClient;
pub use cluster_trait::ClusterClientTrait;
pub use error::ClusterError;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockClusterClient};
pub use types::{ClientConfig, LogOptions, LogStream};
