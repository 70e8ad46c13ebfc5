//! ClusterClient trait for mocking
//!
//! This trait abstracts the Kubernetes API calls the deployer makes so the
//! reconciliation, readiness, log and teardown logic can be unit tested
//! against [`crate::MockClusterClient`].

use crate::error::ClusterError;
use crate::types::{LogOptions, LogStream};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};

/// Namespaced Kubernetes operations used by the deployer.
///
/// Lookups and deletions of a missing object return
/// [`ClusterError::NotFound`]. All methods must be `Send` to work with
/// Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterClientTrait: Send + Sync {
    // Deployments
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError>;
    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> Result<Deployment, ClusterError>;
    async fn replace_deployment(&self, namespace: &str, name: &str, deployment: &Deployment) -> Result<Deployment, ClusterError>;
    async fn delete_deployment(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;

    // Services
    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ClusterError>;
    async fn create_service(&self, namespace: &str, service: &Service) -> Result<Service, ClusterError>;
    async fn delete_service(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;

    // Pods
    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>, ClusterError>;
    async fn stream_logs(&self, namespace: &str, pod: &str, options: &LogOptions) -> Result<LogStream, ClusterError>;
}
