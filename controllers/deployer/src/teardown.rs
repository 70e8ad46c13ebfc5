//! Teardown of a workload's Service and Deployment.

use crate::error::{ExecutorError, TeardownFailure};
use cluster_client::{ClusterClientTrait, ClusterError};
use std::sync::Arc;
use tracing::{error, info};

/// What teardown did to one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Object existed and was deleted
    Deleted,
    /// Object did not exist
    AlreadyAbsent,
}

/// Result of a successful teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
    pub service: Removal,
    pub deployment: Removal,
}

impl TeardownReport {
    /// Whether nothing had to be deleted.
    #[must_use]
    pub fn was_clean(&self) -> bool {
        self.service == Removal::AlreadyAbsent && self.deployment == Removal::AlreadyAbsent
    }
}

/// Deletes workload resources in a single namespace.
pub struct Teardown {
    client: Arc<dyn ClusterClientTrait>,
    namespace: String,
}

impl Teardown {
    /// Creates a new teardown instance.
    pub fn new(client: Arc<dyn ClusterClientTrait>, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    /// Deletes the Service and then the Deployment named `name`.
    ///
    /// Both deletions are attempted even when the first one fails. Objects
    /// that are already gone count as removed. Any other failure is reported
    /// as `ExecutorError::Teardown` naming each failed deletion.
    pub async fn cancel(&self, name: &str) -> Result<TeardownReport, ExecutorError> {
        runtime_spec::require_name(name)?;
        let ns = self.namespace.as_str();

        let service = settle(
            "Service",
            ns,
            name,
            self.client.delete_service(ns, name).await,
        );
        let deployment = settle(
            "Deployment",
            ns,
            name,
            self.client.delete_deployment(ns, name).await,
        );

        match (service, deployment) {
            (Ok(service), Ok(deployment)) => Ok(TeardownReport {
                service,
                deployment,
            }),
            (service, deployment) => Err(ExecutorError::Teardown(TeardownFailure {
                name: name.to_string(),
                service: service.err(),
                deployment: deployment.err(),
            })),
        }
    }
}

fn settle(
    kind: &str,
    namespace: &str,
    name: &str,
    result: Result<(), ClusterError>,
) -> Result<Removal, ClusterError> {
    match result {
        Ok(()) => {
            info!("{} {}/{} deleted", kind, namespace, name);
            Ok(Removal::Deleted)
        }
        Err(e) if e.is_not_found() => {
            info!("{} {}/{} already absent", kind, namespace, name);
            Ok(Removal::AlreadyAbsent)
        }
        Err(e) => {
            error!("Failed to delete {} {}/{}: {}", kind, namespace, name, e);
            Err(e)
        }
    }
}
