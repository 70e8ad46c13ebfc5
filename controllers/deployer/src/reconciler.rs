//! Reconciliation of a workload's Deployment and Service.
//!
//! This module makes the cluster hold the objects derived from a
//! `RuntimeSpec`: the Deployment is created or fully replaced, the Service is
//! created when ports are declared and otherwise left alone.

use crate::error::ExecutorError;
use cluster_client::ClusterClientTrait;
use runtime_spec::{RuntimeSpec, build_deployment, build_service};
use std::sync::Arc;
use tracing::{debug, info};

/// What reconciliation did to one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Object did not exist and was created
    Created,
    /// Object existed and was replaced with the desired state
    Replaced,
    /// Object existed and was left as is
    Unchanged,
}

/// Result of reconciling one workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub deployment: Applied,
    /// `None` when the workload declares no ports and no Service was touched
    pub service: Option<Applied>,
}

/// Reconciles workload resources in a single namespace.
pub struct Reconciler {
    client: Arc<dyn ClusterClientTrait>,
    namespace: String,
    image_pull_secret: Option<String>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        client: Arc<dyn ClusterClientTrait>,
        namespace: impl Into<String>,
        image_pull_secret: Option<String>,
    ) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            image_pull_secret,
        }
    }

    /// Reconciles the Deployment and, when ports are declared, the Service for `spec`.
    ///
    /// The spec is validated first; an invalid spec never reaches the cluster.
    pub async fn reconcile(&self, spec: &RuntimeSpec) -> Result<ReconcileOutcome, ExecutorError> {
        spec.validate()?;

        info!("Reconciling workload {}/{}", self.namespace, spec.name);

        let deployment = self.reconcile_deployment(spec).await?;
        let service = if spec.exposes_ports() {
            Some(self.reconcile_service(spec).await?)
        } else {
            debug!("Workload {} declares no ports, skipping service", spec.name);
            None
        };

        Ok(ReconcileOutcome {
            deployment,
            service,
        })
    }

    /// Creates the Deployment if absent, replaces it if present.
    ///
    /// The replacement carries the stored `resourceVersion`, so a concurrent
    /// modification is rejected by the API server as a conflict.
    async fn reconcile_deployment(&self, spec: &RuntimeSpec) -> Result<Applied, ExecutorError> {
        let ns = self.namespace.as_str();
        let name = spec.name.as_str();
        let mut desired = build_deployment(spec, ns, self.image_pull_secret.as_deref());

        match self.client.get_deployment(ns, name).await {
            Ok(existing) => {
                info!("Deployment {}/{} already exists, replacing", ns, name);
                desired.metadata.resource_version = existing.metadata.resource_version;
                self.client.replace_deployment(ns, name, &desired).await?;
                info!("Deployment {}/{} replaced", ns, name);
                Ok(Applied::Replaced)
            }
            Err(e) if e.is_not_found() => {
                info!("Deployment {}/{} not found, creating", ns, name);
                self.client.create_deployment(ns, &desired).await?;
                info!("Deployment {}/{} created", ns, name);
                Ok(Applied::Created)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates the Service if absent. An existing Service is not updated.
    async fn reconcile_service(&self, spec: &RuntimeSpec) -> Result<Applied, ExecutorError> {
        let ns = self.namespace.as_str();
        let name = spec.name.as_str();
        let Some(desired) = build_service(spec, ns) else {
            return Ok(Applied::Unchanged);
        };

        match self.client.get_service(ns, name).await {
            Ok(_) => {
                // TODO: compare ports/type and replace the Service when they drift from `build_service`
                info!("Service {}/{} already exists, leaving it unchanged", ns, name);
                Ok(Applied::Unchanged)
            }
            Err(e) if e.is_not_found() => {
                info!("Service {}/{} not found, creating", ns, name);
                self.client.create_service(ns, &desired).await?;
                info!("Service {}/{} created", ns, name);
                Ok(Applied::Created)
            }
            Err(e) => Err(e.into()),
        }
    }
}
