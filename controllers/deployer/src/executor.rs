//! Kubernetes executor.
//!
//! This module contains the `KubernetesExecutor` that ties together
//! reconciliation, readiness polling, log streaming and teardown behind the
//! run / logs / cancel operations.

use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::logs::LogStreamer;
use crate::readiness::ReadinessPoller;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crate::teardown::{Teardown, TeardownReport};
use cluster_client::{ClusterClientTrait, KubeClusterClient};
use runtime_spec::RuntimeSpec;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: ReconcileOutcome,
    /// Name of the pod that was found running
    pub pod: String,
}

/// Runs workloads on Kubernetes.
pub struct KubernetesExecutor {
    config: ExecutorConfig,
    reconciler: Reconciler,
    readiness: ReadinessPoller,
    logs: LogStreamer,
    teardown: Teardown,
}

impl KubernetesExecutor {
    /// Connects to the cluster described by `config.client` and builds an executor.
    pub async fn connect(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        config.validate()?;
        let client = KubeClusterClient::connect(&config.client).await?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Builds an executor on top of an existing cluster client.
    pub fn new(config: ExecutorConfig, client: Arc<dyn ClusterClientTrait>) -> Self {
        let ns = config.namespace.as_str();
        let poller = || {
            ReadinessPoller::new(
                Arc::clone(&client),
                ns,
                config.poll_interval,
                config.ready_timeout,
            )
        };

        let reconciler = Reconciler::new(Arc::clone(&client), ns, config.image_pull_secret.clone());
        let readiness = poller();
        let logs = LogStreamer::new(Arc::clone(&client), ns, poller());
        let teardown = Teardown::new(Arc::clone(&client), ns);

        Self {
            config,
            reconciler,
            readiness,
            logs,
            teardown,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Creates or replaces the workload's objects and waits for a running pod.
    ///
    /// Without a configured timeout the wait only ends when a pod runs or
    /// `cancel` fires.
    pub async fn run(
        &self,
        spec: &RuntimeSpec,
        cancel: &CancellationToken,
    ) -> Result<RunReport, ExecutorError> {
        let outcome = self.reconciler.reconcile(spec).await?;
        let pod = self
            .readiness
            .wait_for_running_pod(&spec.name, cancel)
            .await?;

        let pod = pod.metadata.name.unwrap_or_default();
        info!("Workload {} is running in pod {}", spec.name, pod);
        Ok(RunReport { outcome, pod })
    }

    /// Streams the logs of the workload's running pod into `sink`.
    pub async fn logs<W>(&self, name: &str, sink: &mut W) -> Result<u64, ExecutorError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.logs.stream_logs(name, sink).await
    }

    /// Deletes the workload's Service and Deployment.
    pub async fn cancel(&self, name: &str) -> Result<TeardownReport, ExecutorError> {
        self.teardown.cancel(name).await
    }
}
