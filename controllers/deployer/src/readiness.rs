//! Readiness polling.
//!
//! After reconciliation the executor waits until one pod of the workload has
//! a running container. Lookup failures are kept apart from "no pod yet": both
//! keep the poll going, but failures are logged as warnings and reported if
//! the wait times out.

use crate::error::ExecutorError;
use cluster_client::{ClusterClientTrait, ClusterError};
use k8s_openapi::api::core::v1::Pod;
use runtime_spec::label_selector;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Whether the pod's first container is in the running state.
#[must_use]
pub fn is_running(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|status| status.container_statuses.as_ref())
        .and_then(|statuses| statuses.first())
        .and_then(|first| first.state.as_ref())
        .is_some_and(|state| state.running.is_some())
}

/// Polls the cluster for a running pod of a workload.
pub struct ReadinessPoller {
    client: Arc<dyn ClusterClientTrait>,
    namespace: String,
    interval: Duration,
    timeout: Option<Duration>,
}

impl ReadinessPoller {
    /// Creates a poller; `timeout` of `None` polls until cancelled.
    pub fn new(
        client: Arc<dyn ClusterClientTrait>,
        namespace: impl Into<String>,
        interval: Duration,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            interval,
            timeout,
        }
    }

    /// Single lookup: the first pod labeled `app=<name>` whose first container is running.
    pub async fn find_running_pod(&self, name: &str) -> Result<Option<Pod>, ClusterError> {
        let pods = self
            .client
            .list_pods(&self.namespace, &label_selector(name))
            .await?;
        Ok(pods.into_iter().find(is_running))
    }

    /// Waits until a pod of `name` reports a running container.
    ///
    /// Polls every interval until a running pod is found, `cancel` fires
    /// (`ExecutorError::Cancelled`) or the timeout elapses
    /// (`ExecutorError::ReadinessTimeout`). Cancellation and the timeout also
    /// interrupt a lookup that is still in flight.
    pub async fn wait_for_running_pod(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Pod, ExecutorError> {
        info!("Waiting for a running pod of {}/{}", self.namespace, name);

        let started = Instant::now();
        let deadline = self.timeout.map(|t| started + t);
        let mut last_error: Option<String> = None;

        let timed_out = |last_error: Option<String>| ExecutorError::ReadinessTimeout {
            name: name.to_string(),
            waited: started.elapsed(),
            last_error,
        };

        loop {
            if cancel.is_cancelled() {
                return Err(ExecutorError::Cancelled(name.to_string()));
            }

            // A finished lookup wins over a deadline reached at the same instant
            let lookup = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(ExecutorError::Cancelled(name.to_string()));
                }
                result = self.find_running_pod(name) => result,
                () = sleep_until_deadline(deadline) => {
                    warn!("Pod lookup for {} still pending at the deadline", name);
                    return Err(timed_out(last_error));
                }
            };

            match lookup {
                Ok(Some(pod)) => {
                    info!(
                        "Pod {} is running",
                        pod.metadata.name.as_deref().unwrap_or("<unknown>")
                    );
                    return Ok(pod);
                }
                Ok(None) => {
                    debug!("No running pod for {} yet", name);
                }
                Err(e) => {
                    warn!("Failed to look up pods for {}: {}", name, e);
                    last_error = Some(e.to_string());
                }
            }

            let mut wake = Instant::now() + self.interval;
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(timed_out(last_error));
                }
                wake = wake.min(deadline);
            }

            tokio::select! {
                () = cancel.cancelled() => {
                    return Err(ExecutorError::Cancelled(name.to_string()));
                }
                () = tokio::time::sleep_until(wake) => {}
            }
        }
    }
}

/// Sleeps until `deadline`, or forever without one.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
