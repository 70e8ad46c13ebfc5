//! Log streaming.
//!
//! Copies the follow-mode log stream of a workload's running pod into a
//! caller-supplied sink.

use crate::error::ExecutorError;
use crate::readiness::ReadinessPoller;
use cluster_client::{ClusterClientTrait, ClusterError, LogOptions};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Streams the logs of a workload's running pod.
pub struct LogStreamer {
    client: Arc<dyn ClusterClientTrait>,
    namespace: String,
    pods: ReadinessPoller,
}

impl LogStreamer {
    /// Creates a streamer that resolves pods through `pods`.
    pub fn new(
        client: Arc<dyn ClusterClientTrait>,
        namespace: impl Into<String>,
        pods: ReadinessPoller,
    ) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            pods,
        }
    }

    /// Copies the running pod's log output into `sink` until the stream ends.
    ///
    /// Fails with `ExecutorError::NoRunningPod` before opening any stream
    /// when no pod of `name` is running. Returns the number of bytes written.
    pub async fn stream_logs<W>(&self, name: &str, sink: &mut W) -> Result<u64, ExecutorError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        runtime_spec::require_name(name)?;

        let pod = self
            .pods
            .find_running_pod(name)
            .await?
            .ok_or_else(|| ExecutorError::NoRunningPod(name.to_string()))?;
        let pod_name = pod.metadata.name.clone().unwrap_or_default();

        // Logs of the first container; it is the only one the deployer creates
        let container = pod
            .spec
            .as_ref()
            .and_then(|spec| spec.containers.first())
            .map(|c| c.name.clone());

        info!("Streaming logs from pod {}/{}", self.namespace, pod_name);

        let options = LogOptions {
            container,
            follow: true,
        };
        let mut stream = self
            .client
            .stream_logs(&self.namespace, &pod_name, &options)
            .await?;

        let mut copied = 0u64;
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| ClusterError::Stream(e.to_string()))?
        {
            sink.write_all(&chunk).await?;
            copied += chunk.len() as u64;
        }
        sink.flush().await?;

        debug!("Log stream for pod {} ended after {} bytes", pod_name, copied);
        Ok(copied)
    }
}
