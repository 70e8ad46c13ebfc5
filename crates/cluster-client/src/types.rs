//! Shared request and stream types.

use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;

/// How to locate and authenticate against the cluster.
///
/// With no fields set the configuration is inferred: in-cluster service
/// account first, then `KUBECONFIG`, then `~/.kube/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit kubeconfig file
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of the current one
    pub context: Option<String>,
}

/// Options for opening a pod log stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Container to read; `None` lets the API server pick the only container
    pub container: Option<String>,
    /// Keep the stream open and deliver new output as it is written
    pub follow: bool,
}

/// A pinned stream of raw log chunks from a container.
pub type LogStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;
