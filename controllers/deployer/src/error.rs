//! Deployer error types.
//!
//! This module defines the errors surfaced by the run, logs and cancel
//! operations. Upstream errors from the runtime spec and the cluster client
//! are wrapped unchanged.

use cluster_client::ClusterError;
use runtime_spec::SpecError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while deploying, following or tearing down a workload.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Invalid runtime spec or workload name
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] SpecError),

    /// Runtime spec file could not be read or parsed
    #[error("Failed to load runtime spec {}: {source}", .path.display())]
    SpecFile { path: PathBuf, source: SpecError },

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Cluster(#[from] ClusterError),

    /// No pod of the workload has a running container
    #[error("No running pod found for '{0}'")]
    NoRunningPod(String),

    /// Readiness wait exceeded the configured timeout
    #[error("Timed out after {waited:?} waiting for a running pod of '{name}'{}", lookup_suffix(.last_error))]
    ReadinessTimeout {
        name: String,
        waited: Duration,
        last_error: Option<String>,
    },

    /// Readiness wait was cancelled by the caller
    #[error("Cancelled while waiting for a running pod of '{0}'")]
    Cancelled(String),

    /// One or both teardown deletions failed
    #[error("Teardown incomplete: {0}")]
    Teardown(TeardownFailure),

    /// Writing to the output sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExecutorError {
    /// Whether the error belongs to the NotFound class.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NoRunningPod(_) => true,
            Self::Cluster(e) => e.is_not_found(),
            _ => false,
        }
    }
}

fn lookup_suffix(last_error: &Option<String>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last lookup error: {e})"))
        .unwrap_or_default()
}

/// Outcome of a teardown in which at least one deletion failed.
///
/// Both deletions are always attempted; each field holds the error of the
/// corresponding deletion, `None` meaning it succeeded or was already absent.
#[derive(Debug)]
pub struct TeardownFailure {
    pub name: String,
    pub service: Option<ClusterError>,
    pub deployment: Option<ClusterError>,
}

impl fmt::Display for TeardownFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut failures = Vec::new();
        if let Some(e) = &self.service {
            failures.push(format!("service '{}': {}", self.name, e));
        }
        if let Some(e) = &self.deployment {
            failures.push(format!("deployment '{}': {}", self.name, e));
        }
        write!(f, "{}", failures.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_class() {
        assert!(ExecutorError::NoRunningPod("web".to_string()).is_not_found());
        assert!(
            ExecutorError::Cluster(ClusterError::NotFound {
                kind: "Pod",
                name: "web-1".to_string(),
            })
            .is_not_found()
        );
        assert!(!ExecutorError::Cancelled("web".to_string()).is_not_found());
        assert!(!ExecutorError::InvalidArgument(SpecError::EmptyName).is_not_found());
    }

    #[test]
    fn test_readiness_timeout_message() {
        let err = ExecutorError::ReadinessTimeout {
            name: "web".to_string(),
            waited: Duration::from_secs(5),
            last_error: Some("connection refused".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 5s waiting for a running pod of 'web' (last lookup error: connection refused)"
        );

        let err = ExecutorError::ReadinessTimeout {
            name: "web".to_string(),
            waited: Duration::from_secs(5),
            last_error: None,
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 5s waiting for a running pod of 'web'"
        );
    }

    #[test]
    fn test_spec_file_message() {
        let err = ExecutorError::SpecFile {
            path: PathBuf::from("web.yaml"),
            source: SpecError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            )),
        };
        let message = err.to_string();
        assert!(message.starts_with("Failed to load runtime spec web.yaml: "));
        assert!(!message.contains("Invalid argument"));
    }

    #[test]
    fn test_teardown_failure_message() {
        let failure = TeardownFailure {
            name: "web".to_string(),
            service: Some(ClusterError::Api {
                code: 500,
                message: "etcd unavailable".to_string(),
            }),
            deployment: None,
        };
        assert_eq!(
            ExecutorError::Teardown(failure).to_string(),
            "Teardown incomplete: service 'web': Kubernetes API error (500): etcd unavailable"
        );
    }
}
