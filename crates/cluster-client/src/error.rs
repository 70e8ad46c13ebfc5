//! Cluster client errors

use thiserror::Error;

/// Errors that can occur when talking to the Kubernetes API server
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Transport, TLS or decoding failure inside the kube client
    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    /// The API server rejected the request
    #[error("Kubernetes API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// The named object does not exist
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Log stream could not be opened or broke while reading
    #[error("Log stream error: {0}")]
    Stream(String),

    /// Client configuration could not be resolved
    #[error("Kubernetes configuration error: {0}")]
    Config(String),
}

impl ClusterError {
    /// Whether the error means the object is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { code: 404, .. })
    }

    /// Maps a kube error for `kind`/`name`, turning a 404 into [`ClusterError::NotFound`].
    pub fn from_kube(err: kube::Error, kind: &'static str, name: &str) -> Self {
        match err {
            kube::Error::Api(ref status) if status.code == 404 => Self::NotFound {
                kind,
                name: name.to_string(),
            },
            kube::Error::Api(ref status) => Self::Api {
                code: status.code,
                message: status.message.clone(),
            },
            other => Self::Kube(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let err = ClusterError::NotFound {
            kind: "Deployment",
            name: "web".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Deployment 'web' not found");

        let err = ClusterError::Api {
            code: 404,
            message: "services \"web\" not found".to_string(),
        };
        assert!(err.is_not_found());

        let err = ClusterError::Api {
            code: 403,
            message: "forbidden".to_string(),
        };
        assert!(!err.is_not_found());

        assert!(!ClusterError::Stream("reset".to_string()).is_not_found());
    }
}
