//! Runtime descriptor errors

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::RuntimeSpec`].
///
/// Every variant except `Io` and `Parse` is an invalid-argument error and is
/// raised before any call to the cluster.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Workload name is empty
    #[error("workload name must not be empty")]
    EmptyName,

    /// Image reference is empty
    #[error("image name must not be empty")]
    EmptyImage,

    /// Name cannot be used as an object name and label value
    #[error("invalid workload name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Replica count below zero
    #[error("replica count must not be negative (got {0})")]
    NegativeReplicas(i32),

    /// Port outside 1-65535
    #[error("port {0} is outside the range 1-65535")]
    InvalidPort(i32),

    /// Same port declared twice
    #[error("port {0} is declared more than once")]
    DuplicatePort(i32),

    /// Runtime file could not be read
    #[error("failed to read runtime spec: {0}")]
    Io(#[from] std::io::Error),

    /// Runtime file is not valid YAML for a runtime spec
    #[error("failed to parse runtime spec: {0}")]
    Parse(#[from] serde_yaml::Error),
}
