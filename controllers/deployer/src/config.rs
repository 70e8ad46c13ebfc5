//! Executor configuration.
//!
//! Configuration is an explicit value handed to the executor. It is loaded
//! from `DEPLOYER_*` environment variables and can then be overridden from the
//! command line.

use crate::error::ExecutorError;
use cluster_client::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Readiness poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Settings shared by the reconciler, readiness poller, log streamer and teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Namespace holding the workload's objects
    pub namespace: String,
    /// Delay between readiness polls
    pub poll_interval: Duration,
    /// Upper bound on the readiness wait; `None` waits until cancelled
    pub ready_timeout: Option<Duration>,
    /// Image pull secret referenced by the pod template
    pub image_pull_secret: Option<String>,
    /// How to reach the cluster
    pub client: ClientConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            ready_timeout: None,
            image_pull_secret: None,
            client: ClientConfig::default(),
        }
    }
}

impl ExecutorConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ExecutorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExecutorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(namespace) = get("DEPLOYER_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Some(secs) = get("DEPLOYER_POLL_INTERVAL_SECS") {
            config.poll_interval = parse_secs("DEPLOYER_POLL_INTERVAL_SECS", &secs)?;
        }
        if let Some(secs) = get("DEPLOYER_READY_TIMEOUT_SECS") {
            config.ready_timeout = Some(parse_secs("DEPLOYER_READY_TIMEOUT_SECS", &secs)?);
        }
        config.image_pull_secret = get("DEPLOYER_IMAGE_PULL_SECRET");
        config.client = ClientConfig {
            kubeconfig: get("DEPLOYER_KUBECONFIG").map(PathBuf::from),
            context: get("DEPLOYER_KUBE_CONTEXT"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the executor cannot work with.
    pub fn validate(&self) -> Result<(), ExecutorError> {
        if self.namespace.trim().is_empty() {
            return Err(ExecutorError::InvalidConfig(
                "namespace must not be empty".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ExecutorError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses a whole number of seconds.
pub fn parse_secs(key: &str, value: &str) -> Result<Duration, ExecutorError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ExecutorError::InvalidConfig(format!("{key}={value}: {e}")))
}
