//! Deployer
//!
//! Runs a container image on Kubernetes and manages its lifecycle:
//!
//! - **run**: create or replace the workload's Deployment, create its Service
//!   when ports are exposed, then wait for a pod with a running container
//! - **logs**: stream the running pod's logs into a sink
//! - **cancel**: delete the Service and the Deployment
//!
//! # Example
//!
//! ```no_run
//! use deployer::{ExecutorConfig, KubernetesExecutor};
//! use runtime_spec::RuntimeSpec;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), deployer::ExecutorError> {
//! let executor = KubernetesExecutor::connect(ExecutorConfig::from_env()?).await?;
//!
//! let spec = RuntimeSpec::new("nginx", "web")
//!     .with_replicas(2)
//!     .with_ports(vec![80])
//!     .with_public_address(true);
//! executor.run(&spec, &CancellationToken::new()).await?;
//!
//! executor.logs("web", &mut tokio::io::stdout()).await?;
//! executor.cancel("web").await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logs;
pub mod readiness;
pub mod reconciler;
pub mod teardown;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod logs_test;

pub use config::ExecutorConfig;
pub use error::{ExecutorError, TeardownFailure};
pub use executor::{KubernetesExecutor, RunReport};
pub use reconciler::{Applied, ReconcileOutcome};
pub use teardown::{Removal, TeardownReport};
