//! Command line interface.

use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use clap::{Args, Parser, Subcommand};
use runtime_spec::RuntimeSpec;
use std::path::PathBuf;
use std::time::Duration;

/// Run, follow and tear down containerized workloads on Kubernetes.
#[derive(Debug, Parser)]
#[command(name = "deployer", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags overriding the `DEPLOYER_*` environment configuration.
#[derive(Debug, Args)]
pub struct ClusterArgs {
    /// Namespace holding the workload
    #[arg(long, short = 'n', global = true)]
    pub namespace: Option<String>,

    /// Kubeconfig file to use instead of the inferred configuration
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Give up waiting for a running pod after this many seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub ready_timeout: Option<u64>,

    /// Seconds between readiness polls
    #[arg(long, value_name = "SECS", global = true)]
    pub poll_interval: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update a workload and wait until a pod runs
    Run(RunArgs),
    /// Stream the logs of a workload's running pod
    Logs {
        /// Workload name
        name: String,
    },
    /// Delete a workload's Service and Deployment
    Cancel {
        /// Workload name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Runtime spec file (YAML); replaces the inline flags
    #[arg(long, short = 'f', conflicts_with_all = ["image", "name", "replicas", "ports", "public"])]
    pub spec: Option<PathBuf>,

    /// Container image
    #[arg(long, required_unless_present = "spec")]
    pub image: Option<String>,

    /// Workload name
    #[arg(long, required_unless_present = "spec")]
    pub name: Option<String>,

    /// Number of replicas
    #[arg(long, default_value_t = 1)]
    pub replicas: i32,

    /// Port to expose; repeat for several ports
    #[arg(long = "port", short = 'p')]
    pub ports: Vec<i32>,

    /// Expose the ports on a public address
    #[arg(long)]
    pub public: bool,

    /// Stream the pod's logs once it is running
    #[arg(long)]
    pub follow: bool,
}

impl RunArgs {
    /// Builds the runtime spec from the spec file or the inline flags.
    pub fn runtime_spec(&self) -> Result<RuntimeSpec, ExecutorError> {
        if let Some(path) = &self.spec {
            return RuntimeSpec::from_file(path).map_err(|source| ExecutorError::SpecFile {
                path: path.clone(),
                source,
            });
        }

        Ok(RuntimeSpec::new(
            self.image.clone().unwrap_or_default(),
            self.name.clone().unwrap_or_default(),
        )
        .with_replicas(self.replicas)
        .with_ports(self.ports.clone())
        .with_public_address(self.public))
    }
}

impl ClusterArgs {
    /// Applies the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ExecutorConfig) -> Result<(), ExecutorError> {
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        if let Some(path) = &self.kubeconfig {
            config.client.kubeconfig = Some(path.clone());
        }
        if let Some(context) = &self.context {
            config.client.context = Some(context.clone());
        }
        if let Some(secs) = self.ready_timeout {
            config.ready_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = self.poll_interval {
            config.poll_interval = Duration::from_secs(secs);
        }
        config.validate()
    }
}
