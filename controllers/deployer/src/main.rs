//! Deployer
//!
//! Runs a container image on Kubernetes as a Deployment (plus a Service when
//! ports are exposed), waits for a running pod, streams its logs, and tears
//! the workload down again.

use anyhow::{Context, Result};
use clap::Parser;
use deployer::cli::{Cli, Command};
use deployer::{ExecutorConfig, KubernetesExecutor};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the workload's log stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    let cli = Cli::parse();

    let mut config = ExecutorConfig::from_env().context("Failed to load configuration")?;
    cli.cluster.apply(&mut config).context("Invalid command line configuration")?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace);
    info!("  Poll interval: {:?}", config.poll_interval);
    info!(
        "  Ready timeout: {}",
        config
            .ready_timeout
            .map_or_else(|| "none".to_string(), |t| format!("{t:?}"))
    );

    let executor = KubernetesExecutor::connect(config)
        .await
        .context("Failed to connect to the Kubernetes cluster")?;

    match cli.command {
        Command::Run(args) => {
            let spec = args.runtime_spec()?;

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, stopping");
                    on_interrupt.cancel();
                }
            });

            let report = executor
                .run(&spec, &cancel)
                .await
                .with_context(|| format!("Failed to run {}", spec.name))?;
            info!("{} is running in pod {}", spec.name, report.pod);

            if args.follow {
                let mut stdout = tokio::io::stdout();
                tokio::select! {
                    result = executor.logs(&spec.name, &mut stdout) => {
                        result.with_context(|| format!("Failed to stream logs of {}", spec.name))?;
                    }
                    () = cancel.cancelled() => {}
                }
            }
        }
        Command::Logs { name } => {
            let mut stdout = tokio::io::stdout();
            executor
                .logs(&name, &mut stdout)
                .await
                .with_context(|| format!("Failed to stream logs of {name}"))?;
        }
        Command::Cancel { name } => {
            let report = executor
                .cancel(&name)
                .await
                .with_context(|| format!("Failed to tear down {name}"))?;
            if report.was_clean() {
                info!("Nothing to delete for {}", name);
            } else {
                info!("{} torn down", name);
            }
        }
    }

    Ok(())
}
