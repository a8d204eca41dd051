//! gpfleet runner - run one command across a database cluster
//!
//! Loads the configuration and a segment snapshot, dispatches the templated
//! command at the configured scope and aborts with the aggregate summary when
//! any entry failed.

mod config;
mod template;

use anyhow::{Context, Result};
use config::RunnerConfig;
use gpfleet_kernel::{Cluster, OsEnvironment, ShellExecutor};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;

fn init_logging(config: &RunnerConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(config.level())
        .with_target(false);

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = RunnerConfig::load().await.context("Failed to load configuration")?;
    init_logging(&config)?;

    if config.command.trim().is_empty() {
        anyhow::bail!("No command configured (set `command` or {})", config::COMMAND_ENV);
    }

    let segments = config.load_segments().await?;
    let mut cluster = Cluster::new(segments, &OsEnvironment)
        .context("Failed to build cluster")?
        .with_log_sink(config.log_sink_name());
    if let Some(max) = config.max_concurrency {
        cluster = cluster.with_executor(ShellExecutor::new().with_max_concurrency(max));
    }

    info!(
        "Dispatching from {} as {} over {} segments ({:?})",
        cluster.hostname(),
        cluster.user(),
        cluster.topology().len(),
        config.scope
    );

    let output = cluster
        .generate_and_execute_command(&config.verbose_message, config.scope, |content_id| {
            template::render(&config.command, cluster.topology(), content_id)
        })
        .await;

    for key in output.keys() {
        if let Some(stdout) = output.stdout(key).filter(|s| !s.is_empty()) {
            println!("[{key}] {}", stdout.trim_end());
        }
    }

    if config.non_fatal {
        cluster.check_cluster_error_non_fatal(&output, &config.error_message, |_| "Error received".to_string());
    } else {
        cluster.check_cluster_error(&output, &config.error_message, |_| "Error received".to_string())?;
    }

    info!("Command finished on {} of {} entries", output.len() - output.num_errors(), output.len());
    Ok(())
}
