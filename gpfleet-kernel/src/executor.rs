//! Command execution for cluster dispatch
//!
//! Handles:
//! - Single local commands through `bash -c`
//! - Fan-out of a whole command map, one task per entry, joined before returning
//! - Capture of stdout, stderr and failure per dispatch key
//!
//! Per-command failures are collected into the [`RemoteOutput`], never returned early.

use crate::error::ExecutionError;
use crate::output::{CommandMap, CommandResult, RemoteOutput};
use crate::scope::Scope;
use async_trait::async_trait;
use futures::future::join_all;
use std::num::NonZeroUsize;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::process::Command as AsyncCommand;
use tokio::sync::Semaphore;
use tracing::debug;

/// Runs commands on behalf of a cluster. Swapped for a recording double in tests.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run `command` through the local shell; output is stdout followed by stderr
    async fn execute_local_command(&self, command: &str) -> Result<String, ExecutionError>;

    /// Run every entry of `commands` concurrently and wait for all of them
    async fn execute_cluster_command(&self, scope: Scope, commands: &CommandMap) -> RemoteOutput;
}

/// Executor that spawns real processes
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    limit: Option<Arc<Semaphore>>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap how many entries of a command map run at once
    pub fn with_max_concurrency(mut self, max: NonZeroUsize) -> Self {
        self.limit = Some(Arc::new(Semaphore::new(max.get())));
        self
    }
}

#[async_trait]
impl Executor for ShellExecutor {
    async fn execute_local_command(&self, command: &str) -> Result<String, ExecutionError> {
        debug!("Executing local command: {}", command);

        let output = AsyncCommand::new("bash")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExecutionError::Spawn {
                program: "bash".to_string(),
                reason: e.to_string(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        match status_error(output.status, &combined) {
            None => Ok(combined),
            Some(err) => Err(err),
        }
    }

    async fn execute_cluster_command(&self, scope: Scope, commands: &CommandMap) -> RemoteOutput {
        debug!("Dispatching {} commands ({:?})", commands.len(), scope);

        let mut keys = Vec::with_capacity(commands.len());
        let mut tasks = Vec::with_capacity(commands.len());
        for (&key, argv) in commands {
            let argv = argv.clone();
            let limit = self.limit.clone();
            keys.push((key, argv.join(" ")));
            tasks.push(tokio::spawn(async move {
                // Closed semaphores never happen here; run unthrottled if one did
                let _permit = match &limit {
                    Some(sem) => sem.clone().acquire_owned().await.ok(),
                    None => None,
                };
                run_command_vector(&argv).await
            }));
        }

        let mut output = RemoteOutput::new(scope);
        for ((key, command), joined) in keys.into_iter().zip(join_all(tasks).await) {
            let result = match joined {
                Ok(mut result) => {
                    result.command = command;
                    result
                }
                Err(e) => CommandResult::failed(command, ExecutionError::Failed(format!("dispatch task failed: {e}"))),
            };
            output.record(key, result);
        }
        output
    }
}

/// Spawn `argv[0]` with the remaining elements as arguments
async fn run_command_vector(argv: &[String]) -> CommandResult {
    let Some((program, args)) = argv.split_first() else {
        return CommandResult::failed("", ExecutionError::EmptyCommand);
    };

    let output = AsyncCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    match output {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let error = status_error(output.status, &stderr);
            CommandResult {
                command: String::new(),
                stdout,
                stderr,
                error,
            }
        }
        Err(e) => CommandResult::failed(
            "",
            ExecutionError::Spawn {
                program: program.clone(),
                reason: e.to_string(),
            },
        ),
    }
}

fn status_error(status: ExitStatus, output: &str) -> Option<ExecutionError> {
    if status.success() {
        return None;
    }
    Some(match status.code() {
        Some(code) => ExecutionError::ExitStatus {
            code,
            output: output.to_string(),
        },
        None => ExecutionError::Signal {
            output: output.to_string(),
        },
    })
}
