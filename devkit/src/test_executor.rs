/*!
Recording executor for tests

Stands in for `ShellExecutor`: nothing is spawned. Local commands and command
maps are recorded, and canned outputs or per-key failures are replayed.
Clones share state, so a test keeps one clone after handing the other to a
`Cluster`.
*/

use async_trait::async_trait;
use gpfleet_kernel::{CommandMap, CommandResult, ExecutionError, Executor, RemoteOutput, Scope};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ExecutorState {
    local_output: String,
    local_error: Option<ExecutionError>,
    cluster_output: Option<RemoteOutput>,
    failing_keys: HashMap<i32, (String, ExecutionError)>,
    local_commands: Vec<String>,
    cluster_commands: Vec<(Scope, CommandMap)>,
}

#[derive(Debug, Clone, Default)]
pub struct TestExecutor {
    state: Arc<Mutex<ExecutorState>>,
}

impl TestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local_output(self, output: &str) -> Self {
        self.state.lock().local_output = output.to_string();
        self
    }

    pub fn with_local_error(self, error: ExecutionError) -> Self {
        self.state.lock().local_error = Some(error);
        self
    }

    /// Replay `output` for every cluster dispatch, scope replaced by the dispatched one
    pub fn with_cluster_output(self, output: RemoteOutput) -> Self {
        self.state.lock().cluster_output = Some(output);
        self
    }

    /// Make `key` fail with `error` and `stderr` in generated outputs
    pub fn fail_key(self, key: i32, stderr: &str, error: ExecutionError) -> Self {
        self.state.lock().failing_keys.insert(key, (stderr.to_string(), error));
        self
    }

    pub fn local_commands(&self) -> Vec<String> {
        self.state.lock().local_commands.clone()
    }

    pub fn cluster_commands(&self) -> Vec<(Scope, CommandMap)> {
        self.state.lock().cluster_commands.clone()
    }

    pub fn num_executions(&self) -> usize {
        let state = self.state.lock();
        state.local_commands.len() + state.cluster_commands.len()
    }
}

#[async_trait]
impl Executor for TestExecutor {
    async fn execute_local_command(&self, command: &str) -> Result<String, ExecutionError> {
        let mut state = self.state.lock();
        state.local_commands.push(command.to_string());
        match &state.local_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.local_output.clone()),
        }
    }

    async fn execute_cluster_command(&self, scope: Scope, commands: &CommandMap) -> RemoteOutput {
        let mut state = self.state.lock();
        state.cluster_commands.push((scope, commands.clone()));

        if let Some(canned) = &state.cluster_output {
            let mut output = canned.clone();
            output.scope = scope;
            return output;
        }

        let mut output = RemoteOutput::new(scope);
        for (&key, argv) in commands {
            let mut result = CommandResult {
                command: argv.join(" "),
                ..CommandResult::default()
            };
            if let Some((stderr, err)) = state.failing_keys.get(&key) {
                result.stderr = stderr.clone();
                result.error = Some(err.clone());
            }
            output.record(key, result);
        }
        output
    }
}
