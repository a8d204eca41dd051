use crate::error::ExecutionError;
use crate::scope::Scope;
use std::collections::BTreeMap;

/// Command vectors keyed by dispatch key (see [`crate::scope::DispatchKey`])
pub type CommandMap = BTreeMap<i32, Vec<String>>;

/// What one dispatch entry produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// The command as it was run, kept for diagnostics
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<ExecutionError>,
}

impl CommandResult {
    pub fn failed(command: impl Into<String>, error: ExecutionError) -> Self {
        Self {
            command: command.into(),
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Results of one cluster dispatch, one entry per command map key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    pub scope: Scope,
    num_errors: usize,
    results: BTreeMap<i32, CommandResult>,
}

impl RemoteOutput {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            num_errors: 0,
            results: BTreeMap::new(),
        }
    }

    /// Store the result for `key`, keeping the error count in step
    pub fn record(&mut self, key: i32, result: CommandResult) -> &mut Self {
        if result.error.is_some() {
            self.num_errors += 1;
        }
        if let Some(previous) = self.results.insert(key, result) {
            if previous.error.is_some() {
                self.num_errors -= 1;
            }
        }
        self
    }

    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.results.keys().copied()
    }

    pub fn result(&self, key: i32) -> Option<&CommandResult> {
        self.results.get(&key)
    }

    pub fn stdout(&self, key: i32) -> Option<&str> {
        self.result(key).map(|r| r.stdout.as_str())
    }

    pub fn stderr(&self, key: i32) -> Option<&str> {
        self.result(key).map(|r| r.stderr.as_str())
    }

    pub fn error(&self, key: i32) -> Option<&ExecutionError> {
        self.result(key).and_then(|r| r.error.as_ref())
    }

    pub fn command(&self, key: i32) -> Option<&str> {
        self.result(key).map(|r| r.command.as_str())
    }

    /// Failed entries in ascending key order
    pub fn failures(&self) -> impl Iterator<Item = (i32, &CommandResult, &ExecutionError)> + '_ {
        self.results
            .iter()
            .filter_map(|(&key, r)| r.error.as_ref().map(|err| (key, r, err)))
    }

    pub fn failed_keys(&self) -> Vec<i32> {
        self.failures().map(|(key, _, _)| key).collect()
    }
}
