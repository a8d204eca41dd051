//! Error taxonomy for the cluster core.
//!
//! - `ClusterError`: construction, lookup, topology loading and the aggregate summary
//! - `ExecutionError`: a single command that failed, captured per dispatch key

use thiserror::Error;

/// Errors crossing back to the caller of the cluster core
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Two segment rows carry the same content id
    #[error("duplicate content id {0} in segment configuration")]
    DuplicateContent(i32),
    #[error("no segment with content id {0}")]
    ContentNotFound(i32),
    #[error("failed to resolve {what}: {source}")]
    Environment {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// Summary of every failed entry of a dispatch. Terminates the enclosing operation.
    #[error("{0}")]
    Aggregate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of one local or remote command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Process ran and exited non-zero. `output` holds what it printed.
    #[error("exit status {code}")]
    ExitStatus { code: i32, output: String },
    #[error("terminated by signal")]
    Signal { output: String },
    #[error("failed to spawn {program:?}: {reason}")]
    Spawn { program: String, reason: String },
    #[error("empty command vector")]
    EmptyCommand,
    #[error("{0}")]
    Failed(String),
}

impl ExecutionError {
    /// Output captured before the failure, empty when the process never ran
    pub fn output(&self) -> &str {
        match self {
            ExecutionError::ExitStatus { output, .. } | ExecutionError::Signal { output } => output,
            _ => "",
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionError::ExitStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_display() {
        let err = ExecutionError::ExitStatus { code: 127, output: "bash: nope: command not found\n".into() };
        assert_eq!(err.to_string(), "exit status 127");
        assert_eq!(err.exit_code(), Some(127));
        assert!(err.output().contains("command not found"));
    }

    #[test]
    fn test_spawn_error_has_no_output() {
        let err = ExecutionError::Spawn { program: "missing".into(), reason: "No such file or directory".into() };
        assert_eq!(err.output(), "");
        assert_eq!(err.exit_code(), None);
        assert!(err.to_string().contains("\"missing\""));
    }
}
