//! Failure classification and reporting for a finished dispatch.
//!
//! Every failed entry gets a debug-level diagnostic phrased for the scope.
//! Any failure at all turns into a single aggregate summary which the caller
//! must propagate to abort the enclosing operation.

use crate::cluster::Cluster;
use crate::error::{ClusterError, ExecutionError};
use crate::output::RemoteOutput;
use crate::scope::{DispatchKey, Scope};
use tracing::{debug, error};

/// `"<base> on [master for ]N segment(s)|host(s). See <sink> for a complete list of errors."`
pub fn fatal_cluster_error_message(base: &str, scope: Scope, count: usize, sink: &str) -> String {
    let master_for = if scope.is_from_master() { "master for " } else { "" };
    format!(
        "{base} on {master_for}{count} {}. See {sink} for a complete list of errors.",
        scope.unit_noun(count)
    )
}

/// Log the aggregate summary and hand back the error that ends the operation
pub fn log_fatal_cluster_error(base: &str, scope: Scope, count: usize, sink: &str) -> ClusterError {
    let message = fatal_cluster_error_message(base, scope, count, sink);
    error!("{}", message);
    ClusterError::Aggregate(message)
}

/// Scope-specific phrase for one failed entry
pub fn entry_diagnostic(
    scope: Scope,
    message: &str,
    key: i32,
    host: &str,
    err: &ExecutionError,
    stderr: &str,
) -> String {
    let from_master = if scope.is_from_master() { "on master for " } else { "on " };
    let target = match DispatchKey::decode(key, scope) {
        DispatchKey::Host(_) => format!("host {host}"),
        DispatchKey::Coordinator if scope.is_per_host() => format!("host {host}"),
        DispatchKey::Segment(id) => format!("segment {id} on host {host}"),
        DispatchKey::Coordinator => format!("segment {key} on host {host}"),
    };
    format!("{message} {from_master}{target} with error {err}: {}", stderr.trim_end())
}

impl Cluster {
    /// Abort with a summary when any entry of `output` failed.
    ///
    /// `message_for` gives the leading words of each per-entry diagnostic.
    pub fn check_cluster_error<F>(&self, output: &RemoteOutput, final_msg: &str, message_for: F) -> Result<(), ClusterError>
    where
        F: Fn(i32) -> String,
    {
        if output.num_errors() == 0 {
            return Ok(());
        }
        self.log_entry_errors(output, &message_for);
        Err(log_fatal_cluster_error(final_msg, output.scope, output.num_errors(), self.log_sink()))
    }

    /// Same diagnostics as [`Cluster::check_cluster_error`], but the summary is only logged
    pub fn check_cluster_error_non_fatal<F>(&self, output: &RemoteOutput, final_msg: &str, message_for: F)
    where
        F: Fn(i32) -> String,
    {
        if output.num_errors() == 0 {
            return;
        }
        self.log_entry_errors(output, &message_for);
        error!(
            "{}",
            fatal_cluster_error_message(final_msg, output.scope, output.num_errors(), self.log_sink())
        );
    }

    /// Summary for failures counted elsewhere
    pub fn report_fatal(&self, base: &str, scope: Scope, count: usize) -> ClusterError {
        log_fatal_cluster_error(base, scope, count, self.log_sink())
    }

    fn log_entry_errors<F>(&self, output: &RemoteOutput, message_for: &F)
    where
        F: Fn(i32) -> String,
    {
        let scope = output.scope;
        for (key, result, err) in output.failures() {
            let host = self.topology().host_for(key).unwrap_or("<unknown>");
            // scp-style commands name both sides; echo the raw command ahead of the phrase
            if scope.is_from_master() {
                debug!("{}", result.command);
            }
            debug!("{}", entry_diagnostic(scope, &message_for(key), key, host, err, &result.stderr));
            debug!("Command was: {}", result.command);
        }
    }
}
