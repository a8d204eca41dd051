//! The cluster handle callers work with: topology, resolved identity and the executor.

use crate::env::SystemEnvironment;
use crate::error::{ClusterError, ExecutionError};
use crate::executor::{Executor, ShellExecutor};
use crate::output::{CommandMap, RemoteOutput};
use crate::scope::Scope;
use crate::topology::{SegConfig, Topology};
use tracing::info;

/// Name used for the diagnostic sink when the caller did not provide one
pub const DEFAULT_LOG_SINK: &str = "the log file";

pub struct Cluster {
    topology: Topology,
    user: String,
    hostname: String,
    log_sink: String,
    executor: Box<dyn Executor>,
}

impl Cluster {
    /// Build the topology and resolve user and hostname once
    pub fn new<I>(segments: I, env: &dyn SystemEnvironment) -> Result<Self, ClusterError>
    where
        I: IntoIterator<Item = SegConfig>,
    {
        let topology = Topology::new(segments)?;
        let user = env
            .current_user()
            .map_err(|source| ClusterError::Environment { what: "current user", source })?;
        let hostname = env
            .hostname()
            .map_err(|source| ClusterError::Environment { what: "hostname", source })?;

        Ok(Self {
            topology,
            user,
            hostname,
            log_sink: DEFAULT_LOG_SINK.to_string(),
            executor: Box::new(ShellExecutor::new()),
        })
    }

    pub fn with_executor<E: Executor + 'static>(mut self, executor: E) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Where per-entry diagnostics end up, named in fatal summaries
    pub fn with_log_sink(mut self, sink: impl Into<String>) -> Self {
        self.log_sink = sink.into();
        self
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn log_sink(&self) -> &str {
        &self.log_sink
    }

    pub async fn execute_local_command(&self, command: &str) -> Result<String, ExecutionError> {
        self.executor.execute_local_command(command).await
    }

    pub async fn execute_cluster_command(&self, scope: Scope, commands: &CommandMap) -> RemoteOutput {
        self.executor.execute_cluster_command(scope, commands).await
    }

    /// Build the command map `scope` calls for and dispatch it.
    ///
    /// Per-host scopes collapse co-located segments, `*AndMaster` scopes add the
    /// master, and `OnMasterTo*` scopes run every command locally on the master.
    pub async fn generate_and_execute_command<F>(&self, verbose_msg: &str, scope: Scope, generator: F) -> RemoteOutput
    where
        F: Fn(i32) -> String,
    {
        info!("{}", verbose_msg);
        let include_master = scope.includes_master();
        let commands = match (scope.is_from_master(), scope.is_per_host()) {
            (true, true) => self.generate_local_command_map_for_hosts(include_master, generator),
            (true, false) => self.generate_local_command_map_for_segments(include_master, generator),
            (false, true) => self.generate_ssh_command_map_for_hosts(include_master, generator),
            (false, false) => self.generate_ssh_command_map_for_segments(include_master, generator),
        };
        self.execute_cluster_command(scope, &commands).await
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("topology", &self.topology)
            .field("user", &self.user)
            .field("hostname", &self.hostname)
            .field("log_sink", &self.log_sink)
            .finish_non_exhaustive()
    }
}
