//! gpfleet kernel - command dispatch core for segment-based database clusters
//!
//! Given a topology of segments spread across hosts, this crate:
//! - Builds per-segment or per-host command maps, local (`bash -c`) or remote (`ssh`)
//! - Runs a command map concurrently and collects every entry's output and error
//! - Phrases per-entry failures for the execution scope and raises one aggregate summary
//!
//! Typical flow: [`Cluster::new`] → `generate_*_command_map_*` → [`Cluster::execute_cluster_command`]
//! → [`Cluster::check_cluster_error`].

pub mod cluster;
pub mod command;
pub mod env;
pub mod error;
pub mod executor;
pub mod output;
pub mod report;
pub mod scope;
pub mod source;
pub mod topology;

pub use cluster::{Cluster, DEFAULT_LOG_SINK};
pub use command::{construct_local_command, construct_ssh_command};
pub use env::{OsEnvironment, SystemEnvironment};
pub use error::{ClusterError, ExecutionError};
pub use executor::{Executor, ShellExecutor};
pub use output::{CommandMap, CommandResult, RemoteOutput};
pub use report::{entry_diagnostic, fatal_cluster_error_message, log_fatal_cluster_error};
pub use scope::{DispatchKey, Scope, MASTER_CONTENT_ID};
pub use source::{load_segments, parse_segments, SegmentRow, SEGMENT_CONFIGURATION_QUERY};
pub use topology::{SegConfig, Topology};
