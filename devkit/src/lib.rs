/*!
# gpfleet DevKit - test doubles for the cluster kernel

Lets tests drive a `Cluster` without real hosts:
- `StaticEnvironment`: pinned user and hostname
- `TestExecutor`: records dispatched commands and replays canned results
- `LogCapture`: in-memory diagnostic sink for asserting on emitted lines
- `fixtures`: the canonical master/segment layout used across tests
*/

pub mod environment;
pub mod fixtures;
pub mod log_capture;
pub mod test_executor;

pub use environment::StaticEnvironment;
pub use fixtures::test_cluster;
pub use log_capture::LogCapture;
pub use test_executor::TestExecutor;
