/*!
Canonical segment layout for tests

Master and two segments on `localhost`, two more segments on
`remotehost1` / `remotehost2`.
*/

use crate::environment::StaticEnvironment;
use gpfleet_kernel::{Cluster, ClusterError, SegConfig};

fn seg(dbid: i32, content_id: i32, port: u16, hostname: &str) -> SegConfig {
    SegConfig {
        dbid,
        content_id,
        port,
        hostname: hostname.to_string(),
        data_dir: format!("/data/gpseg{content_id}"),
    }
}

pub fn master_seg() -> SegConfig {
    seg(1, -1, 5432, "localhost")
}

pub fn local_seg_one() -> SegConfig {
    seg(2, 0, 20000, "localhost")
}

pub fn remote_seg_one() -> SegConfig {
    seg(3, 1, 20001, "remotehost1")
}

pub fn local_seg_two() -> SegConfig {
    seg(4, 2, 20002, "localhost")
}

pub fn remote_seg_two() -> SegConfig {
    seg(5, 3, 20003, "remotehost2")
}

/// Cluster over `segments` with the `testUser`@`testHost` identity and the real executor
pub fn test_cluster(segments: Vec<SegConfig>) -> Result<Cluster, ClusterError> {
    Cluster::new(segments, &StaticEnvironment::test())
}
