use gpfleet_devkit::fixtures::{local_seg_one, local_seg_two, master_seg, remote_seg_one, remote_seg_two};
use gpfleet_devkit::{test_cluster, StaticEnvironment};
use gpfleet_kernel::{load_segments, Cluster, ClusterError, DEFAULT_LOG_SINK};
use std::io::Write;

#[test]
fn test_single_host_single_segment() {
    let cluster = test_cluster(vec![master_seg(), local_seg_one()]).unwrap();
    let topology = cluster.topology();

    assert_eq!(topology.content_ids().len(), 2);
    assert_eq!(topology.data_dir_for(-1).unwrap(), "/data/gpseg-1");
    assert_eq!(topology.host_for(-1).unwrap(), "localhost");
    assert_eq!(topology.data_dir_for(0).unwrap(), "/data/gpseg0");
    assert_eq!(topology.host_for(0).unwrap(), "localhost");
}

#[test]
fn test_single_host_multi_segment() {
    let cluster = test_cluster(vec![master_seg(), local_seg_one(), local_seg_two()]).unwrap();
    let topology = cluster.topology();

    assert_eq!(topology.content_ids(), vec![-1, 0, 2]);
    assert_eq!(topology.data_dir_for(2).unwrap(), "/data/gpseg2");
    assert_eq!(topology.host_for(2).unwrap(), "localhost");
    assert_eq!(topology.hostnames(), vec!["localhost".to_string()]);
}

#[test]
fn test_multi_host_multi_segment() {
    let cluster = test_cluster(vec![master_seg(), local_seg_one(), remote_seg_two()]).unwrap();
    let topology = cluster.topology();

    assert_eq!(topology.content_ids().len(), 3);
    assert_eq!(topology.data_dir_for(3).unwrap(), "/data/gpseg3");
    assert_eq!(topology.host_for(3).unwrap(), "remotehost2");
    assert_eq!(topology.port_for(3).unwrap(), 20003);
    assert_eq!(topology.dbid_for(3).unwrap(), 5);
}

#[test]
fn test_duplicate_content_id_fails_construction() {
    let mut duplicate = remote_seg_one();
    duplicate.content_id = 0;
    let err = test_cluster(vec![master_seg(), local_seg_one(), duplicate]).unwrap_err();
    assert!(matches!(err, ClusterError::DuplicateContent(0)));
}

#[test]
fn test_unknown_content_id() {
    let cluster = test_cluster(vec![master_seg()]).unwrap();
    assert!(matches!(cluster.topology().host_for(42), Err(ClusterError::ContentNotFound(42))));
}

#[test]
fn test_missing_user_fails_construction() {
    let err = Cluster::new(vec![master_seg()], &StaticEnvironment::test().without_user()).unwrap_err();
    assert!(matches!(err, ClusterError::Environment { what: "current user", .. }));
}

#[test]
fn test_default_log_sink() {
    let cluster = test_cluster(vec![master_seg()]).unwrap();
    assert_eq!(cluster.log_sink(), DEFAULT_LOG_SINK);
    assert_eq!(cluster.with_log_sink("/tmp/gpAdminLogs/x.log").log_sink(), "/tmp/gpAdminLogs/x.log");
}

#[tokio::test]
async fn test_load_segments_snapshot_into_cluster() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "- {{dbid: 1, content_id: -1, port: 5432, hostname: mdw, data_dir: /data/gpseg-1}}\n\
         - {{dbid: 2, content_id: 0, port: 20000, hostname: sdw1, data_dir: /data/gpseg0}}\n\
         - {{dbid: 3, content_id: 1, port: 20001, hostname: sdw1, data_dir: /data/gpseg1}}"
    )
    .unwrap();

    let segments = load_segments(file.path()).await.unwrap();
    let cluster = Cluster::new(segments, &StaticEnvironment::new("gpadmin", "mdw")).unwrap();

    assert_eq!(cluster.topology().len(), 3);
    assert_eq!(cluster.topology().representative_host_map(false).len(), 1);
    assert_eq!(
        cluster.construct_ssh_command("sdw1", "ls"),
        vec!["ssh", "-o", "StrictHostKeyChecking=no", "gpadmin@sdw1", "ls"]
    );
}
