use gpfleet_devkit::fixtures::{master_seg, remote_seg_one};
use gpfleet_devkit::{test_cluster, TestExecutor};
use gpfleet_kernel::{CommandMap, ExecutionError, Scope, ShellExecutor};
use std::num::NonZeroUsize;
use std::path::Path;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn test_execute_local_command_runs_the_command() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("foo");
    let cluster = test_cluster(vec![master_seg()]).unwrap();

    cluster
        .execute_local_command(&format!("touch {}", path_str(&target)))
        .await
        .unwrap();

    assert!(target.exists());
}

#[tokio::test]
async fn test_execute_local_command_reports_shell_failure() {
    let cluster = test_cluster(vec![master_seg()]).unwrap();

    let err = cluster
        .execute_local_command("some-non-existent-command /tmp/gpfleet_test/foo")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "exit status 127");
    assert!(err.output().starts_with("bash: "));
    assert!(err.output().ends_with("some-non-existent-command: command not found\n"));
}

#[tokio::test]
async fn test_execute_cluster_command_runs_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let foo = dir.path().join("foo");
    let baz = dir.path().join("baz");
    let cluster = test_cluster(vec![master_seg()]).unwrap();

    let mut commands = CommandMap::new();
    commands.insert(-1, argv(&["touch", &path_str(&foo)]));
    commands.insert(0, argv(&["touch", &path_str(&baz)]));
    let output = cluster.execute_cluster_command(Scope::OnSegmentsAndMaster, &commands).await;

    assert!(foo.exists());
    assert!(baz.exists());
    assert_eq!(output.num_errors(), 0);
    assert_eq!(output.len(), 2);
    assert_eq!(output.scope, Scope::OnSegmentsAndMaster);
}

#[tokio::test]
async fn test_execute_cluster_command_collects_a_single_failure() {
    let dir = tempfile::tempdir().unwrap();
    let foo = dir.path().join("foo");
    let cluster = test_cluster(vec![master_seg()]).unwrap();

    let mut commands = CommandMap::new();
    commands.insert(-1, argv(&["touch", &path_str(&foo)]));
    commands.insert(0, argv(&["some-non-existent-command"]));
    commands.insert(1, argv(&["bash", "-c", "echo fine"]));
    let output = cluster.execute_cluster_command(Scope::OnSegmentsAndMaster, &commands).await;

    assert!(foo.exists());
    assert_eq!(output.num_errors(), 1);
    assert_eq!(output.len(), 3);
    assert_eq!(output.keys().collect::<Vec<_>>(), vec![-1, 0, 1]);
    match output.error(0) {
        Some(ExecutionError::Spawn { program, .. }) => assert_eq!(program, "some-non-existent-command"),
        other => panic!("expected spawn error, got {other:?}"),
    }
    assert_eq!(output.command(0), Some("some-non-existent-command"));
    assert_eq!(output.stdout(1), Some("fine\n"));
}

#[tokio::test]
async fn test_dispatch_runs_entries_concurrently() {
    let cluster = test_cluster(vec![master_seg()]).unwrap();
    let mut commands = CommandMap::new();
    for key in 0..6 {
        commands.insert(key, argv(&["sleep", "1"]));
    }

    let started = std::time::Instant::now();
    let output = cluster.execute_cluster_command(Scope::OnSegments, &commands).await;

    assert_eq!(output.num_errors(), 0);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn test_bounded_executor_still_populates_every_key() {
    let cluster = test_cluster(vec![master_seg()])
        .unwrap()
        .with_executor(ShellExecutor::new().with_max_concurrency(NonZeroUsize::MIN));
    let mut commands = CommandMap::new();
    for key in 0..4 {
        commands.insert(key, argv(&["bash", "-c", &format!("echo {key}; exit {}", key % 2)]));
    }

    let output = cluster.execute_cluster_command(Scope::OnSegments, &commands).await;

    assert_eq!(output.len(), 4);
    assert_eq!(output.num_errors(), 2);
    assert_eq!(output.failed_keys(), vec![1, 3]);
    assert_eq!(output.stdout(2), Some("2\n"));
}

#[tokio::test]
async fn test_generate_and_execute_picks_map_from_scope() {
    let executor = TestExecutor::new();
    let cluster = test_cluster(vec![master_seg(), remote_seg_one()])
        .unwrap()
        .with_executor(executor.clone());

    cluster
        .generate_and_execute_command("Checking segments", Scope::OnSegmentsAndMaster, |id| format!("echo {id}"))
        .await;
    cluster
        .generate_and_execute_command("Copying to hosts", Scope::OnMasterToHosts, |id| format!("scp f remotehost1:/d/{id}"))
        .await;

    let dispatched = executor.cluster_commands();
    assert_eq!(dispatched.len(), 2);

    let (scope, commands) = &dispatched[0];
    assert_eq!(*scope, Scope::OnSegmentsAndMaster);
    assert_eq!(commands[&-1], argv(&["bash", "-c", "echo -1"]));
    assert_eq!(
        commands[&1],
        argv(&["ssh", "-o", "StrictHostKeyChecking=no", "testUser@remotehost1", "echo 1"])
    );

    let (scope, commands) = &dispatched[1];
    assert_eq!(*scope, Scope::OnMasterToHosts);
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[&1], argv(&["bash", "-c", "scp f remotehost1:/d/1"]));
}

#[tokio::test]
async fn test_local_command_goes_through_injected_executor() {
    let executor = TestExecutor::new().with_local_output("ok\n");
    let cluster = test_cluster(vec![master_seg()]).unwrap().with_executor(executor.clone());

    assert_eq!(cluster.execute_local_command("gpstate -s").await.unwrap(), "ok\n");
    assert_eq!(executor.local_commands(), vec!["gpstate -s".to_string()]);
}
