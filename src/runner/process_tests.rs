use std::time::Instant;

use super::*;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[cfg(unix)]
#[tokio::test]
async fn captures_both_streams() {
    let dir = tempfile::tempdir().unwrap();

    let exit = run_with_timeout(
        "sh",
        &sh("printf '{\"ok\":true}'; printf 'warn' >&2"),
        dir.path(),
        Duration::from_secs(10),
    )
    .await
    .unwrap();

    let Exit::Completed(captured) = exit else {
        panic!("expected the backend to complete");
    };
    assert!(captured.status.success());
    assert_eq!(captured.stdout, "{\"ok\":true}");
    assert_eq!(captured.stderr, "warn");
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_still_completes() {
    let dir = tempfile::tempdir().unwrap();

    let exit = run_with_timeout("sh", &sh("echo out; exit 3"), dir.path(), Duration::from_secs(10))
        .await
        .unwrap();

    let Exit::Completed(captured) = exit else {
        panic!("expected the backend to complete");
    };
    assert_eq!(captured.status.code(), Some(3));
    assert_eq!(captured.stdout, "out\n");
}

#[cfg(unix)]
#[tokio::test]
async fn runs_in_the_given_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "here").unwrap();

    let exit = run_with_timeout("sh", &sh("cat marker.txt"), dir.path(), Duration::from_secs(10))
        .await
        .unwrap();

    let Exit::Completed(captured) = exit else {
        panic!("expected the backend to complete");
    };
    assert_eq!(captured.stdout, "here");
}

#[cfg(unix)]
#[tokio::test]
async fn deadline_wins_over_slow_process() {
    let dir = tempfile::tempdir().unwrap();
    let started = Instant::now();

    let exit = run_with_timeout("sh", &sh("sleep 30"), dir.path(), Duration::from_millis(100))
        .await
        .unwrap();

    assert!(matches!(exit, Exit::TimedOut));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn missing_program_is_a_launch_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = run_with_timeout(
        "testlens-definitely-not-a-real-binary",
        &[],
        dir.path(),
        Duration::from_secs(5),
    )
    .await
    .unwrap_err();

    let text = format!("{err:#}");
    assert!(text.starts_with("failed to launch `testlens-definitely-not-a-real-binary`"));
    assert!(text.contains("`: "), "missing OS error in {text:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn exit_completes_even_if_a_worker_holds_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let started = Instant::now();

    let exit = run_with_timeout(
        "sh",
        &sh("echo report; sleep 3 & exit 0"),
        dir.path(),
        Duration::from_secs(2),
    )
    .await
    .unwrap();

    let Exit::Completed(captured) = exit else {
        panic!("expected the backend to complete");
    };
    assert!(captured.status.success());
    assert_eq!(captured.stdout, "report\n");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn exit_kills_workers_left_in_the_group() {
    let dir = tempfile::tempdir().unwrap();

    let exit = run_with_timeout(
        "sh",
        &sh("sleep 30 >/dev/null 2>&1 & echo $! > worker.pid; echo done"),
        dir.path(),
        Duration::from_secs(10),
    )
    .await
    .unwrap();
    assert!(matches!(exit, Exit::Completed(_)));

    let pid = std::fs::read_to_string(dir.path().join("worker.pid")).unwrap();
    let stat = format!("/proc/{}/stat", pid.trim());
    let deadline = Instant::now() + Duration::from_secs(5);
    let running = || std::fs::read_to_string(&stat).is_ok_and(|s| !s.contains(") Z "));
    while running() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!running(), "worker {} outlived the backend", pid.trim());
}
