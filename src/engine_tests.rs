use super::*;

fn no_root(_: &Path) -> Option<PathBuf> {
    None
}

#[tokio::test]
async fn missing_project_root_is_a_configuration_error() {
    let engine = Engine::new(|_: &Path| Backend::Vitest, no_root);

    let output = engine.execute(Path::new("/nowhere/a.test.ts"), None, None).await;

    assert!(!output.success);
    assert_eq!(output.backend, Backend::Unknown);
    assert!(output.results.is_empty());
    assert_eq!(output.summary.total, 0);
    assert_eq!(
        output.error.as_deref(),
        Some("could not find a project root for /nowhere/a.test.ts")
    );
}

#[tokio::test]
async fn unknown_backend_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(|_: &Path| Backend::Unknown, no_root);

    let output = engine
        .execute(&dir.path().join("a.test.ts"), Some(dir.path()), None)
        .await;

    assert!(!output.success);
    assert_eq!(output.backend, Backend::Unknown);
    assert!(output.error.unwrap().starts_with("could not detect a test backend"));
}

#[tokio::test]
async fn resolver_and_detector_see_the_right_paths() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let expected_root = root.clone();
    let engine = Engine::new(
        move |project_root: &Path| {
            assert_eq!(project_root, expected_root);
            Backend::Unknown
        },
        move |target: &Path| {
            assert!(target.ends_with("src/a.test.ts"));
            Some(root.clone())
        },
    );

    let output = engine
        .execute(&dir.path().join("src/a.test.ts"), None, None)
        .await;

    assert!(output.error.unwrap().contains(&dir.path().display().to_string()));
}
