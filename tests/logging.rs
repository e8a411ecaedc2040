use skyline_viewer::logging;
use tempfile::tempdir;

#[test]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("viewer.log");

    let (subscriber, guard) = logging::subscriber(true, Some(&path)).unwrap();
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("viewer test message");
    });
    drop(guard);

    assert!(path.exists(), "log file was not created");
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("viewer test message"));
}

#[test]
fn info_level_hides_debug_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("viewer.log");

    let (subscriber, guard) = logging::subscriber(false, Some(&path)).unwrap();
    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("hidden detail");
        tracing::info!("visible summary");
    });
    drop(guard);

    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("visible summary"));
    assert!(!contents.contains("hidden detail"));
}

#[test]
fn without_file_creates_no_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("viewer.log");

    let (subscriber, guard) = logging::subscriber(false, None).unwrap();
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("to stderr");
    });

    assert!(guard.is_none());
    assert!(!path.exists(), "log file should not be created");
}
