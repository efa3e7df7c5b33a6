// Installs process-wide tracing and log backends, so it lives in its own test binary.
use rrt_star_app::adapters::outbound::{init_session_logger, init_tracing};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_file_logging_works_after_tracing_is_installed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planner.log");
    let path_str = path.to_str().unwrap();

    init_tracing("info").unwrap();
    let logger = init_session_logger(Some(path_str), "info", "s-log");
    logger.info("episode 1 reached goal");
    log::logger().flush();

    let mut content = String::new();
    for _ in 0..100 {
        content = fs::read_to_string(&path).unwrap_or_default();
        if content.contains("episode 1 reached goal") {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    assert!(
        content.contains("[s-log] episode 1 reached goal"),
        "log file did not receive the line, got {:?}",
        content
    );
}
