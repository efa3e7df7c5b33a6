use std::sync::{Arc, Mutex};

use rrt_star_app::adapters::outbound::{init_console_logger, init_noop_logger, MultiLogger};
use rrt_star_app::application::PathPlanningService;
use rrt_star_app::config::Config;
use rrt_star_app::domains::logger::DomainLogger;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[test]
fn test_service_reports_through_injected_logger() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = capture.clone() as Arc<dyn DomainLogger>;

    let mut config = Config::default();
    config.session.id = "logged".to_string();
    config.planner.seed = Some(4);
    config.planner.max_iterations = Some(100_000);
    let mut service = PathPlanningService::new(&config, logger).unwrap();

    service.plan_for_selector(8).unwrap();
    assert!(service.plan_for_selector(12).is_err());

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("INFO:Session logged ready")));
    assert!(msgs.iter().any(|m| m.starts_with("INFO:Episode 1 reached BottomCenter")));
    assert!(msgs.iter().any(|m| m.starts_with("ERR:") && m.contains("12")));
}

#[test]
fn test_timeout_is_logged_as_warning() {
    let capture = Arc::new(BridgeCapture::new());
    let mut config = Config::default();
    config.planner.max_iterations = Some(0);
    let mut service = PathPlanningService::new(&config, capture.clone()).unwrap();

    let report = service.run_episode(2).unwrap();
    assert!(report.path().is_none());

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("WARN:Episode 1 toward TopCenter gave up after 0 iterations")));
}

#[test]
fn test_multi_and_noop_logger() {
    let primary = Arc::new(BridgeCapture::new());
    let secondary = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::default()
        .with_sink(primary.clone())
        .with_sink(secondary.clone());
    assert_eq!(multi.len(), 2);

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&primary, &secondary] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(*msgs, vec!["INFO:one", "WARN:two", "ERR:three"]);
    }

    // With no sinks a message is simply dropped
    let empty = MultiLogger::new(Vec::new());
    assert!(empty.is_empty());
    empty.error("dropped");

    // Console and no-op loggers accept calls without a subscriber installed
    let console = init_console_logger();
    console.info("ignored");
    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}
