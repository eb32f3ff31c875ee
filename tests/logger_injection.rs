use auv_fleet_planner::adapters::outbound::{
    init_combined_logger, init_console_logger, init_noop_logger, MultiLogger,
};
use auv_fleet_planner::config::LoggingConfig;
use auv_fleet_planner::domains::logger::{DomainLogger, DynLogger, LogLevel};
use std::sync::{Arc, Mutex};

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
fn test_multi_logger_fans_out_in_order() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![first.clone() as DynLogger, second.clone() as DynLogger]);
    assert_eq!(multi.len(), 2);

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&first, &second] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(*msgs, vec!["INFO:one", "WARN:two", "ERR:three"]);
    }
}

#[test]
fn test_log_level_dispatch() {
    let capture = Arc::new(BridgeCapture::new());
    capture.log(LogLevel::Warn, "careful");
    capture.log(LogLevel::Error, "broken");
    capture.log(LogLevel::Info, "fine");
    let msgs = capture.messages.lock().unwrap();
    assert_eq!(*msgs, vec!["WARN:careful", "ERR:broken", "INFO:fine"]);
}

#[test]
fn test_noop_and_console_loggers() {
    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");

    let console = init_console_logger();
    console.info("console info");
    console.warn("console warn");
}

#[test]
fn test_combined_logger_without_file_uses_console() {
    let logger = init_combined_logger(&LoggingConfig::default());
    logger.info("combined");
    let empty = MultiLogger::new(Vec::new());
    assert!(empty.is_empty());
    empty.warn("nobody listens");
}
