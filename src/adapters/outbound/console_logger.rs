use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::sync::Arc;

struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) {
        println!("{} INFO  {}", Utc::now().format("%H:%M:%S%.3f"), msg);
    }

    fn warn(&self, msg: &str) {
        println!("{} WARN  {}", Utc::now().format("%H:%M:%S%.3f"), msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("{} ERROR {}", Utc::now().format("%H:%M:%S%.3f"), msg);
    }
}

/// Console-backed planner logger; the fallback when no log file is configured.
pub fn init_console_logger() -> DynLogger {
    Arc::new(ConsoleBridge)
}
