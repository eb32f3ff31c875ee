use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

use super::console_logger::init_console_logger;
use super::file_logger::init_file_logger;

/// Fans every message out to a list of sinks, in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// Logger described by the `[logging]` section: file plus console when a file
/// path is configured and can be opened, console only otherwise.
pub fn init_combined_logger(config: &LoggingConfig) -> DynLogger {
    let console = init_console_logger();
    let Some(path) = config.file_path.as_deref() else {
        return console;
    };
    match init_file_logger(path) {
        Ok(file) => Arc::new(MultiLogger::new(vec![file, console])),
        Err(e) => {
            tracing::warn!("falling back to console logging: {}", e);
            console
        }
    }
}
