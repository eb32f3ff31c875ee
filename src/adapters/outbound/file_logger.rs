use crate::common::{DomainError, DomainResult};
use crate::domains::logger::{DynLogger, FileLogger};
use std::sync::Arc;

/// Start the `fast_log` file backend and hand out a planner logger writing to
/// it. The backend is process-wide, so a second call fails.
pub fn init_file_logger(path: &str) -> DomainResult<DynLogger> {
    FileLogger::init(path).map_err(|e| {
        DomainError::InfrastructureError(format!("Failed to initialize fast_log at {}: {}", path, e))
    })?;
    Ok(Arc::new(FileLogger))
}
