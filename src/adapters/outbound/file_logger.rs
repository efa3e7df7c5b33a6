use crate::domains::logger::{level_from_filter, DomainLogger, FileLogger};
use std::sync::Arc;

/// Install the process-wide file logger and return a handle tagged with `session_id`.
pub fn init_file_logger(path: &str, filter: &str, session_id: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, level_from_filter(filter))
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileLogger::new(session_id)))
}
