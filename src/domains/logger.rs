use chrono::Utc;
use log::LevelFilter;
use std::sync::Arc;

/// Domain-level logging port (Hexagonal port).
/// Small and infallible; the planner reports episode milestones through it.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Writes through the `log` facade once `fast_log` has been initialized.
/// Every line carries a UTC timestamp and the session tag.
pub struct FileLogger {
    tag: String,
}

impl FileLogger {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string() }
    }

    /// Install `fast_log` writing to the file at `path`.
    pub fn init(path: &str, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(fast_log::config::Config::new().file(path).level(level))?;
        Ok(())
    }

    fn line(&self, msg: &str) -> String {
        format!("{} [{}] {}", Utc::now().to_rfc3339(), self.tag, msg)
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log::info!("{}", self.line(msg));
    }

    fn warn(&self, msg: &str) {
        log::warn!("{}", self.line(msg));
    }

    fn error(&self, msg: &str) {
        log::error!("{}", self.line(msg));
    }
}

/// Level for the file logger from a filter string such as `"debug"`; directive lists fall back to info.
pub fn level_from_filter(filter: &str) -> LevelFilter {
    filter.trim().parse().unwrap_or(LevelFilter::Info)
}
