use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans each message out to every sink, in the order they were added.
#[derive(Default)]
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn with_sink(mut self, sink: DynLogger) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn each(&self, write: impl Fn(&dyn DomainLogger)) {
        for sink in &self.sinks {
            write(sink.as_ref());
        }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.each(|sink| sink.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.each(|sink| sink.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.each(|sink| sink.error(msg));
    }
}

/// File plus console logging when `path` is set and can be opened, console alone otherwise.
pub fn init_session_logger(path: Option<&str>, filter: &str, session_id: &str) -> DynLogger {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match super::init_file_logger(path, filter, session_id) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![file_logger, console])) as DynLogger,
        Err(e) => {
            console.warn(&format!("{}; logging to console only", e));
            console
        }
    }
}
