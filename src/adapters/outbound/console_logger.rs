use crate::domains::logger::DomainLogger;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "planner", "{}", msg);
    }
    fn warn(&self, msg: &str) {
        tracing::warn!(target: "planner", "{}", msg);
    }
    fn error(&self, msg: &str) {
        tracing::error!(target: "planner", "{}", msg);
    }
}

/// Console-backed DomainLogger routed through the `tracing` subscriber
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge)
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `default_filter`.
///
/// The `log` facade is left unclaimed so `fast_log` can still be installed for the file logger.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
