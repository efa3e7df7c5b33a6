use super::types::Point;
use std::sync::Arc;

/// Port for anything that wants to watch the tree grow (plotters, recorders).
/// Calls are fire-and-forget; the planner never depends on what an observer does.
pub trait TreeObserver: Send + Sync {
    fn on_edge_added(&self, from: &Point, to: &Point);
    fn on_edge_removed(&self, from: &Point, to: &Point);
}

pub type DynObserver = Arc<dyn TreeObserver>;

pub struct NoopObserver;

impl TreeObserver for NoopObserver {
    fn on_edge_added(&self, _from: &Point, _to: &Point) {}
    fn on_edge_removed(&self, _from: &Point, _to: &Point) {}
}

pub fn noop_observer() -> DynObserver {
    Arc::new(NoopObserver)
}
