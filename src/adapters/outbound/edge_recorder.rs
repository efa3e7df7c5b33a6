use crate::domains::path_planning::{Point, TreeObserver};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeChange {
    Added { from: Point, to: Point },
    Removed { from: Point, to: Point },
}

/// TreeObserver that keeps every edge change in order, for plotting or inspection.
#[derive(Debug, Default)]
pub struct EdgeRecorder {
    changes: Mutex<Vec<EdgeChange>>,
}

impl EdgeRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EdgeChange>> {
        self.changes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn changes(&self) -> Vec<EdgeChange> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Edges still present after replaying every addition and removal.
    pub fn live_edges(&self) -> Vec<(Point, Point)> {
        let mut edges: Vec<(Point, Point)> = Vec::new();
        for change in self.lock().iter() {
            match *change {
                EdgeChange::Added { from, to } => edges.push((from, to)),
                EdgeChange::Removed { from, to } => {
                    if let Some(i) = edges.iter().position(|e| *e == (from, to)) {
                        edges.remove(i);
                    }
                }
            }
        }
        edges
    }
}

impl TreeObserver for EdgeRecorder {
    fn on_edge_added(&self, from: &Point, to: &Point) {
        self.lock().push(EdgeChange::Added { from: *from, to: *to });
    }

    fn on_edge_removed(&self, from: &Point, to: &Point) {
        self.lock().push(EdgeChange::Removed { from: *from, to: *to });
    }
}
