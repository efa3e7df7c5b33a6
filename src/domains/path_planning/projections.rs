// Path planning projections
use super::events::PathPlanningEvent;
use serde::{Deserialize, Serialize};

/// Running totals over a session's episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanStatistics {
    pub episodes: u64,
    pub solved: u64,
    pub timed_out: u64,
    pub aborted: u64,
    pub obstacles: usize,
    pub total_cost: f64,
    pub total_iterations: u64,
}

impl PlanStatistics {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a PathPlanningEvent>,
    {
        let mut stats = Self::default();
        for event in events {
            stats.handle(event);
        }
        stats
    }

    pub fn handle(&mut self, event: &PathPlanningEvent) {
        match event {
            PathPlanningEvent::SessionCreated { .. } => {}
            PathPlanningEvent::EpisodeStarted { .. } => self.episodes += 1,
            PathPlanningEvent::EpisodeSolved { cost, iterations, .. } => {
                self.solved += 1;
                self.total_cost += cost;
                self.total_iterations += iterations;
            }
            PathPlanningEvent::EpisodeTimedOut { iterations, .. } => {
                self.timed_out += 1;
                self.total_iterations += iterations;
            }
            PathPlanningEvent::EpisodeAborted { .. } => self.aborted += 1,
            PathPlanningEvent::ObstacleAdded { .. } => self.obstacles += 1,
        }
    }

    pub fn mean_cost(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.total_cost / self.solved as f64)
    }
}
