use super::session::PlanningSession;
use crate::common::{load_from_history, AggregateRoot, DomainResult};
use crate::domains::path_planning::events::PathPlanningEvent;
use crate::domains::path_planning::types::Point;

impl AggregateRoot for PlanningSession {
    type Event = PathPlanningEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            PathPlanningEvent::SessionCreated { .. } => {}
            PathPlanningEvent::EpisodeStarted { episode, .. } => {
                self.episodes = *episode;
            }
            PathPlanningEvent::EpisodeSolved { .. } => {
                self.solved += 1;
            }
            PathPlanningEvent::EpisodeTimedOut { .. } => {
                self.timed_out += 1;
            }
            PathPlanningEvent::EpisodeAborted { .. } => {
                self.aborted += 1;
            }
            PathPlanningEvent::ObstacleAdded { center, .. } => {
                self.obstacles.add(*center);
            }
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}

impl PlanningSession {
    /// Rebuild a session, including its obstacle field, from recorded events.
    pub fn replay(
        id: String,
        start: Point,
        obstacle_radius: f64,
        safety_margin: f64,
        events: &[PathPlanningEvent],
    ) -> DomainResult<Self> {
        load_from_history(Self::blank(id, start, obstacle_radius, safety_margin), events)
    }
}
