use super::goal::GoalSelector;
use super::types::{Point, Waypoint};
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PathPlanningEvent {
    SessionCreated {
        session_id: String,
        start: Point,
        timestamp: DateTime<Utc>,
    },
    EpisodeStarted {
        session_id: String,
        episode: u64,
        selector: GoalSelector,
        goal: Point,
        obstacle_count: usize,
        timestamp: DateTime<Utc>,
    },
    EpisodeSolved {
        session_id: String,
        episode: u64,
        selector: GoalSelector,
        waypoints: Vec<Waypoint>,
        cost: f64,
        iterations: u64,
        tree_size: usize,
        timestamp: DateTime<Utc>,
    },
    EpisodeTimedOut {
        session_id: String,
        episode: u64,
        selector: GoalSelector,
        iterations: u64,
        tree_size: usize,
        timestamp: DateTime<Utc>,
    },
    /// Planning stopped with an error (for example on cancellation); the field is unchanged.
    EpisodeAborted {
        session_id: String,
        episode: u64,
        selector: GoalSelector,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    ObstacleAdded {
        session_id: String,
        center: Point,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for PathPlanningEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PathPlanningEvent::SessionCreated { .. } => "SessionCreated",
            PathPlanningEvent::EpisodeStarted { .. } => "EpisodeStarted",
            PathPlanningEvent::EpisodeSolved { .. } => "EpisodeSolved",
            PathPlanningEvent::EpisodeTimedOut { .. } => "EpisodeTimedOut",
            PathPlanningEvent::EpisodeAborted { .. } => "EpisodeAborted",
            PathPlanningEvent::ObstacleAdded { .. } => "ObstacleAdded",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            PathPlanningEvent::SessionCreated { session_id, .. } => session_id,
            PathPlanningEvent::EpisodeStarted { session_id, .. } => session_id,
            PathPlanningEvent::EpisodeSolved { session_id, .. } => session_id,
            PathPlanningEvent::EpisodeTimedOut { session_id, .. } => session_id,
            PathPlanningEvent::EpisodeAborted { session_id, .. } => session_id,
            PathPlanningEvent::ObstacleAdded { session_id, .. } => session_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PathPlanningEvent::SessionCreated { timestamp, .. } => *timestamp,
            PathPlanningEvent::EpisodeStarted { timestamp, .. } => *timestamp,
            PathPlanningEvent::EpisodeSolved { timestamp, .. } => *timestamp,
            PathPlanningEvent::EpisodeTimedOut { timestamp, .. } => *timestamp,
            PathPlanningEvent::EpisodeAborted { timestamp, .. } => *timestamp,
            PathPlanningEvent::ObstacleAdded { timestamp, .. } => *timestamp,
        }
    }
}
