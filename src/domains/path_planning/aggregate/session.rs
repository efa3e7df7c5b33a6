use crate::common::{AggregateRoot, DomainResult};
use crate::domains::path_planning::events::PathPlanningEvent;
use crate::domains::path_planning::goal::{Goal, GoalSelector};
use crate::domains::path_planning::path::{extract_path, OutputFrame, PlannedPath};
use crate::domains::path_planning::planner::{PlanOutcome, RrtStarPlanner, Solution};
use crate::domains::path_planning::types::Point;
use crate::domains::path_planning::workspace::ObstacleField;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// A run of sequential planning episodes sharing one obstacle field.
///
/// The field only grows by applying `ObstacleAdded`, which each solved episode records
/// for its goal so later episodes route around earlier targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningSession {
    pub id: String,
    pub start: Point,
    pub(super) obstacles: ObstacleField,
    pub episodes: u64,
    pub solved: u64,
    pub timed_out: u64,
    pub aborted: u64,
    pub version: u64,
    #[serde(skip)]
    pub(super) uncommitted_events: Vec<PathPlanningEvent>,
}

#[derive(Debug, Clone)]
pub enum EpisodeOutcome {
    Solved { path: PlannedPath, solution: Solution },
    TimedOut {
        iterations: u64,
        elapsed: Duration,
        tree_size: usize,
    },
}

#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub episode: u64,
    pub selector: GoalSelector,
    pub goal: Goal,
    /// Obstacles the episode had to avoid (the field before this episode's goal was added).
    pub obstacles: ObstacleField,
    pub outcome: EpisodeOutcome,
}

impl EpisodeReport {
    pub fn path(&self) -> Option<&PlannedPath> {
        match &self.outcome {
            EpisodeOutcome::Solved { path, .. } => Some(path),
            EpisodeOutcome::TimedOut { .. } => None,
        }
    }
}

impl PlanningSession {
    pub fn new(id: String, start: Point, obstacle_radius: f64, safety_margin: f64) -> Self {
        let mut session = Self::blank(id.clone(), start, obstacle_radius, safety_margin);
        session.add_event(PathPlanningEvent::SessionCreated {
            session_id: id,
            start,
            timestamp: Utc::now(),
        });
        session
    }

    /// Session state before any event; the starting point for replays.
    pub fn blank(id: String, start: Point, obstacle_radius: f64, safety_margin: f64) -> Self {
        Self {
            id,
            start,
            obstacles: ObstacleField::new(obstacle_radius, safety_margin),
            episodes: 0,
            solved: 0,
            timed_out: 0,
            aborted: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    /// Plan toward the goal cell `selector` (1..=9) and fold the outcome into the session.
    pub fn run_episode(
        &mut self,
        planner: &mut RrtStarPlanner,
        selector: i64,
        frame: &OutputFrame,
    ) -> DomainResult<EpisodeReport> {
        let selector = GoalSelector::from_index(selector)?;
        let goal = selector.goal(planner.config().goal_radius);
        let episode = self.episodes + 1;

        self.record(PathPlanningEvent::EpisodeStarted {
            session_id: self.id.clone(),
            episode,
            selector,
            goal: goal.center,
            obstacle_count: self.obstacles.len(),
            timestamp: Utc::now(),
        })?;

        let obstacles = self.obstacles.clone();
        let outcome = match plan_episode(planner, &goal, &obstacles, frame) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(session = %self.id, episode, error = %e, "episode aborted");
                self.record(PathPlanningEvent::EpisodeAborted {
                    session_id: self.id.clone(),
                    episode,
                    selector,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                })?;
                return Err(e);
            }
        };

        match &outcome {
            EpisodeOutcome::Solved { path, solution } => {
                info!(
                    session = %self.id,
                    episode,
                    waypoints = path.waypoints.len(),
                    cost = path.cost,
                    iterations = solution.iterations,
                    "episode solved"
                );
                self.record(PathPlanningEvent::EpisodeSolved {
                    session_id: self.id.clone(),
                    episode,
                    selector,
                    waypoints: path.waypoints.clone(),
                    cost: path.cost,
                    iterations: solution.iterations,
                    tree_size: solution.tree.len(),
                    timestamp: Utc::now(),
                })?;
                self.record(PathPlanningEvent::ObstacleAdded {
                    session_id: self.id.clone(),
                    center: goal.center,
                    timestamp: Utc::now(),
                })?;
            }
            EpisodeOutcome::TimedOut {
                iterations, tree_size, ..
            } => {
                info!(session = %self.id, episode, iterations, "episode timed out");
                self.record(PathPlanningEvent::EpisodeTimedOut {
                    session_id: self.id.clone(),
                    episode,
                    selector,
                    iterations: *iterations,
                    tree_size: *tree_size,
                    timestamp: Utc::now(),
                })?;
            }
        }

        Ok(EpisodeReport {
            episode,
            selector,
            goal,
            obstacles,
            outcome,
        })
    }
}

fn plan_episode(
    planner: &mut RrtStarPlanner,
    goal: &Goal,
    obstacles: &ObstacleField,
    frame: &OutputFrame,
) -> DomainResult<EpisodeOutcome> {
    Ok(match planner.plan(goal, obstacles)? {
        PlanOutcome::Solved(solution) => {
            let path = extract_path(&solution.tree, solution.terminal, frame)?;
            EpisodeOutcome::Solved { path, solution }
        }
        PlanOutcome::TimedOut {
            iterations,
            elapsed,
            tree_size,
        } => EpisodeOutcome::TimedOut {
            iterations,
            elapsed,
            tree_size,
        },
    })
}
