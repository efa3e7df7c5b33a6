// Path Planning Service - drives sequential episodes over one planning session
use crate::adapters::outbound::write_episode_geojson;
use crate::common::{AggregateRoot, ApplicationError, ApplicationResult, EventEnvelope, EventMetadata};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::{
    DynObserver, EpisodeOutcome, EpisodeReport, OutputFrame, PathPlanningEvent, PlanStatistics, PlannedPath,
    PlanningSession, RrtStarPlanner,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const AGGREGATE_TYPE: &str = "PlanningSession";

pub struct PathPlanningService {
    session: PlanningSession,
    planner: RrtStarPlanner,
    frame: OutputFrame,
    logger: DynLogger,
    export_dir: Option<PathBuf>,
    history: Vec<PathPlanningEvent>,
}

impl PathPlanningService {
    pub fn new(config: &Config, logger: DynLogger) -> ApplicationResult<Self> {
        config.validate()?;
        let planner = RrtStarPlanner::new(config.planner.clone(), config.workspace.bounds()?)?;
        let session = PlanningSession::new(
            config.session.id.clone(),
            config.planner.start,
            config.workspace.obstacle_radius,
            config.workspace.safety_margin,
        );
        logger.info(&format!(
            "Session {} ready: start ({}, {}), epsilon {}",
            session.id, config.planner.start.x, config.planner.start.y, config.planner.epsilon
        ));
        Ok(Self {
            session,
            planner,
            frame: OutputFrame::from(&config.output),
            logger,
            export_dir: config.session.export_dir.clone(),
            history: Vec::new(),
        })
    }

    pub fn with_observer(mut self, observer: DynObserver) -> Self {
        self.planner = self.planner.with_observer(observer);
        self
    }

    /// Share a flag that aborts the running episode with `DomainError::Cancelled` once set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.planner = self.planner.with_cancellation(flag);
        self
    }

    pub fn session(&self) -> &PlanningSession {
        &self.session
    }

    /// Run one episode and return its full report. Timeouts are reported, not raised.
    pub fn run_episode(&mut self, selector: i64) -> ApplicationResult<EpisodeReport> {
        let report = match self.session.run_episode(&mut self.planner, selector, &self.frame) {
            Ok(report) => report,
            Err(e) => {
                self.logger.error(&format!("Episode for selector {} failed: {}", selector, e));
                return Err(e.into());
            }
        };

        match &report.outcome {
            EpisodeOutcome::Solved { path, solution } => self.logger.info(&format!(
                "Episode {} reached {:?}: {} waypoints, cost {:.2}, {} iterations, {} nodes",
                report.episode,
                report.selector,
                path.waypoints.len(),
                path.cost,
                solution.iterations,
                solution.tree.len()
            )),
            EpisodeOutcome::TimedOut { iterations, .. } => self.logger.warn(&format!(
                "Episode {} toward {:?} gave up after {} iterations",
                report.episode, report.selector, iterations
            )),
        }

        if let Some(dir) = &self.export_dir {
            match write_episode_geojson(dir, &report) {
                Ok(path) => self.logger.info(&format!("Exported episode to {}", path.display())),
                Err(e) => self.logger.warn(&format!("Episode export failed: {}", e)),
            }
        }
        Ok(report)
    }

    /// Plan toward `selector` and return the waypoint list; a timeout becomes an error.
    pub fn plan_for_selector(&mut self, selector: i64) -> ApplicationResult<PlannedPath> {
        let report = self.run_episode(selector)?;
        match report.outcome {
            EpisodeOutcome::Solved { path, .. } => Ok(path),
            EpisodeOutcome::TimedOut { iterations, elapsed, .. } => Err(ApplicationError::PlanningTimedOut {
                iterations,
                elapsed_ms: elapsed.as_millis(),
            }),
        }
    }

    /// Commit pending session events and return them wrapped for export.
    pub fn drain_events(&mut self) -> ApplicationResult<Vec<EventEnvelope>> {
        let pending = self.session.uncommitted_events().to_vec();
        let envelopes = pending
            .iter()
            .map(|event| EventEnvelope::new(event, AGGREGATE_TYPE, EventMetadata::from_source("rrt-star-app")))
            .collect::<Result<Vec<_>, _>>()
            .map_err(crate::common::DomainError::from)?;
        self.session.mark_events_as_committed();
        self.history.extend(pending);
        Ok(envelopes)
    }

    pub fn statistics(&self) -> PlanStatistics {
        PlanStatistics::from_events(self.history.iter().chain(self.session.uncommitted_events()))
    }
}
