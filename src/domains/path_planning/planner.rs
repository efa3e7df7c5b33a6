use super::goal::Goal;
use super::ports::{noop_observer, DynObserver};
use super::sampler::{steer, Sampler};
use super::tree::{NodeId, Rewire, Tree};
use super::types::{distance, midpoint, Point};
use super::workspace::{ObstacleField, WorkspaceBounds};
use crate::common::{DomainError, DomainResult};
use crate::config::PlannerConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// What a single planner iteration did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The candidate (or every edge to it) was blocked; nothing changed.
    Collision,
    Extended { node: NodeId, rewired: usize },
    GoalReached { terminal: NodeId },
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub tree: Tree,
    pub terminal: NodeId,
    /// Path length from the start to the terminal node.
    pub cost: f64,
    pub iterations: u64,
    pub elapsed: Duration,
}

impl Solution {
    fn new(tree: Tree, terminal: NodeId, iterations: u64, elapsed: Duration) -> DomainResult<Self> {
        let cost = tree.cost(terminal)?;
        Ok(Self {
            tree,
            terminal,
            cost,
            iterations,
            elapsed,
        })
    }
}

#[derive(Debug, Clone)]
pub enum PlanOutcome {
    Solved(Solution),
    TimedOut {
        iterations: u64,
        elapsed: Duration,
        tree_size: usize,
    },
}

/// RRT* tree grower for one start position over a fixed workspace.
pub struct RrtStarPlanner {
    config: PlannerConfig,
    bounds: WorkspaceBounds,
    sampler: Sampler,
    observer: DynObserver,
    cancel: Option<Arc<AtomicBool>>,
}

impl RrtStarPlanner {
    pub fn new(config: PlannerConfig, bounds: WorkspaceBounds) -> DomainResult<Self> {
        config.validate()?;
        if !bounds.contains(&config.start) {
            return Err(DomainError::InvalidConfiguration {
                reason: format!(
                    "start ({}, {}) lies outside the workspace",
                    config.start.x, config.start.y
                ),
            });
        }
        let sampler = Sampler::new(config.seed);
        Ok(Self {
            config,
            bounds,
            sampler,
            observer: noop_observer(),
            cancel: None,
        })
    }

    pub fn with_observer(mut self, observer: DynObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Abort `plan` with `DomainError::Cancelled` once `flag` is set, from any thread.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn bounds(&self) -> &WorkspaceBounds {
        &self.bounds
    }

    /// Grow a fresh tree from the start until an edge midpoint lands in the goal
    /// or the configured budget runs out.
    pub fn plan(&mut self, goal: &Goal, obstacles: &ObstacleField) -> DomainResult<PlanOutcome> {
        let mut tree = Tree::new(self.config.start);
        let started = Instant::now();
        let max_duration = self.config.max_duration_ms.map(Duration::from_millis);
        let mut iterations = 0u64;

        if goal.accepts(&self.config.start) {
            let root = tree.root();
            return Ok(PlanOutcome::Solved(Solution::new(tree, root, iterations, started.elapsed())?));
        }

        loop {
            if self.cancelled() {
                debug!(iterations, tree_size = tree.len(), "planning cancelled");
                return Err(DomainError::Cancelled { iterations });
            }
            let over_iterations = self.config.max_iterations.is_some_and(|max| iterations >= max);
            let over_time = max_duration.is_some_and(|max| started.elapsed() >= max);
            if over_iterations || over_time {
                debug!(iterations, tree_size = tree.len(), "planning budget exhausted");
                return Ok(PlanOutcome::TimedOut {
                    iterations,
                    elapsed: started.elapsed(),
                    tree_size: tree.len(),
                });
            }

            iterations += 1;
            if let StepOutcome::GoalReached { terminal } = self.step(&mut tree, goal, obstacles)? {
                debug!(iterations, tree_size = tree.len(), "goal region reached");
                return Ok(PlanOutcome::Solved(Solution::new(tree, terminal, iterations, started.elapsed())?));
            }
        }
    }

    /// One sample-steer-insert-rewire iteration.
    ///
    /// Neighbors are gathered around the steered sample, before it is pulled back toward its
    /// parent, and that same set is rewired to the inserted node. Inserted edges are at most
    /// `epsilon` long; rewired edges stay below `2 * neighborhood - epsilon`.
    pub fn step(&mut self, tree: &mut Tree, goal: &Goal, obstacles: &ObstacleField) -> DomainResult<StepOutcome> {
        let epsilon = self.config.epsilon;
        let sample = self.sampler.sample(&self.bounds);
        let nearest = tree.nearest(&sample);
        let mut candidate = steer(&tree.point(nearest)?, &sample, epsilon);
        if obstacles.is_blocked(&candidate) {
            trace!(x = candidate.x, y = candidate.y, "candidate blocked");
            return Ok(StepOutcome::Collision);
        }

        let neighbors = tree.within(&candidate, self.config.neighborhood());
        if neighbors.is_empty() {
            return Err(DomainError::EmptyNeighborhood);
        }
        let reachable: Vec<NodeId> = if self.config.check_edges {
            let mut reachable = Vec::with_capacity(neighbors.len());
            for &id in &neighbors {
                if !obstacles.segment_blocked(&tree.point(id)?, &candidate) {
                    reachable.push(id);
                }
            }
            reachable
        } else {
            neighbors.clone()
        };
        if reachable.is_empty() {
            trace!(x = candidate.x, y = candidate.y, "no collision-free edge to candidate");
            return Ok(StepOutcome::Collision);
        }

        let parent = tree.best_parent(&candidate, &reachable)?;
        let parent_point = tree.point(parent)?;
        if distance(&parent_point, &candidate) > epsilon {
            candidate = steer(&parent_point, &candidate, epsilon);
            if obstacles.is_blocked(&candidate) {
                return Ok(StepOutcome::Collision);
            }
        }

        let node = tree.insert(candidate, parent)?;
        self.observer.on_edge_added(&parent_point, &candidate);

        let check_edges = self.config.check_edges;
        let rewired = tree.rewire_through(node, &neighbors, |a, b| {
            !check_edges || !obstacles.segment_blocked(a, b)
        })?;
        for r in &rewired {
            let moved = tree.point(r.node)?;
            self.observer.on_edge_removed(&tree.point(r.old_parent)?, &moved);
            self.observer.on_edge_added(&candidate, &moved);
        }
        trace!(node = node.index(), rewired = rewired.len(), "tree extended");

        if let Some(terminal) = self.goal_terminal(tree, goal, node, parent_point, &rewired)? {
            return Ok(StepOutcome::GoalReached { terminal });
        }
        Ok(StepOutcome::Extended {
            node,
            rewired: rewired.len(),
        })
    }

    /// Goal test on the midpoints of the edges added this iteration: the new node's
    /// parent edge first, then each rewired edge. Returns the child end of the hit edge.
    fn goal_terminal(
        &self,
        tree: &Tree,
        goal: &Goal,
        node: NodeId,
        parent_point: Point,
        rewired: &[Rewire],
    ) -> DomainResult<Option<NodeId>> {
        let node_point = tree.point(node)?;
        if goal.accepts(&midpoint(&node_point, &parent_point)) {
            return Ok(Some(node));
        }
        for r in rewired {
            if goal.accepts(&midpoint(&node_point, &tree.point(r.node)?)) {
                return Ok(Some(r.node));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::path_planning::goal::GoalSelector;

    fn planner(seed: u64) -> RrtStarPlanner {
        let config = PlannerConfig {
            seed: Some(seed),
            max_iterations: Some(50_000),
            ..PlannerConfig::default()
        };
        let bounds = WorkspaceBounds::new(0.0, 150.0, 0.0, 150.0).unwrap();
        RrtStarPlanner::new(config, bounds).unwrap()
    }

    #[test]
    fn every_step_preserves_tree_invariants() {
        let mut planner = planner(11);
        let goal = GoalSelector::BottomLeft.goal(6.0);
        let mut obstacles = ObstacleField::new(18.0, 1.0);
        obstacles.add(GoalSelector::Center.center());
        let mut tree = Tree::new(planner.config().start);
        for _ in 0..400 {
            let outcome = planner.step(&mut tree, &goal, &obstacles).unwrap();
            tree.verify().unwrap();
            if let StepOutcome::GoalReached { .. } = outcome {
                break;
            }
        }
        for node in tree.nodes() {
            assert!(!obstacles.is_blocked(&node.point));
            if let Some(parent) = node.parent {
                let p = tree.point(parent).unwrap();
                assert!(!obstacles.segment_blocked(&p, &node.point));
            }
        }
    }

    #[test]
    fn inserted_edges_respect_step_length() {
        let mut planner = planner(5);
        let goal = GoalSelector::TopLeft.goal(6.0);
        let obstacles = ObstacleField::new(18.0, 1.0);
        let mut tree = Tree::new(planner.config().start);
        for _ in 0..200 {
            if let StepOutcome::Extended { node, .. } = planner.step(&mut tree, &goal, &obstacles).unwrap() {
                let n = tree.get(node).unwrap();
                let parent = tree.point(n.parent.unwrap()).unwrap();
                assert!(distance(&parent, &n.point) <= 10.0 + 1e-9);
            }
        }
    }

    #[test]
    fn rewired_edges_stay_below_widened_bound() {
        let mut planner = planner(3);
        let goal = Goal::new(Point::new(-100.0, -100.0), 1.0);
        let mut obstacles = ObstacleField::new(18.0, 1.0);
        obstacles.add(GoalSelector::Center.center());
        let mut tree = Tree::new(planner.config().start);
        let epsilon = planner.config().epsilon;
        let bound = 2.0 * planner.config().neighborhood() - epsilon;
        let mut longest: f64 = 0.0;
        for _ in 0..3_000 {
            planner.step(&mut tree, &goal, &obstacles).unwrap();
        }
        for node in tree.nodes() {
            if let Some(parent) = node.parent {
                let len = distance(&tree.point(parent).unwrap(), &node.point);
                assert!(len < bound, "edge of length {} exceeds {}", len, bound);
                longest = longest.max(len);
            }
        }
        // rewiring does produce edges longer than one steering step
        assert!(longest > epsilon);
    }

    #[test]
    fn preset_cancellation_stops_before_first_iteration() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut planner = planner(1).with_cancellation(flag);
        let goal = GoalSelector::Center.goal(6.0);
        match planner.plan(&goal, &ObstacleField::new(18.0, 1.0)) {
            Err(DomainError::Cancelled { iterations }) => assert_eq!(iterations, 0),
            other => panic!("Expected cancellation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn cancellation_interrupts_unbounded_search() {
        let config = PlannerConfig {
            seed: Some(2),
            ..PlannerConfig::default()
        };
        let bounds = WorkspaceBounds::new(0.0, 150.0, 0.0, 150.0).unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let mut planner = RrtStarPlanner::new(config, bounds).unwrap().with_cancellation(flag.clone());
        // unreachable goal and no budget: only the flag can end the search
        let goal = Goal::new(Point::new(-100.0, -100.0), 1.0);

        let handle = std::thread::spawn(move || planner.plan(&goal, &ObstacleField::new(18.0, 1.0)));
        std::thread::sleep(Duration::from_millis(50));
        flag.store(true, Ordering::Relaxed);
        match handle.join().unwrap() {
            Err(DomainError::Cancelled { iterations }) => assert!(iterations > 0),
            other => panic!("Expected cancellation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn solves_open_workspace() {
        let mut planner = planner(1);
        let goal = GoalSelector::BottomLeft.goal(6.0);
        let obstacles = ObstacleField::new(18.0, 1.0);
        match planner.plan(&goal, &obstacles).unwrap() {
            PlanOutcome::Solved(solution) => {
                solution.tree.verify().unwrap();
                // the terminal sits at most half an edge beyond an accepted midpoint
                let floor = distance(&Point::new(150.0, 150.0), &goal.center) - 6.0 - 5.0;
                assert!(solution.cost >= floor);
                assert_eq!(solution.cost, solution.tree.cost(solution.terminal).unwrap());
                assert!(solution.iterations > 0);
            }
            PlanOutcome::TimedOut { .. } => panic!("open workspace should be solvable"),
        }
    }

    #[test]
    fn start_inside_goal_is_trivially_solved() {
        let mut planner = planner(1);
        let goal = Goal::new(Point::new(148.0, 148.0), 6.0);
        match planner.plan(&goal, &ObstacleField::new(18.0, 1.0)).unwrap() {
            PlanOutcome::Solved(solution) => {
                assert_eq!(solution.terminal, solution.tree.root());
                assert_eq!(solution.iterations, 0);
            }
            other => panic!("Expected trivial solution, got {:?}", other),
        }
    }

    #[test]
    fn zero_budget_times_out_immediately() {
        let config = PlannerConfig {
            max_iterations: Some(0),
            ..PlannerConfig::default()
        };
        let bounds = WorkspaceBounds::new(0.0, 150.0, 0.0, 150.0).unwrap();
        let mut planner = RrtStarPlanner::new(config, bounds).unwrap();
        let goal = GoalSelector::Center.goal(6.0);
        match planner.plan(&goal, &ObstacleField::new(18.0, 1.0)).unwrap() {
            PlanOutcome::TimedOut { iterations, tree_size, .. } => {
                assert_eq!(iterations, 0);
                assert_eq!(tree_size, 1);
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn start_outside_bounds_is_rejected() {
        let config = PlannerConfig {
            start: Point::new(200.0, 10.0),
            ..PlannerConfig::default()
        };
        let bounds = WorkspaceBounds::new(0.0, 150.0, 0.0, 150.0).unwrap();
        assert!(matches!(
            RrtStarPlanner::new(config, bounds),
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }
}
