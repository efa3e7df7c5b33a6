use crate::common::{DomainError, DomainResult};
use crate::domains::path_planning::{Point, WorkspaceBounds, GOAL_RADIUS};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables prefixed with `RRT_` override file values,
/// e.g. `RRT_PLANNER__EPSILON=5`.
pub const ENV_PREFIX: &str = "RRT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub planner: PlannerConfig,
    pub workspace: WorkspaceConfig,
    pub output: OutputConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum edge length produced by steering.
    pub epsilon: f64,
    /// Neighborhood radius as a multiple of `epsilon`.
    pub neighborhood_factor: f64,
    pub start: Point,
    pub goal_radius: f64,
    /// Iteration budget per episode; `None` keeps sampling until the goal is reached.
    pub max_iterations: Option<u64>,
    /// Wall-clock budget per episode in milliseconds.
    pub max_duration_ms: Option<u64>,
    pub seed: Option<u64>,
    /// Reject edges that cut through an obstacle, not only blocked endpoints.
    pub check_edges: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            epsilon: 10.0,
            neighborhood_factor: 1.75,
            start: Point::new(150.0, 150.0),
            goal_radius: GOAL_RADIUS,
            max_iterations: None,
            max_duration_ms: None,
            seed: None,
            check_edges: true,
        }
    }
}

impl PlannerConfig {
    pub fn neighborhood(&self) -> f64 {
        self.epsilon * self.neighborhood_factor
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(DomainError::InvalidConfiguration {
                reason: format!("epsilon must be positive, got {}", self.epsilon),
            });
        }
        // the steered candidate's nearest node must stay inside the neighborhood
        if !(self.neighborhood_factor > 1.0) {
            return Err(DomainError::InvalidConfiguration {
                reason: format!(
                    "neighborhood_factor must exceed 1.0, got {}",
                    self.neighborhood_factor
                ),
            });
        }
        if !(self.goal_radius > 0.0) {
            return Err(DomainError::InvalidConfiguration {
                reason: format!("goal_radius must be positive, got {}", self.goal_radius),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub obstacle_radius: f64,
    pub safety_margin: f64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 150.0,
            min_y: 0.0,
            max_y: 150.0,
            obstacle_radius: 18.0,
            safety_margin: 1.0,
        }
    }
}

impl WorkspaceConfig {
    pub fn bounds(&self) -> DomainResult<WorkspaceBounds> {
        WorkspaceBounds::new(self.min_x, self.max_x, self.min_y, self.max_y)
    }
}

/// Linear mapping from planner space onto the execution frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub source_x: [f64; 2],
    pub source_y: [f64; 2],
    pub target_x: [f64; 2],
    pub target_y: [f64; 2],
    /// Emit `(y, x)` pairs, as the arm controller expects.
    pub swap_axes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            source_x: [0.0, 150.0],
            source_y: [0.0, 150.0],
            target_x: [0.0, 0.5],
            target_y: [0.4, 0.8],
            swap_axes: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub id: String,
    /// Goal selectors (1..=9) planned in order when none are given on the command line.
    pub goal_sequence: Vec<i64>,
    /// Directory receiving one GeoJSON file per solved episode.
    pub export_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id: "session-1".to_string(),
            goal_sequence: Vec::new(),
            export_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub filter: String,
    /// Domain log file; console only when unset.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Layered load: compiled defaults, then the TOML file if present, then `RRT_*` variables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        let config = ::config::Config::builder()
            .add_source(::config::File::new(&path, ::config::FileFormat::Toml).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.planner.validate()?;
        let bounds = self.workspace.bounds()?;
        if !bounds.contains(&self.planner.start) {
            return Err(DomainError::InvalidConfiguration {
                reason: format!(
                    "start ({}, {}) lies outside the workspace",
                    self.planner.start.x, self.planner.start.y
                ),
            });
        }
        Ok(())
    }
}
