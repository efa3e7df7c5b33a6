use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Degenerate range: source min {min} equals source max {max}")]
    DegenerateRange { min: f64, max: f64 },

    #[error("Invalid goal selector {selector}: expected a value in 1..=9")]
    InvalidGoalSelector { selector: i64 },

    #[error("No tree node lies within the neighborhood of the candidate")]
    EmptyNeighborhood,

    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Unknown tree node: {id}")]
    UnknownNode { id: usize },

    #[error("Rewiring node {node} under {parent} would create a cycle")]
    CycleRejected { node: usize, parent: usize },

    #[error("The root node cannot be given a parent")]
    RootRewire,

    #[error("Planning cancelled after {iterations} iterations")]
    Cancelled { iterations: u64 },

    #[error("Tree invariant violated: {0}")]
    TreeInvariant(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Planning timed out after {iterations} iterations ({elapsed_ms} ms)")]
    PlanningTimedOut { iterations: u64, elapsed_ms: u128 },

    #[error("Export error: {0}")]
    Export(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
