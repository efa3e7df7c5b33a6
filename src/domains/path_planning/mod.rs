pub mod aggregate;
pub mod events;
pub mod goal;
pub mod path;
pub mod planner;
pub mod ports;
pub mod projections;
pub mod sampler;
pub mod tree;
pub mod types;
pub mod workspace;

pub use aggregate::*;
pub use events::*;
pub use goal::*;
pub use path::*;
pub use planner::*;
pub use ports::*;
pub use projections::*;
pub use sampler::*;
pub use tree::*;
pub use types::*;
pub use workspace::*;
