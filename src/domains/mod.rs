pub mod logger;
pub mod path_planning;

pub use logger::*;
pub use path_planning::*;
