pub mod path_planning_service;

pub use path_planning_service::*;
