pub mod console_logger;
pub mod edge_recorder;
pub mod file_logger;
pub mod geojson_export;
pub mod multi_logger;
pub mod noop_logger;

pub use console_logger::*;
pub use edge_recorder::*;
pub use file_logger::*;
pub use geojson_export::*;
pub use multi_logger::*;
pub use noop_logger::*;
