pub mod event_apply;
pub mod session;

pub use session::*;
