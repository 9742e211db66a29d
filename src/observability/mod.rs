//! Observability module
//!
//! Logging and structured event infrastructure for watching the animation
//! machines run.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, LogSettings, init_logging};
