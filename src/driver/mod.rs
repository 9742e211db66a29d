//! Drivers advancing the animation machines
//!
//! Machines expose a single scheduler tick function through [`Timed`].
//! Two hosts drive them:
//!
//! - [`simulation`]: deterministic virtual time with a scripted input
//!   timeline.
//! - [`runtime`]: tokio tasks on real (or paused) tokio time, stopped by a
//!   `CancellationToken`.

pub mod runtime;
pub mod simulation;

use std::time::Duration;

pub use runtime::{CursorInput, spawn_cursor, spawn_typewriter};
pub use simulation::{Frame, InputAction, ScriptedInput, Simulation, SimulationReport};

/// A machine whose state changes only at scheduled deadlines or on input.
pub trait Timed {
    /// Page time of the next scheduled change, or `None` when idle.
    fn next_deadline(&self) -> Option<Duration>;

    /// Processes every change scheduled at or before `now`.
    fn advance(&mut self, now: Duration);
}
