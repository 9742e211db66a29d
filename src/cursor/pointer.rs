//! Pointer activity with debounce-to-idle.

use std::time::Duration;

use super::surface::Point;

/// A flip of a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// false → true
    Rising,
    /// true → false
    Falling,
}

/// Last pointer position and whether it moved recently.
///
/// `is_active` turns true on the first move after idling and false
/// exactly `idle_timeout` after the last move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    position: Option<Point>,
    is_active: bool,
    idle_deadline: Option<Duration>,
}

impl PointerState {
    /// Creates an idle pointer with no known position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move and re-arms the idle deadline.
    ///
    /// Returns `Some(Edge::Rising)` only when the pointer was idle.
    pub fn on_move(&mut self, position: Point, now: Duration, idle_timeout: Duration) -> Option<Edge> {
        self.position = Some(position);
        self.idle_deadline = Some(now + idle_timeout);
        if self.is_active {
            None
        } else {
            self.is_active = true;
            Some(Edge::Rising)
        }
    }

    /// Fires the falling edge once the idle deadline has passed.
    pub fn check_idle(&mut self, now: Duration) -> Option<Edge> {
        match self.idle_deadline {
            Some(deadline) if deadline <= now => {
                self.idle_deadline = None;
                self.is_active = false;
                Some(Edge::Falling)
            }
            _ => None,
        }
    }

    /// Last known pointer position.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        self.position
    }

    /// Whether the pointer moved within the idle timeout.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Pending idle deadline, if the pointer is active.
    #[must_use]
    pub const fn idle_deadline(&self) -> Option<Duration> {
        self.idle_deadline
    }
}
