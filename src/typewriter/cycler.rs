//! Typewriter cycler
//!
//! Owns a [`TypingState`] and a [`TextSink`], and turns state steps into
//! sink writes at scheduled page times.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, trace};

use crate::clock::as_millis;
use crate::driver::Timed;
use crate::observability::events::{Event, EventEmitter};

use super::phrases::{PhraseSequence, prefix};
use super::sink::TextSink;
use super::state::{Boundary, TypingPhase, TypingSpeeds, TypingState};

/// Shortest gap between two ticks.
///
/// Keeps `advance` finite when every configured delay is zero.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Cycles through a phrase sequence forever, typing and deleting one
/// character per tick.
pub struct Typewriter<S: TextSink> {
    phrases: PhraseSequence,
    sink: S,
    speeds: TypingSpeeds,
    state: TypingState,
    next_tick: Duration,
    events: Option<Arc<EventEmitter>>,
    detached_logged: bool,
}

impl<S: TextSink> Typewriter<S> {
    /// Starts a cycler whose first tick happens `initial_delay` after `now`.
    pub fn start(
        phrases: PhraseSequence,
        sink: S,
        initial_delay: Duration,
        speeds: TypingSpeeds,
        now: Duration,
    ) -> Self {
        debug!(
            phrases = phrases.len(),
            initial_delay_ms = as_millis(initial_delay),
            "typewriter started"
        );
        Self {
            phrases,
            sink,
            speeds,
            state: TypingState::new(),
            next_tick: now + initial_delay,
            events: None,
            detached_logged: false,
        }
    }

    /// Attaches an event emitter for rendered text and completed phrases.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs one tick at its scheduled time and schedules the next.
    ///
    /// Returns the delay until the following tick.
    pub fn tick(&mut self) -> Duration {
        let at = self.next_tick;
        let step = self.state.step(&self.phrases, &self.speeds);
        let text = prefix(self.phrases.get(step.phrase_index), step.visible_chars);

        if self.sink.is_attached() {
            self.sink.replace_text(text);
            trace!(text, "typewriter rendered");
            self.emit_rendered(at, text);
        } else if !self.detached_logged {
            debug!("typewriter sink detached; skipping renders");
            self.detached_logged = true;
        }

        if let Some(Boundary::Typed(index)) = step.boundary {
            debug!(phrase_index = index, "phrase typed");
            self.emit_completed(at, index);
        }

        let delay = step.delay.max(MIN_TICK);
        self.next_tick = at + delay;
        delay
    }

    /// Current phase of the cycle.
    #[must_use]
    pub const fn phase(&self) -> TypingPhase {
        self.state.phase()
    }

    /// Index of the phrase being typed or deleted.
    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.state.phrase_index()
    }

    /// The phrase rotation.
    #[must_use]
    pub const fn phrases(&self) -> &PhraseSequence {
        &self.phrases
    }

    /// The sink receiving rendered text.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    fn emit_rendered(&self, at: Duration, text: &str) {
        if let Some(events) = &self.events {
            events.emit(Event::TextRendered {
                timestamp: Utc::now(),
                page_ms: as_millis(at),
                text: text.to_string(),
            });
        }
    }

    fn emit_completed(&self, at: Duration, phrase_index: usize) {
        if let Some(events) = &self.events {
            events.emit(Event::PhraseCompleted {
                timestamp: Utc::now(),
                page_ms: as_millis(at),
                phrase_index,
                phrase: self.phrases.get(phrase_index).to_string(),
            });
        }
    }
}

impl<S: TextSink> Timed for Typewriter<S> {
    fn next_deadline(&self) -> Option<Duration> {
        Some(self.next_tick)
    }

    fn advance(&mut self, now: Duration) {
        while self.next_tick <= now {
            self.tick();
        }
    }
}

impl<S: TextSink> std::fmt::Debug for Typewriter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter")
            .field("phrases", &self.phrases.len())
            .field("phase", &self.state.phase())
            .field("next_tick", &self.next_tick)
            .finish_non_exhaustive()
    }
}
