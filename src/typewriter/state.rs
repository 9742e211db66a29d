//! Typing state machine
//!
//! Pure state transitions: no sink, no clock. Each call to
//! [`TypingState::step`] is one tick and reports what became visible and
//! how long to wait before the next tick.

use std::time::Duration;

use serde::Serialize;

use super::phrases::{PhraseSequence, char_len};

/// Delays between typewriter ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingSpeeds {
    /// Delay after typing one character.
    pub type_speed: Duration,
    /// Delay after deleting one character.
    pub delete_speed: Duration,
    /// Pause once a phrase is fully typed.
    pub end_pause: Duration,
    /// Pause once a phrase is fully deleted.
    pub next_pause: Duration,
}

impl Default for TypingSpeeds {
    fn default() -> Self {
        Self {
            type_speed: Duration::from_millis(100),
            delete_speed: Duration::from_millis(50),
            end_pause: Duration::from_millis(2000),
            next_pause: Duration::from_millis(500),
        }
    }
}

/// Phase of the typing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingPhase {
    /// Appending one character per tick.
    Typing,
    /// Full phrase shown; waiting `end_pause`.
    PausingAtEnd,
    /// Removing one character per tick.
    Deleting,
    /// Nothing shown; waiting `next_pause` before the next phrase.
    PausingBeforeNext,
}

/// A phrase boundary crossed during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The phrase at this index is now fully typed.
    Typed(usize),
    /// The phrase at this index is now fully deleted.
    Deleted(usize),
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Phrase whose prefix is visible after the step.
    pub phrase_index: usize,
    /// Number of characters of that phrase now visible.
    pub visible_chars: usize,
    /// Delay until the next tick.
    pub delay: Duration,
    /// Boundary crossed by this step, if any.
    pub boundary: Option<Boundary>,
}

/// Mutable typing state, owned by one cycler.
///
/// `phrase_index` stays within the sequence and `char_index` within the
/// current phrase's character count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    phrase_index: usize,
    char_index: usize,
    phase: TypingPhase,
    speed: Duration,
}

impl Default for TypingState {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingState {
    /// Initial state: typing the first phrase from its first character.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phrase_index: 0,
            char_index: 0,
            phase: TypingPhase::Typing,
            speed: Duration::ZERO,
        }
    }

    /// Index of the current phrase.
    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Number of visible characters of the current phrase.
    #[must_use]
    pub const fn char_index(&self) -> usize {
        self.char_index
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// Whether the machine is on the deleting half of the cycle.
    #[must_use]
    pub const fn is_deleting(&self) -> bool {
        matches!(self.phase, TypingPhase::PausingAtEnd | TypingPhase::Deleting)
    }

    /// Delay chosen by the last step.
    #[must_use]
    pub const fn speed(&self) -> Duration {
        self.speed
    }

    /// Advances the machine by one tick.
    ///
    /// Leaving a pause performs the first step of the following phase on
    /// the same tick: the pause is the delay itself.
    pub fn step(&mut self, phrases: &PhraseSequence, speeds: &TypingSpeeds) -> Step {
        let len = char_len(phrases.get(self.phrase_index));
        let visible_from = self.phrase_index;

        let boundary = match self.phase {
            TypingPhase::Typing => self.type_char(len, speeds),
            TypingPhase::PausingBeforeNext => {
                self.phase = TypingPhase::Typing;
                self.type_char(len, speeds)
            }
            TypingPhase::Deleting => self.delete_char(phrases, speeds),
            TypingPhase::PausingAtEnd => {
                self.phase = TypingPhase::Deleting;
                self.delete_char(phrases, speeds)
            }
        };

        let visible_chars = if matches!(boundary, Some(Boundary::Deleted(_))) {
            0
        } else {
            self.char_index
        };

        Step {
            phrase_index: visible_from,
            visible_chars,
            delay: self.speed,
            boundary,
        }
    }

    fn type_char(&mut self, len: usize, speeds: &TypingSpeeds) -> Option<Boundary> {
        if self.char_index < len {
            self.char_index += 1;
        }
        if self.char_index >= len {
            self.char_index = len;
            self.phase = TypingPhase::PausingAtEnd;
            self.speed = speeds.end_pause;
            Some(Boundary::Typed(self.phrase_index))
        } else {
            self.speed = speeds.type_speed;
            None
        }
    }

    fn delete_char(&mut self, phrases: &PhraseSequence, speeds: &TypingSpeeds) -> Option<Boundary> {
        self.char_index = self.char_index.saturating_sub(1);
        if self.char_index == 0 {
            let finished = self.phrase_index;
            self.phrase_index = phrases.next_index(self.phrase_index);
            self.phase = TypingPhase::PausingBeforeNext;
            self.speed = speeds.next_pause;
            Some(Boundary::Deleted(finished))
        } else {
            self.speed = speeds.delete_speed;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut TypingState, phrases: &PhraseSequence, ticks: usize) -> Vec<Step> {
        let speeds = TypingSpeeds::default();
        (0..ticks).map(|_| state.step(phrases, &speeds)).collect()
    }

    #[test]
    fn test_types_one_char_per_tick() {
        let phrases = PhraseSequence::new(["Hi"]);
        let mut state = TypingState::new();
        let steps = run(&mut state, &phrases, 2);

        assert_eq!(steps[0].visible_chars, 1);
        assert_eq!(steps[0].delay, Duration::from_millis(100));
        assert_eq!(steps[0].boundary, None);

        assert_eq!(steps[1].visible_chars, 2);
        assert_eq!(steps[1].delay, Duration::from_millis(2000));
        assert_eq!(steps[1].boundary, Some(Boundary::Typed(0)));
        assert_eq!(state.phase(), TypingPhase::PausingAtEnd);
        assert!(state.is_deleting());
    }

    #[test]
    fn test_deletes_after_end_pause() {
        let phrases = PhraseSequence::new(["Hi", "Yo"]);
        let mut state = TypingState::new();
        let steps = run(&mut state, &phrases, 4);

        assert_eq!(steps[2].visible_chars, 1);
        assert_eq!(steps[2].delay, Duration::from_millis(50));
        assert_eq!(steps[3].visible_chars, 0);
        assert_eq!(steps[3].phrase_index, 0);
        assert_eq!(steps[3].boundary, Some(Boundary::Deleted(0)));
        assert_eq!(steps[3].delay, Duration::from_millis(500));
        assert_eq!(state.phase(), TypingPhase::PausingBeforeNext);
        assert_eq!(state.phrase_index(), 1);
    }

    #[test]
    fn test_next_phrase_typed_after_pause() {
        let phrases = PhraseSequence::new(["Hi", "Yo"]);
        let mut state = TypingState::new();
        let steps = run(&mut state, &phrases, 5);

        assert_eq!(steps[4].phrase_index, 1);
        assert_eq!(steps[4].visible_chars, 1);
        assert_eq!(state.phase(), TypingPhase::Typing);
        assert!(!state.is_deleting());
    }

    #[test]
    fn test_empty_phrase_completes_immediately() {
        let phrases = PhraseSequence::new(["", "A"]);
        let mut state = TypingState::new();
        let steps = run(&mut state, &phrases, 2);

        assert_eq!(steps[0].visible_chars, 0);
        assert_eq!(steps[0].boundary, Some(Boundary::Typed(0)));
        assert_eq!(steps[1].boundary, Some(Boundary::Deleted(0)));
        assert_eq!(state.phrase_index(), 1);
    }

    #[test]
    fn test_single_phrase_wraps_to_itself() {
        let phrases = PhraseSequence::new(["A"]);
        let mut state = TypingState::new();
        run(&mut state, &phrases, 2);
        assert_eq!(state.phrase_index(), 0);
        assert_eq!(state.phase(), TypingPhase::PausingBeforeNext);
    }
}
