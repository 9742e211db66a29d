//! Typewriter cycler
//!
//! Types and deletes a rotation of phrases one character per tick,
//! pausing at each end.
//!
//! # Architecture
//!
//! - [`PhraseSequence`]: immutable, non-empty, cyclically indexed phrases
//! - [`TypingState`]: the four-phase state machine (pure)
//! - [`Typewriter`]: owns state and sink, schedules ticks in page time
//! - [`TextSink`]: host element receiving full-replacement text

pub mod cycler;
pub mod phrases;
pub mod sink;
pub mod state;

pub use cycler::Typewriter;
pub use phrases::PhraseSequence;
pub use sink::{RecordingSink, TextSink};
pub use state::{TypingPhase, TypingSpeeds, TypingState};
