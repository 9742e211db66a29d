//! Structured event stream for `vitrine`.
//!
//! Discrete, typed events emitted by the animation machines. Events are
//! serialized as newline-delimited JSON (JSONL) and carry a monotonically
//! increasing sequence number plus the page time they happened at.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cursor::effects::EffectKind;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted by an animation machine.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The typewriter replaced its visible text.
    TextRendered {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Page time in milliseconds.
        page_ms: u64,
        /// Text now displayed.
        text: String,
    },

    /// The typewriter finished typing a whole phrase.
    PhraseCompleted {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Page time in milliseconds.
        page_ms: u64,
        /// Index of the phrase in the rotation.
        phrase_index: usize,
        /// The phrase itself.
        phrase: String,
    },

    /// The pointer's active flag flipped.
    PointerActivity {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Page time in milliseconds.
        page_ms: u64,
        /// New value of the flag.
        active: bool,
    },

    /// A transient effect was spawned.
    EffectSpawned {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Page time in milliseconds.
        page_ms: u64,
        /// Effect identifier, unique per engine.
        effect_id: u64,
        /// Wave or particle.
        kind: EffectKind,
        /// Spawn position.
        x: f64,
        /// Spawn position.
        y: f64,
        /// Time-to-live in milliseconds.
        ttl_ms: u64,
    },

    /// A transient effect reached its TTL and was removed.
    EffectExpired {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Page time in milliseconds.
        page_ms: u64,
        /// Effect identifier.
        effect_id: u64,
        /// Wave or particle.
        kind: EffectKind,
    },

    /// The highlighted navigation section changed.
    SectionChanged {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Page time in milliseconds.
        page_ms: u64,
        /// Id of the newly active section.
        section: String,
        /// Whether the header shows its compact look.
        header_scrolled: bool,
    },

    /// A component declined to attach.
    AttachSkipped {
        /// Wall-clock time of emission.
        timestamp: DateTime<Utc>,
        /// Component name.
        component: String,
        /// Human-readable reason.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are silently dropped: an observer must
/// never break the animation it observes.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
