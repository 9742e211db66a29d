//! Transient click effects and their expiry bookkeeping.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::surface::{NodeHandle, Point};

/// Palette used for floating particles when none is configured.
pub const DEFAULT_PALETTE: [&str; 4] = ["#00e5ff", "#9b5cff", "#ff3db1", "#2fffdc"];

/// Kind of transient effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Expanding ring at the click point.
    Wave,
    /// Small dot drifting away from the click point.
    Particle,
}

impl EffectKind {
    /// Style class the host animates for this kind.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Wave => "click-wave",
            Self::Particle => "floating-particle",
        }
    }
}

/// A displacement in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

/// A CSS hex color (`#rgb` or `#rrggbb`), stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Parses a hex color, returning `None` for anything else.
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        let valid_len = digits.len() == 3 || digits.len() == 6;
        if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The color as written to the host style.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The built-in four-color palette.
    #[must_use]
    pub fn default_palette() -> Vec<Self> {
        DEFAULT_PALETTE
            .iter()
            .map(|c| Self((*c).to_string()))
            .collect()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-engine effect identifier. Allocation order is spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EffectId(pub u64);

/// A short-lived visual object.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientEffect {
    /// Identifier, unique within the engine.
    pub id: EffectId,
    /// Wave or particle.
    pub kind: EffectKind,
    /// Spawn position.
    pub position: Point,
    /// Page time of spawn.
    pub created_at: Duration,
    /// Lifetime.
    pub ttl: Duration,
    /// Particle drift target relative to `position`.
    pub displacement: Option<Vector>,
    /// Particle color.
    pub color: Option<Color>,
    /// Host node, absent when the surface was already torn down.
    pub node: Option<NodeHandle>,
}

impl TransientEffect {
    /// Page time at which the effect must be gone.
    #[must_use]
    pub fn expires_at(&self) -> Duration {
        self.created_at + self.ttl
    }

    /// Whether the effect is still within its lifetime at `now`.
    #[must_use]
    pub fn is_live_at(&self, now: Duration) -> bool {
        now < self.expires_at()
    }
}

/// Live effects with a deadline queue.
///
/// Grows only through [`EffectSet::insert`] and shrinks only through
/// [`EffectSet::expire_due`]. Equal deadlines expire in spawn order.
#[derive(Debug, Default)]
pub struct EffectSet {
    live: BTreeMap<EffectId, TransientEffect>,
    deadlines: BinaryHeap<Reverse<(Duration, EffectId)>>,
    next_id: u64,
}

impl EffectSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next effect identifier.
    pub fn allocate_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Tracks a freshly spawned effect.
    pub fn insert(&mut self, effect: TransientEffect) {
        self.deadlines
            .push(Reverse((effect.expires_at(), effect.id)));
        self.live.insert(effect.id, effect);
    }

    /// Earliest pending expiry.
    #[must_use]
    pub fn next_expiry(&self) -> Option<Duration> {
        self.deadlines.peek().map(|Reverse((at, _))| *at)
    }

    /// Removes and returns every effect whose TTL has elapsed at `now`,
    /// earliest first.
    pub fn expire_due(&mut self, now: Duration) -> Vec<TransientEffect> {
        let mut expired = Vec::new();
        while let Some(Reverse((at, id))) = self.deadlines.peek().copied() {
            if at > now {
                break;
            }
            self.deadlines.pop();
            if let Some(effect) = self.live.remove(&id) {
                expired.push(effect);
            }
        }
        expired
    }

    /// Number of live effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no effect is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Looks up a live effect.
    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&TransientEffect> {
        self.live.get(&id)
    }

    /// Live effects in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &TransientEffect> {
        self.live.values()
    }
}
