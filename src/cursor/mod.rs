//! Cursor interaction engine
//!
//! Pointer-following glow with debounce-to-idle activity, hover emphasis
//! over links and buttons, and self-expiring click effects.
//!
//! # Architecture
//!
//! - [`PointerState`]: edge-triggered activity flag with idle deadline
//! - [`EffectSet`]: live effects plus a deadline queue
//! - [`CursorEngine`]: attach policy, input handlers, expiry
//! - [`EffectSurface`]: host element creation, removal, and mutation

pub mod effects;
pub mod engine;
pub mod pointer;
pub mod surface;

pub use effects::{Color, EffectId, EffectKind, EffectSet, TransientEffect, Vector};
pub use engine::{
    Attachment, CursorElements, CursorEngine, CursorSettings, HoverTarget, MAX_PARTICLE_SPREAD,
    SkipReason, particle_rng,
};
pub use pointer::{Edge, PointerState};
pub use surface::{
    EffectSurface, ElementHandle, NodeHandle, NodeSpec, Point, RecordingSurface, SurfaceMutation,
};
