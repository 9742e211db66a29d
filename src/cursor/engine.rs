//! Cursor interaction engine
//!
//! Drives the glow and grid overlays from pointer movement and spawns
//! self-expiring waves and particles on click.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::clock::as_millis;
use crate::driver::Timed;
use crate::error::AttachError;
use crate::observability::events::{Event, EventEmitter};

use super::effects::{Color, EffectKind, EffectSet, TransientEffect, Vector};
use super::pointer::{Edge, PointerState};
use super::surface::{EffectSurface, ElementHandle, NodeSpec, Point, SurfaceMutation};

/// Largest particle spread, in pixels, the engine accepts.
pub const MAX_PARTICLE_SPREAD: f64 = 1.0e6;

/// Host inputs the engine subscribes to once attached.
pub const SUBSCRIBED_INPUTS: [&str; 4] = ["pointermove", "click", "mouseenter", "mouseleave"];

/// Tunables for the cursor engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSettings {
    /// Quiet period after which the pointer counts as idle.
    pub idle_timeout: Duration,
    /// Particles spawned per click.
    pub particle_count: usize,
    /// Colors drawn uniformly for particles.
    pub palette: Vec<Color>,
    /// Half-width of the square a particle's displacement is drawn from.
    pub particle_spread: f64,
    /// Lifetime of a click wave.
    pub wave_ttl: Duration,
    /// Lifetime of a floating particle.
    pub particle_ttl: Duration,
    /// Viewports at or below this width get no cursor effects.
    pub mobile_width_threshold: u32,
    /// Optional ceiling on simultaneously live effects.
    pub max_live_effects: Option<usize>,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(2000),
            particle_count: 6,
            palette: Color::default_palette(),
            particle_spread: 100.0,
            wave_ttl: Duration::from_millis(1000),
            particle_ttl: Duration::from_millis(3000),
            mobile_width_threshold: 768,
            max_live_effects: None,
        }
    }
}

/// Host elements the engine drives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorElements {
    /// Container receiving transient nodes.
    pub background: Option<ElementHandle>,
    /// Glow following the pointer.
    pub glow: Option<ElementHandle>,
    /// Grid overlay lit while the pointer moves.
    pub grid: Option<ElementHandle>,
}

impl CursorElements {
    /// The element ids used by the portfolio page.
    #[must_use]
    pub fn page_defaults() -> Self {
        Self {
            background: Some(ElementHandle::new("interactive-bg")),
            glow: Some(ElementHandle::new("cursor-glow")),
            grid: Some(ElementHandle::new("grid-overlay")),
        }
    }

    /// Role of the first absent element, if any.
    #[must_use]
    pub const fn first_missing(&self) -> Option<&'static str> {
        if self.background.is_none() {
            Some("background")
        } else if self.glow.is_none() {
            Some("glow")
        } else if self.grid.is_none() {
            Some("grid")
        } else {
            None
        }
    }
}

/// Element under the pointer for hover emphasis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HoverTarget {
    /// Lowercase or uppercase tag name.
    pub tag: String,
    /// Style classes on the element.
    #[serde(default)]
    pub classes: Vec<String>,
}

impl HoverTarget {
    /// Creates a target with no classes.
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
        }
    }

    /// Links, buttons, and anything styled as a button.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.tag.eq_ignore_ascii_case("a")
            || self.tag.eq_ignore_ascii_case("button")
            || self.classes.iter().any(|c| c == "btn")
    }
}

/// Why the engine did not attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The viewport is at or below the mobile threshold.
    NarrowViewport {
        /// Viewport width at attach time.
        width: u32,
        /// Configured threshold.
        threshold: u32,
    },
    /// Elements or settings are unusable.
    Unavailable(AttachError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NarrowViewport { width, threshold } => {
                write!(f, "viewport width {width} is at or below {threshold}")
            }
            Self::Unavailable(err) => write!(f, "{err}"),
        }
    }
}

/// Outcome of [`CursorEngine::attach`].
#[derive(Debug)]
pub enum Attachment<S: EffectSurface, R: Rng = StdRng> {
    /// The engine is listening.
    Attached(Box<CursorEngine<S, R>>),
    /// Nothing is listening; the surface is handed back untouched except
    /// for hiding the background on narrow viewports.
    Skipped {
        /// The host surface.
        surface: S,
        /// Why attaching was declined.
        reason: SkipReason,
    },
}

impl<S: EffectSurface, R: Rng> Attachment<S, R> {
    /// Number of host inputs subscribed to.
    #[must_use]
    pub const fn listener_count(&self) -> usize {
        match self {
            Self::Attached(_) => SUBSCRIBED_INPUTS.len(),
            Self::Skipped { .. } => 0,
        }
    }

    /// Whether the engine attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }

    /// Attaches an event emitter to the engine, if there is one.
    #[must_use]
    pub fn with_events(self, events: Arc<EventEmitter>) -> Self {
        match self {
            Self::Attached(engine) => Self::Attached(Box::new(engine.with_events(events))),
            skipped @ Self::Skipped { .. } => skipped,
        }
    }

    /// Why attaching was declined, if it was.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Attached(_) => None,
            Self::Skipped { reason, .. } => Some(reason),
        }
    }

    /// The engine, if attached.
    #[must_use]
    pub fn into_engine(self) -> Option<CursorEngine<S, R>> {
        match self {
            Self::Attached(engine) => Some(*engine),
            Self::Skipped { .. } => None,
        }
    }
}

/// Pointer-driven glow, grid, and click-effect engine.
pub struct CursorEngine<S: EffectSurface, R: Rng = StdRng> {
    surface: S,
    glow: ElementHandle,
    grid: ElementHandle,
    settings: CursorSettings,
    pointer: PointerState,
    effects: EffectSet,
    rng: R,
    emphasized: bool,
    events: Option<Arc<EventEmitter>>,
}

impl<S: EffectSurface, R: Rng> CursorEngine<S, R> {
    /// Attaches to the host, or declines without side effects.
    ///
    /// Missing elements or an empty palette abort silently. A viewport at
    /// or below the mobile threshold hides the background and attaches
    /// nothing.
    pub fn attach(
        mut surface: S,
        elements: CursorElements,
        viewport_width: u32,
        settings: CursorSettings,
        rng: R,
    ) -> Attachment<S, R> {
        let missing = elements.first_missing();
        let (Some(background), Some(glow), Some(grid)) =
            (elements.background, elements.glow, elements.grid)
        else {
            let missing = missing.unwrap_or("unknown");
            debug!(element = missing, "cursor engine not attached: element missing");
            return Attachment::Skipped {
                surface,
                reason: SkipReason::Unavailable(AttachError::MissingElement {
                    element: missing.to_string(),
                }),
            };
        };

        if viewport_width <= settings.mobile_width_threshold {
            if surface.is_live() {
                surface.apply(&background, SurfaceMutation::Hide);
            }
            debug!(
                viewport_width,
                threshold = settings.mobile_width_threshold,
                "cursor engine disabled on narrow viewport"
            );
            return Attachment::Skipped {
                surface,
                reason: SkipReason::NarrowViewport {
                    width: viewport_width,
                    threshold: settings.mobile_width_threshold,
                },
            };
        }

        if !(0.0..=MAX_PARTICLE_SPREAD).contains(&settings.particle_spread) {
            return Attachment::Skipped {
                surface,
                reason: SkipReason::Unavailable(AttachError::InvalidConfiguration {
                    field: "cursor.particle_spread".to_string(),
                    reason: format!(
                        "{} is outside 0..={MAX_PARTICLE_SPREAD}",
                        settings.particle_spread
                    ),
                }),
            };
        }

        if settings.particle_count > 0 && settings.palette.is_empty() {
            return Attachment::Skipped {
                surface,
                reason: SkipReason::Unavailable(AttachError::InvalidConfiguration {
                    field: "cursor.particle_colors".to_string(),
                    reason: "palette is empty".to_string(),
                }),
            };
        }

        info!(viewport_width, "cursor engine attached");
        Attachment::Attached(Box::new(Self {
            surface,
            glow,
            grid,
            settings,
            pointer: PointerState::new(),
            effects: EffectSet::new(),
            rng,
            emphasized: false,
            events: None,
        }))
    }

    /// Attaches an event emitter for activity and effect lifecycle.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Handles a pointer move at `now`.
    pub fn on_pointer_move(&mut self, position: Point, now: Duration) {
        self.advance(now);

        self.apply_to_glow(SurfaceMutation::MoveTo { position });

        if let Some(Edge::Rising) = self
            .pointer
            .on_move(position, now, self.settings.idle_timeout)
        {
            self.set_overlays_active(true, now);
        }
    }

    /// Handles a click at `now`: one wave, then the particles.
    ///
    /// A click is all or nothing: if the whole burst does not fit under
    /// `max_live_effects`, nothing is spawned.
    pub fn on_click(&mut self, position: Point, now: Duration) {
        self.advance(now);

        if !self.has_room_for_click() {
            debug!(live = self.effects.len(), "effect cap reached; click ignored");
            return;
        }
        self.spawn(EffectKind::Wave, position, now, None, None);

        let spread = self.settings.particle_spread;
        for _ in 0..self.settings.particle_count {
            let displacement = Vector {
                dx: self.rng.random_range(-spread..=spread),
                dy: self.rng.random_range(-spread..=spread),
            };
            let color = self.settings.palette
                [self.rng.random_range(0..self.settings.palette.len())]
            .clone();
            self.spawn(
                EffectKind::Particle,
                position,
                now,
                Some(displacement),
                Some(color),
            );
        }
    }

    /// Mirrors hover enter/leave on interactive elements into glow emphasis.
    pub fn on_hover(&mut self, target: &HoverTarget, entering: bool, now: Duration) {
        self.advance(now);
        if !target.is_interactive() || self.emphasized == entering {
            return;
        }
        self.emphasized = entering;
        self.apply_to_glow(SurfaceMutation::SetEmphasis {
            emphasized: entering,
        });
    }

    /// Whether the pointer moved within the idle timeout.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.pointer.is_active()
    }

    /// Pointer bookkeeping.
    #[must_use]
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Whether the glow is emphasized by a hovered link or button.
    #[must_use]
    pub const fn is_emphasized(&self) -> bool {
        self.emphasized
    }

    /// Live transient effects.
    #[must_use]
    pub const fn effects(&self) -> &EffectSet {
        &self.effects
    }

    /// The host surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &CursorSettings {
        &self.settings
    }

    fn has_room_for_click(&self) -> bool {
        let burst = self.settings.particle_count.saturating_add(1);
        self.settings
            .max_live_effects
            .is_none_or(|cap| self.effects.len().saturating_add(burst) <= cap)
    }

    fn spawn(
        &mut self,
        kind: EffectKind,
        position: Point,
        now: Duration,
        displacement: Option<Vector>,
        color: Option<Color>,
    ) {
        let ttl = match kind {
            EffectKind::Wave => self.settings.wave_ttl,
            EffectKind::Particle => self.settings.particle_ttl,
        };
        // Effects are still tracked on a dead host so their TTLs run out.
        let node = if self.surface.is_live() {
            self.surface.create_node(&NodeSpec {
                kind,
                position,
                class: kind.class(),
                displacement,
                color: color.clone(),
            })
        } else {
            None
        };
        let id = self.effects.allocate_id();
        trace!(effect_id = id.0, ?kind, x = position.x, y = position.y, "effect spawned");

        if let Some(events) = &self.events {
            events.emit(Event::EffectSpawned {
                timestamp: Utc::now(),
                page_ms: as_millis(now),
                effect_id: id.0,
                kind,
                x: position.x,
                y: position.y,
                ttl_ms: as_millis(ttl),
            });
        }

        self.effects.insert(TransientEffect {
            id,
            kind,
            position,
            created_at: now,
            ttl,
            displacement,
            color,
            node,
        });
    }

    fn apply_to_glow(&mut self, mutation: SurfaceMutation) {
        if self.surface.is_live() {
            self.surface.apply(&self.glow, mutation);
        }
    }

    fn set_overlays_active(&mut self, active: bool, at: Duration) {
        if self.surface.is_live() {
            self.surface
                .apply(&self.glow, SurfaceMutation::SetActive { active });
            self.surface
                .apply(&self.grid, SurfaceMutation::SetActive { active });
        }
        debug!(active, "pointer activity changed");
        if let Some(events) = &self.events {
            events.emit(Event::PointerActivity {
                timestamp: Utc::now(),
                page_ms: as_millis(at),
                active,
            });
        }
    }

    fn expire(&mut self, effect: &TransientEffect, at: Duration) {
        if let Some(node) = effect.node.filter(|_| self.surface.is_live()) {
            if !self.surface.remove_node(node) {
                trace!(effect_id = effect.id.0, "effect node already gone");
            }
        }
        if let Some(events) = &self.events {
            events.emit(Event::EffectExpired {
                timestamp: Utc::now(),
                page_ms: as_millis(at),
                effect_id: effect.id.0,
                kind: effect.kind,
            });
        }
    }
}

impl<S: EffectSurface, R: Rng> Timed for CursorEngine<S, R> {
    fn next_deadline(&self) -> Option<Duration> {
        match (self.pointer.idle_deadline(), self.effects.next_expiry()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn advance(&mut self, now: Duration) {
        // Deadlines are processed in time order so events read chronologically.
        while let Some(at) = self.next_deadline().filter(|at| *at <= now) {
            if self.pointer.idle_deadline() == Some(at) {
                if let Some(Edge::Falling) = self.pointer.check_idle(at) {
                    self.set_overlays_active(false, at);
                }
            }
            for effect in self.effects.expire_due(at) {
                self.expire(&effect, at);
            }
        }
    }
}

impl<S: EffectSurface, R: Rng> std::fmt::Debug for CursorEngine<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorEngine")
            .field("glow", &self.glow)
            .field("grid", &self.grid)
            .field("is_active", &self.pointer.is_active())
            .field("live_effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}

/// Builds a seeded or entropy-backed RNG for particle placement.
#[must_use]
pub fn particle_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::surface::{NodeHandle, RecordingSurface};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn attach_wide(surface: RecordingSurface) -> CursorEngine<RecordingSurface> {
        CursorEngine::attach(
            surface,
            CursorElements::page_defaults(),
            1280,
            CursorSettings::default(),
            StdRng::seed_from_u64(7),
        )
        .into_engine()
        .expect("wide viewport should attach")
    }

    #[test]
    fn test_click_spawns_wave_then_particles() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_click(Point::new(100.0, 100.0), ms(0));

        let effects: Vec<&TransientEffect> = engine.effects().iter().collect();
        assert_eq!(effects.len(), 7);
        assert_eq!(effects[0].kind, EffectKind::Wave);
        assert!(effects[1..].iter().all(|e| e.kind == EffectKind::Particle));
        assert!(
            effects
                .iter()
                .all(|e| e.position == Point::new(100.0, 100.0))
        );

        let palette = Color::default_palette();
        for particle in &effects[1..] {
            let d = particle.displacement.unwrap();
            assert!((-100.0..=100.0).contains(&d.dx));
            assert!((-100.0..=100.0).contains(&d.dy));
            assert!(palette.contains(particle.color.as_ref().unwrap()));
            assert_eq!(particle.ttl, ms(3000));
        }
        assert_eq!(effects[0].ttl, ms(1000));
        assert_eq!(surface.live_count(), 7);
    }

    #[test]
    fn test_wave_lives_until_ttl() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_click(Point::new(10.0, 10.0), ms(0));

        engine.advance(ms(999));
        assert_eq!(engine.effects().len(), 7);
        engine.advance(ms(1001));
        assert_eq!(engine.effects().len(), 6);
        assert_eq!(surface.live_count(), 6);

        engine.advance(ms(2999));
        assert_eq!(engine.effects().len(), 6);
        engine.advance(ms(3001));
        assert!(engine.effects().is_empty());
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_expiry_after_teardown_is_safe() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_click(Point::new(0.0, 0.0), ms(0));
        surface.tear_down();
        engine.advance(ms(5000));
        assert!(engine.effects().is_empty());
        assert_eq!(surface.removed_count(), 0);
    }

    /// Host that counts any call made after it went away.
    #[derive(Clone, Default)]
    struct GatedSurface {
        dead: std::rc::Rc<std::cell::Cell<bool>>,
        calls_after_death: std::rc::Rc<std::cell::Cell<usize>>,
        next: u64,
    }

    impl GatedSurface {
        fn touch(&self) {
            if self.dead.get() {
                self.calls_after_death.set(self.calls_after_death.get() + 1);
            }
        }
    }

    impl EffectSurface for GatedSurface {
        fn is_live(&self) -> bool {
            !self.dead.get()
        }

        fn create_node(&mut self, _spec: &NodeSpec) -> Option<NodeHandle> {
            self.touch();
            self.next += 1;
            Some(NodeHandle(self.next))
        }

        fn remove_node(&mut self, _handle: NodeHandle) -> bool {
            self.touch();
            true
        }

        fn apply(&mut self, _element: &ElementHandle, _mutation: SurfaceMutation) {
            self.touch();
        }
    }

    #[test]
    fn test_dead_host_receives_no_calls() {
        let surface = GatedSurface::default();
        let mut engine = CursorEngine::attach(
            surface.clone(),
            CursorElements::page_defaults(),
            1280,
            CursorSettings::default(),
            StdRng::seed_from_u64(5),
        )
        .into_engine()
        .unwrap();

        engine.on_pointer_move(Point::new(1.0, 1.0), ms(0));
        engine.on_click(Point::new(1.0, 1.0), ms(10));
        surface.dead.set(true);

        engine.on_pointer_move(Point::new(2.0, 2.0), ms(20));
        engine.on_hover(&HoverTarget::tag("button"), true, ms(30));
        engine.on_click(Point::new(2.0, 2.0), ms(40));
        engine.advance(ms(10_000));

        assert_eq!(surface.calls_after_death.get(), 0);
        assert!(engine.effects().is_empty());
        assert!(!engine.is_active());

        let dead = GatedSurface::default();
        dead.dead.set(true);
        let attachment = CursorEngine::attach(
            dead.clone(),
            CursorElements::page_defaults(),
            400,
            CursorSettings::default(),
            StdRng::seed_from_u64(5),
        );
        assert!(!attachment.is_attached());
        assert_eq!(dead.calls_after_death.get(), 0);
    }

    #[test]
    fn test_click_on_torn_down_surface_tracks_without_nodes() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        surface.tear_down();
        engine.on_click(Point::new(0.0, 0.0), ms(0));
        assert_eq!(engine.effects().len(), 7);
        assert!(engine.effects().iter().all(|e| e.node.is_none()));
        engine.advance(ms(3000));
        assert!(engine.effects().is_empty());
    }

    #[test]
    fn test_move_activates_overlays_once() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_pointer_move(Point::new(5.0, 5.0), ms(0));
        engine.on_pointer_move(Point::new(6.0, 6.0), ms(100));

        assert!(engine.is_active());
        let grid = surface.mutations_of("grid-overlay");
        assert_eq!(grid, vec![SurfaceMutation::SetActive { active: true }]);

        let glow = surface.mutations_of("cursor-glow");
        assert_eq!(
            glow,
            vec![
                SurfaceMutation::MoveTo {
                    position: Point::new(5.0, 5.0)
                },
                SurfaceMutation::SetActive { active: true },
                SurfaceMutation::MoveTo {
                    position: Point::new(6.0, 6.0)
                },
            ]
        );
    }

    #[test]
    fn test_idle_timeout_deactivates() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_pointer_move(Point::new(0.0, 0.0), ms(0));
        engine.on_pointer_move(Point::new(0.0, 0.0), ms(1999));
        engine.advance(ms(3998));
        assert!(engine.is_active());
        engine.advance(ms(3999));
        assert!(!engine.is_active());

        let grid = surface.mutations_of("grid-overlay");
        assert_eq!(
            grid,
            vec![
                SurfaceMutation::SetActive { active: true },
                SurfaceMutation::SetActive { active: false },
            ]
        );
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn test_move_after_exact_timeout_flips_twice() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_pointer_move(Point::new(0.0, 0.0), ms(0));
        engine.on_pointer_move(Point::new(0.0, 0.0), ms(2000));
        assert!(engine.is_active());
        assert_eq!(surface.mutations_of("grid-overlay").len(), 3);
    }

    #[test]
    fn test_hover_emphasis_only_for_interactive() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface.clone());
        engine.on_hover(&HoverTarget::tag("p"), true, ms(0));
        assert!(!engine.is_emphasized());

        engine.on_hover(&HoverTarget::tag("A"), true, ms(0));
        assert!(engine.is_emphasized());
        engine.on_hover(&HoverTarget::tag("a"), false, ms(10));
        assert!(!engine.is_emphasized());

        let styled = HoverTarget {
            tag: "span".to_string(),
            classes: vec!["btn".to_string()],
        };
        assert!(styled.is_interactive());

        assert_eq!(
            surface.mutations_of("cursor-glow"),
            vec![
                SurfaceMutation::SetEmphasis { emphasized: true },
                SurfaceMutation::SetEmphasis { emphasized: false },
            ]
        );
    }

    #[test]
    fn test_narrow_viewport_attaches_nothing() {
        let surface = RecordingSurface::new();
        let attachment: Attachment<RecordingSurface> = CursorEngine::attach(
            surface.clone(),
            CursorElements::page_defaults(),
            768,
            CursorSettings::default(),
            StdRng::seed_from_u64(1),
        );
        assert!(!attachment.is_attached());
        assert_eq!(attachment.listener_count(), 0);
        assert_eq!(surface.mutations_of("interactive-bg"), vec![SurfaceMutation::Hide]);
        assert_eq!(surface.created_count(), 0);
    }

    #[test]
    fn test_missing_element_aborts_silently() {
        let surface = RecordingSurface::new();
        let elements = CursorElements {
            glow: None,
            ..CursorElements::page_defaults()
        };
        let attachment: Attachment<RecordingSurface> = CursorEngine::attach(
            surface.clone(),
            elements,
            1920,
            CursorSettings::default(),
            StdRng::seed_from_u64(1),
        );
        match attachment {
            Attachment::Skipped { reason, .. } => assert_eq!(
                reason,
                SkipReason::Unavailable(AttachError::MissingElement {
                    element: "glow".to_string()
                })
            ),
            Attachment::Attached(_) => panic!("should not attach without a glow"),
        }
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn test_empty_palette_is_invalid() {
        let settings = CursorSettings {
            palette: Vec::new(),
            ..CursorSettings::default()
        };
        let attachment: Attachment<RecordingSurface> = CursorEngine::attach(
            RecordingSurface::new(),
            CursorElements::page_defaults(),
            1920,
            settings,
            StdRng::seed_from_u64(1),
        );
        assert!(!attachment.is_attached());
    }

    #[test]
    fn test_effect_cap_stops_spawning() {
        let settings = CursorSettings {
            max_live_effects: Some(10),
            ..CursorSettings::default()
        };
        let surface = RecordingSurface::new();
        let mut engine = CursorEngine::attach(
            surface.clone(),
            CursorElements::page_defaults(),
            1920,
            settings,
            StdRng::seed_from_u64(3),
        )
        .into_engine()
        .unwrap();

        engine.on_click(Point::new(0.0, 0.0), ms(0));
        assert_eq!(engine.effects().len(), 7);

        // A second burst would overshoot the cap, so none of it spawns.
        engine.on_click(Point::new(0.0, 0.0), ms(10));
        assert_eq!(engine.effects().len(), 7);
        assert_eq!(surface.created_count(), 7);

        // The wave expiring frees one slot, still short of a full burst.
        engine.on_click(Point::new(0.0, 0.0), ms(1010));
        assert_eq!(engine.effects().len(), 6);

        engine.on_click(Point::new(0.0, 0.0), ms(3000));
        let kinds: Vec<EffectKind> = engine.effects().iter().map(|e| e.kind).collect();
        assert_eq!(kinds.len(), 7);
        assert_eq!(kinds[0], EffectKind::Wave);
        assert_eq!(surface.created_count(), 14);
    }

    #[test]
    fn test_effect_cap_admits_exact_fit() {
        let settings = CursorSettings {
            max_live_effects: Some(14),
            ..CursorSettings::default()
        };
        let mut engine = CursorEngine::attach(
            RecordingSurface::new(),
            CursorElements::page_defaults(),
            1920,
            settings,
            StdRng::seed_from_u64(3),
        )
        .into_engine()
        .unwrap();

        engine.on_click(Point::new(0.0, 0.0), ms(0));
        engine.on_click(Point::new(0.0, 0.0), ms(10));
        assert_eq!(engine.effects().len(), 14);
        engine.on_click(Point::new(0.0, 0.0), ms(20));
        assert_eq!(engine.effects().len(), 14);
    }

    #[test]
    fn test_out_of_range_spread_is_invalid() {
        for spread in [1.0e308, -1.0, f64::NAN, f64::INFINITY] {
            let settings = CursorSettings {
                particle_spread: spread,
                ..CursorSettings::default()
            };
            let surface = RecordingSurface::new();
            let attachment: Attachment<RecordingSurface> = CursorEngine::attach(
                surface.clone(),
                CursorElements::page_defaults(),
                1920,
                settings,
                StdRng::seed_from_u64(1),
            );
            assert!(
                matches!(
                    attachment.skip_reason(),
                    Some(SkipReason::Unavailable(AttachError::InvalidConfiguration { field, .. }))
                        if field == "cursor.particle_spread"
                ),
                "spread {spread} should be rejected"
            );
            assert!(surface.mutations().is_empty());
        }
    }

    #[test]
    fn test_largest_spread_clicks_without_panicking() {
        let settings = CursorSettings {
            particle_spread: MAX_PARTICLE_SPREAD,
            ..CursorSettings::default()
        };
        let mut engine = CursorEngine::attach(
            RecordingSurface::new(),
            CursorElements::page_defaults(),
            1920,
            settings,
            StdRng::seed_from_u64(9),
        )
        .into_engine()
        .unwrap();
        engine.on_click(Point::new(0.0, 0.0), ms(0));
        assert_eq!(engine.effects().len(), 7);
    }

    #[test]
    fn test_next_deadline_is_earliest() {
        let surface = RecordingSurface::new();
        let mut engine = attach_wide(surface);
        assert_eq!(engine.next_deadline(), None);
        engine.on_click(Point::new(0.0, 0.0), ms(0));
        assert_eq!(engine.next_deadline(), Some(ms(1000)));
        engine.on_pointer_move(Point::new(0.0, 0.0), ms(100));
        assert_eq!(engine.next_deadline(), Some(ms(1000)));
        engine.advance(ms(1000));
        assert_eq!(engine.next_deadline(), Some(ms(2100)));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let spawn = || {
            let mut engine = CursorEngine::attach(
                RecordingSurface::new(),
                CursorElements::page_defaults(),
                1920,
                CursorSettings::default(),
                particle_rng(Some(42)),
            )
            .into_engine()
            .unwrap();
            engine.on_click(Point::new(0.0, 0.0), ms(0));
            engine
                .effects()
                .iter()
                .filter_map(|e| e.displacement)
                .collect::<Vec<_>>()
        };
        assert_eq!(spawn(), spawn());
    }
}
