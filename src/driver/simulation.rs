//! Deterministic virtual-time driver.
//!
//! Runs both animation machines against recording hosts on a
//! [`ManualClock`], replaying a scripted input timeline. No real timer is
//! ever armed, so a ten-second page session runs instantly and always
//! produces the same frames for the same seed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::{Clock, ManualClock, as_millis};
use crate::config::VitrineConfig;
use crate::cursor::{
    CursorElements, CursorEngine, HoverTarget, Point, RecordingSurface, particle_rng,
};
use crate::observability::events::{Event, EventEmitter};
use crate::scroll::ScrollTracker;
use crate::typewriter::{RecordingSink, Typewriter};

use super::Timed;

/// A single host input.
///
/// Deserializes from YAML as `move: { x, y }`, `click: { x, y }`,
/// `hover_enter: { tag, classes }`, `hover_leave: { tag, classes }` or
/// `scroll: { y, header_height }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    /// Pointer moved.
    Move {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
    },
    /// Primary button clicked.
    Click {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
    },
    /// Pointer entered an element.
    HoverEnter(HoverTarget),
    /// Pointer left an element.
    HoverLeave(HoverTarget),
    /// Document scrolled.
    Scroll {
        /// Vertical scroll offset.
        y: f64,
        /// Rendered header height.
        #[serde(default)]
        header_height: f64,
    },
}

/// An input scheduled at a page time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedInput {
    /// Page time in milliseconds.
    pub at_ms: u64,
    /// What happens.
    #[serde(flatten)]
    pub action: InputAction,
}

impl ScriptedInput {
    /// Page time of the input.
    #[must_use]
    pub const fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// One text write observed by the typewriter host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Page time in milliseconds.
    pub at_ms: u64,
    /// Full text after the write.
    pub text: String,
}

/// Summary of a simulated page session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Page time reached.
    pub duration_ms: u64,
    /// Every typewriter write, in order.
    pub frames: Vec<Frame>,
    /// Whether the cursor engine attached.
    pub cursor_attached: bool,
    /// Host inputs the cursor engine subscribed to.
    pub listener_count: usize,
    /// Why the cursor engine declined to attach.
    pub skip_reason: Option<String>,
    /// Scripted inputs delivered to the cursor engine.
    pub inputs_applied: usize,
    /// Transient effects created.
    pub effects_spawned: usize,
    /// Transient effects removed after their TTL.
    pub effects_expired: usize,
    /// Effects still live at the end.
    pub live_effects: usize,
    /// Pointer activity at the end.
    pub pointer_active: bool,
    /// Header look after the last scroll.
    pub header_scrolled: bool,
    /// Highlighted navigation section at the end.
    pub active_section: Option<String>,
    /// Times the highlighted section changed.
    pub section_changes: usize,
}

/// Both machines, their recording hosts, and a scripted input timeline.
#[derive(Debug)]
pub struct Simulation {
    clock: ManualClock,
    typewriter: Typewriter<RecordingSink>,
    sink: RecordingSink,
    frames: Vec<Frame>,
    cursor: Option<CursorEngine<RecordingSurface>>,
    surface: RecordingSurface,
    listener_count: usize,
    skip_reason: Option<String>,
    scroll: ScrollTracker,
    header_scrolled: bool,
    section_changes: usize,
    events: Option<Arc<EventEmitter>>,
    script: Vec<ScriptedInput>,
    next_input: usize,
    inputs_applied: usize,
}

impl Simulation {
    /// Builds the page at time zero.
    ///
    /// The script is ordered by `at_ms`; inputs sharing a time keep their
    /// written order.
    pub fn new(
        config: &VitrineConfig,
        viewport_width: u32,
        mut script: Vec<ScriptedInput>,
        events: Option<Arc<EventEmitter>>,
    ) -> Self {
        let clock = ManualClock::new();
        let sink = RecordingSink::new();
        let mut typewriter = Typewriter::start(
            config.typewriter.phrase_sequence(),
            sink.clone(),
            config.typewriter.initial_delay(),
            config.typewriter.speeds(),
            clock.now(),
        );

        let surface = RecordingSurface::new();
        let attachment = CursorEngine::attach(
            surface.clone(),
            CursorElements::page_defaults(),
            viewport_width,
            config.cursor.settings(),
            particle_rng(config.cursor.seed),
        );
        let listener_count = attachment.listener_count();
        let skip_reason = attachment.skip_reason().map(ToString::to_string);
        if let (Some(reason), Some(events)) = (&skip_reason, &events) {
            events.emit(Event::AttachSkipped {
                timestamp: Utc::now(),
                component: "cursor".to_string(),
                reason: reason.clone(),
            });
        }
        let attachment = match &events {
            Some(events) => attachment.with_events(Arc::clone(events)),
            None => attachment,
        };
        let cursor = attachment.into_engine();

        if let Some(events) = &events {
            typewriter = typewriter.with_events(Arc::clone(events));
        }

        script.sort_by_key(|input| input.at_ms);

        Self {
            clock,
            typewriter,
            sink,
            frames: Vec::new(),
            cursor,
            surface,
            listener_count,
            skip_reason,
            scroll: config.scroll.tracker(),
            header_scrolled: false,
            section_changes: 0,
            events,
            script,
            next_input: 0,
            inputs_applied: 0,
        }
    }

    /// Current page time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Runs every deadline and input up to and including `until`.
    ///
    /// Machine deadlines due at the same instant as an input fire first,
    /// matching a host that drains expired timers before dispatching
    /// queued events. Calling again with a later `until` resumes.
    pub fn run(&mut self, until: Duration) -> SimulationReport {
        loop {
            let machine = self.next_machine_deadline();
            let input = self.script.get(self.next_input).map(ScriptedInput::at);
            let at = match (machine, input) {
                (Some(m), Some(i)) => m.min(i),
                (m, i) => match m.or(i) {
                    Some(at) => at,
                    None => break,
                },
            };
            if at > until {
                break;
            }
            self.clock.set(at);

            if machine == Some(at) {
                self.fire_machines(at);
            } else {
                self.deliver_inputs(at);
            }
        }
        self.clock.set(until);
        self.report()
    }

    /// Snapshot of the session so far.
    #[must_use]
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            duration_ms: as_millis(self.clock.now()),
            frames: self.frames.clone(),
            cursor_attached: self.cursor.is_some(),
            listener_count: self.listener_count,
            skip_reason: self.skip_reason.clone(),
            inputs_applied: self.inputs_applied,
            effects_spawned: self.surface.created_count(),
            effects_expired: self.surface.removed_count(),
            live_effects: self.cursor.as_ref().map_or(0, |c| c.effects().len()),
            pointer_active: self.cursor.as_ref().is_some_and(CursorEngine::is_active),
            header_scrolled: self.header_scrolled,
            active_section: self.scroll.active().map(ToString::to_string),
            section_changes: self.section_changes,
        }
    }

    /// The typewriter host.
    #[must_use]
    pub const fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    /// The cursor host.
    #[must_use]
    pub const fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    /// The cursor engine, if it attached.
    #[must_use]
    pub const fn cursor(&self) -> Option<&CursorEngine<RecordingSurface>> {
        self.cursor.as_ref()
    }

    fn next_machine_deadline(&self) -> Option<Duration> {
        let typing = self.typewriter.next_deadline();
        let cursor = self.cursor.as_ref().and_then(Timed::next_deadline);
        match (typing, cursor) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn fire_machines(&mut self, at: Duration) {
        if let Some(cursor) = &mut self.cursor {
            cursor.advance(at);
        }
        while self.typewriter.next_deadline().is_some_and(|d| d <= at) {
            let before = self.sink.write_count();
            self.typewriter.tick();
            if self.sink.write_count() > before {
                if let Some(text) = self.sink.current() {
                    self.frames.push(Frame {
                        at_ms: as_millis(at),
                        text,
                    });
                }
            }
        }
    }

    fn deliver_inputs(&mut self, at: Duration) {
        while let Some(input) = self.script.get(self.next_input) {
            if input.at() != at {
                break;
            }
            self.next_input += 1;
            if let InputAction::Scroll { y, header_height } = input.action {
                let update = self.scroll.on_scroll(y, header_height);
                self.header_scrolled = update.header_scrolled;
                if let Some(section) = update.active_changed {
                    self.section_changes += 1;
                    debug!(section = %section, "active section changed");
                    if let Some(events) = &self.events {
                        events.emit(Event::SectionChanged {
                            timestamp: Utc::now(),
                            page_ms: as_millis(at),
                            section,
                            header_scrolled: update.header_scrolled,
                        });
                    }
                }
                self.inputs_applied += 1;
                continue;
            }
            let Some(cursor) = &mut self.cursor else {
                trace!(at_ms = input.at_ms, "input dropped: cursor engine not attached");
                continue;
            };
            match &input.action {
                InputAction::Move { x, y } => cursor.on_pointer_move(Point::new(*x, *y), at),
                InputAction::Click { x, y } => cursor.on_click(Point::new(*x, *y), at),
                InputAction::HoverEnter(target) => cursor.on_hover(target, true, at),
                InputAction::HoverLeave(target) => cursor.on_hover(target, false, at),
                InputAction::Scroll { .. } => {}
            }
            self.inputs_applied += 1;
        }
        debug!(at_ms = as_millis(at), "inputs delivered");
    }
}
