//! Host surface for cursor effects.
//!
//! The engine only ever creates nodes, removes nodes, and mutates three
//! named elements (glow, grid, background). Every call must be a safe
//! no-op once the host has torn the surface down.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::effects::{Color, EffectKind, Vector};

/// A position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Identifier of a long-lived host element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    /// Creates a handle from a host element id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a transient node created by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeHandle(pub u64);

/// Everything the host needs to render a transient node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    /// Wave or particle.
    pub kind: EffectKind,
    /// Where the node appears.
    pub position: Point,
    /// Style class the host animates.
    pub class: &'static str,
    /// Particle drift target relative to `position`.
    pub displacement: Option<Vector>,
    /// Particle color.
    pub color: Option<Color>,
}

/// Visual-state changes applied to long-lived elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mutation", rename_all = "snake_case")]
pub enum SurfaceMutation {
    /// Center the element on a point.
    MoveTo {
        /// Target position.
        position: Point,
    },
    /// Toggle the element's active look.
    SetActive {
        /// New flag value.
        active: bool,
    },
    /// Toggle the enlarged, sharper glow used over links and buttons.
    SetEmphasis {
        /// New flag value.
        emphasized: bool,
    },
    /// Hide the element entirely.
    Hide,
}

/// Host capabilities consumed by the cursor engine.
pub trait EffectSurface {
    /// Whether the host is still alive.
    ///
    /// The engine asks before every other call and leaves a dead host alone.
    fn is_live(&self) -> bool {
        true
    }

    /// Inserts a transient node, returning its handle.
    ///
    /// Returns `None` when the surface is torn down.
    fn create_node(&mut self, spec: &NodeSpec) -> Option<NodeHandle>;

    /// Removes a node. Returns `false` if it was already gone.
    fn remove_node(&mut self, handle: NodeHandle) -> bool;

    /// Applies a visual-state change to a long-lived element.
    fn apply(&mut self, element: &ElementHandle, mutation: SurfaceMutation);
}

impl<S: EffectSurface + ?Sized> EffectSurface for Box<S> {
    fn is_live(&self) -> bool {
        (**self).is_live()
    }

    fn create_node(&mut self, spec: &NodeSpec) -> Option<NodeHandle> {
        (**self).create_node(spec)
    }

    fn remove_node(&mut self, handle: NodeHandle) -> bool {
        (**self).remove_node(handle)
    }

    fn apply(&mut self, element: &ElementHandle, mutation: SurfaceMutation) {
        (**self).apply(element, mutation);
    }
}

/// In-memory surface recording every call.
///
/// Clones share state so a driver can own one handle while tests or the
/// CLI inspect another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

#[derive(Debug, Default)]
struct SurfaceInner {
    nodes: BTreeMap<NodeHandle, NodeSpec>,
    next_node: u64,
    created: usize,
    removed: usize,
    mutations: Vec<(ElementHandle, SurfaceMutation)>,
    torn_down: bool,
}

impl RecordingSurface {
    /// Creates a live, empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceInner> {
        self.inner.lock().expect("surface lock poisoned")
    }

    /// Simulates page teardown: every node disappears and later calls
    /// become no-ops.
    pub fn tear_down(&self) {
        let mut inner = self.lock();
        inner.nodes.clear();
        inner.torn_down = true;
    }

    /// Nodes currently present.
    #[must_use]
    pub fn live_nodes(&self) -> Vec<(NodeHandle, NodeSpec)> {
        self.lock()
            .nodes
            .iter()
            .map(|(h, s)| (*h, s.clone()))
            .collect()
    }

    /// Number of nodes currently present.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Total nodes ever created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.lock().created
    }

    /// Total successful removals.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.lock().removed
    }

    /// Every mutation applied, in order.
    #[must_use]
    pub fn mutations(&self) -> Vec<(ElementHandle, SurfaceMutation)> {
        self.lock().mutations.clone()
    }

    /// Mutations applied to a single element, in order.
    #[must_use]
    pub fn mutations_of(&self, element: &str) -> Vec<SurfaceMutation> {
        self.lock()
            .mutations
            .iter()
            .filter(|(e, _)| e.0 == element)
            .map(|(_, m)| *m)
            .collect()
    }
}

impl EffectSurface for RecordingSurface {
    fn is_live(&self) -> bool {
        !self.lock().torn_down
    }

    fn create_node(&mut self, spec: &NodeSpec) -> Option<NodeHandle> {
        let mut inner = self.lock();
        if inner.torn_down {
            return None;
        }
        let handle = NodeHandle(inner.next_node);
        inner.next_node += 1;
        inner.created += 1;
        inner.nodes.insert(handle, spec.clone());
        Some(handle)
    }

    fn remove_node(&mut self, handle: NodeHandle) -> bool {
        let mut inner = self.lock();
        if inner.nodes.remove(&handle).is_some() {
            inner.removed += 1;
            true
        } else {
            false
        }
    }

    fn apply(&mut self, element: &ElementHandle, mutation: SurfaceMutation) {
        let mut inner = self.lock();
        if !inner.torn_down {
            inner.mutations.push((element.clone(), mutation));
        }
    }
}
