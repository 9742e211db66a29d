//! Header state and active navigation section from the scroll position.

use serde::{Deserialize, Serialize};

/// Distance below the header at which the active section is read.
pub const MARKER_OFFSET: f64 = 100.0;

/// A page section with its layout box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Anchor id, as used by the navigation links.
    pub id: String,
    /// Offset of the section's top from the top of the document.
    pub top: f64,
    /// Section height.
    pub height: f64,
}

impl Section {
    /// Creates a section.
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    fn contains(&self, y: f64) -> bool {
        self.top <= y && y < self.top + self.height
    }
}

/// Outcome of one scroll event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollUpdate {
    /// Whether the header shows its compact look.
    pub header_scrolled: bool,
    /// New active section, reported once per change.
    pub active_changed: Option<String>,
}

/// Tracks which navigation link should be highlighted.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    sections: Vec<Section>,
    header_offset: f64,
    active: Option<String>,
}

impl ScrollTracker {
    /// Creates a tracker with no active section.
    #[must_use]
    pub const fn new(sections: Vec<Section>, header_offset: f64) -> Self {
        Self {
            sections,
            header_offset,
            active: None,
        }
    }

    /// Handles a scroll to `scroll_y` with the header `header_height` tall.
    ///
    /// When sections overlap, the last one in document order wins.
    pub fn on_scroll(&mut self, scroll_y: f64, header_height: f64) -> ScrollUpdate {
        let marker = scroll_y + header_height + MARKER_OFFSET;
        let hit = self.sections.iter().rfind(|s| s.contains(marker));

        let active_changed = match hit {
            Some(section) if self.active.as_deref() != Some(section.id.as_str()) => {
                self.active = Some(section.id.clone());
                self.active.clone()
            }
            _ => None,
        };

        ScrollUpdate {
            header_scrolled: scroll_y > self.header_offset,
            active_changed,
        }
    }

    /// Sections being tracked, in document order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Currently highlighted section.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}
