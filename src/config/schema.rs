//! Configuration schema
//!
//! Every section and field is optional; the defaults reproduce the
//! portfolio page as shipped. Unknown fields are rejected so typos do not
//! silently fall back to defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cursor::{Color, CursorSettings};
use crate::form::FormRules;
use crate::scroll::{ScrollTracker, Section};
use crate::typewriter::phrases::DEFAULT_PHRASES;
use crate::typewriter::{PhraseSequence, TypingSpeeds};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VitrineConfig {
    /// Hero typing effect.
    pub typewriter: TypewriterConfig,
    /// Pointer glow and click effects.
    pub cursor: CursorConfig,
    /// Header and active-section tracking.
    pub scroll: ScrollConfig,
    /// Contact form rules.
    pub form: FormConfig,
}

// ============================================================================
// Typewriter
// ============================================================================

/// Typewriter section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypewriterConfig {
    /// Phrases cycled in order.
    pub phrases: Vec<String>,
    /// Delay before the first character.
    pub initial_delay_ms: u64,
    /// Delay after typing a character.
    pub type_speed_ms: u64,
    /// Delay after deleting a character.
    pub delete_speed_ms: u64,
    /// Pause on a fully typed phrase.
    pub end_pause_ms: u64,
    /// Pause on an empty line before the next phrase.
    pub next_pause_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(ToString::to_string).collect(),
            initial_delay_ms: 1000,
            type_speed_ms: 100,
            delete_speed_ms: 50,
            end_pause_ms: 2000,
            next_pause_ms: 500,
        }
    }
}

impl TypewriterConfig {
    /// The phrase rotation.
    #[must_use]
    pub fn phrase_sequence(&self) -> PhraseSequence {
        PhraseSequence::new(self.phrases.iter().cloned())
    }

    /// Tick delays.
    #[must_use]
    pub const fn speeds(&self) -> TypingSpeeds {
        TypingSpeeds {
            type_speed: Duration::from_millis(self.type_speed_ms),
            delete_speed: Duration::from_millis(self.delete_speed_ms),
            end_pause: Duration::from_millis(self.end_pause_ms),
            next_pause: Duration::from_millis(self.next_pause_ms),
        }
    }

    /// Delay before the first tick.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Cursor section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
    /// Quiet period before the pointer counts as idle.
    pub idle_timeout_ms: u64,
    /// Particles per click.
    pub particle_count: usize,
    /// Hex colors for particles.
    pub particle_colors: Vec<String>,
    /// Half-width of the particle displacement square.
    pub particle_spread: f64,
    /// Click wave lifetime.
    pub wave_ttl_ms: u64,
    /// Particle lifetime.
    pub particle_ttl_ms: u64,
    /// Viewports at or below this width get no cursor effects.
    pub mobile_width_threshold: u32,
    /// Optional ceiling on live effects.
    pub max_live_effects: Option<usize>,
    /// Fixed RNG seed for reproducible particle placement.
    pub seed: Option<u64>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        let defaults = CursorSettings::default();
        Self {
            idle_timeout_ms: 2000,
            particle_count: defaults.particle_count,
            particle_colors: defaults.palette.iter().map(ToString::to_string).collect(),
            particle_spread: defaults.particle_spread,
            wave_ttl_ms: 1000,
            particle_ttl_ms: 3000,
            mobile_width_threshold: defaults.mobile_width_threshold,
            max_live_effects: None,
            seed: None,
        }
    }
}

impl CursorConfig {
    /// Engine settings.
    ///
    /// Unparseable colors are dropped (validation reports them); an empty
    /// result falls back to the default palette.
    #[must_use]
    pub fn settings(&self) -> CursorSettings {
        let mut palette: Vec<Color> = self
            .particle_colors
            .iter()
            .filter_map(|c| Color::parse_hex(c))
            .collect();
        if palette.is_empty() {
            warn!("no usable particle colors; using default palette");
            palette = Color::default_palette();
        }

        CursorSettings {
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            particle_count: self.particle_count,
            palette,
            particle_spread: self.particle_spread,
            wave_ttl: Duration::from_millis(self.wave_ttl_ms),
            particle_ttl: Duration::from_millis(self.particle_ttl_ms),
            mobile_width_threshold: self.mobile_width_threshold,
            max_live_effects: self.max_live_effects,
        }
    }
}

// ============================================================================
// Scroll / Form
// ============================================================================

/// Scroll section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Scroll offset past which the header switches to its compact look.
    pub header_offset: f64,
    /// Page sections backing the navigation links, in document order.
    pub sections: Vec<Section>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_offset: 100.0,
            sections: Vec::new(),
        }
    }
}

impl ScrollConfig {
    /// A tracker over the configured sections, with nothing active yet.
    #[must_use]
    pub fn tracker(&self) -> ScrollTracker {
        ScrollTracker::new(self.sections.clone(), self.header_offset)
    }
}

/// Form section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Minimum message length in characters.
    pub min_message_len: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            min_message_len: FormRules::default().min_message_len,
        }
    }
}

impl FormConfig {
    /// Validation rules for the contact form.
    #[must_use]
    pub const fn rules(&self) -> FormRules {
        FormRules {
            min_message_len: self.min_message_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_fields_default() {
        let config: VitrineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, VitrineConfig::default());
        assert_eq!(config.typewriter.phrases.len(), 4);
        assert_eq!(config.scroll.header_offset, 100.0);
        assert_eq!(config.form.min_message_len, 10);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: VitrineConfig =
            serde_yaml::from_str("typewriter:\n  type_speed_ms: 20\n").unwrap();
        assert_eq!(config.typewriter.type_speed_ms, 20);
        assert_eq!(config.typewriter.delete_speed_ms, 50);
        assert_eq!(config.cursor, CursorConfig::default());
    }

    #[test]
    fn test_scroll_sections_build_tracker() {
        let config: VitrineConfig = serde_yaml::from_str(
            "scroll:\n  header_offset: 50\n  sections:\n    - { id: home, top: 0, height: 600 }\n    - { id: contact, top: 600, height: 400 }\n",
        )
        .unwrap();
        let mut tracker = config.scroll.tracker();
        assert_eq!(tracker.sections().len(), 2);

        let update = tracker.on_scroll(60.0, 0.0);
        assert!(update.header_scrolled);
        assert_eq!(update.active_changed.as_deref(), Some("home"));
    }

    #[test]
    fn test_form_rules_follow_config() {
        let config: VitrineConfig =
            serde_yaml::from_str("form:\n  min_message_len: 3\n").unwrap();
        assert_eq!(config.form.rules().min_message_len, 3);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<VitrineConfig, _> =
            serde_yaml::from_str("cursor:\n  particle_cnt: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_speeds_conversion() {
        let speeds = TypewriterConfig::default().speeds();
        assert_eq!(speeds, TypingSpeeds::default());
    }

    #[test]
    fn test_settings_match_engine_defaults() {
        assert_eq!(CursorConfig::default().settings(), CursorSettings::default());
    }

    #[test]
    fn test_settings_drop_bad_colors() {
        let config = CursorConfig {
            particle_colors: vec!["#FFF".into(), "red".into()],
            ..CursorConfig::default()
        };
        let palette = config.settings().palette;
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].as_str(), "#fff");
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let config = CursorConfig {
            particle_colors: Vec::new(),
            ..CursorConfig::default()
        };
        assert_eq!(config.settings().palette, Color::default_palette());
    }
}
