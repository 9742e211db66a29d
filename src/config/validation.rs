//! Configuration validation
//!
//! Runs on the deserialized [`VitrineConfig`] and collects every issue
//! instead of stopping at the first, so one `vitrine validate` run shows
//! the whole picture.

use crate::config::loader::ConfigLimits;
use crate::config::schema::{CursorConfig, TypewriterConfig, VitrineConfig};
use crate::cursor::{Color, MAX_PARTICLE_SPREAD};
use crate::error::{Severity, ValidationIssue};
use crate::typewriter::phrases::char_len;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &VitrineConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_typewriter(&config.typewriter, limits);
        self.validate_cursor(&config.cursor, limits);

        if !config.scroll.header_offset.is_finite() || config.scroll.header_offset < 0.0 {
            self.add_error(
                "scroll.header_offset",
                "must be a finite, non-negative number",
            );
        }
        for (i, section) in config.scroll.sections.iter().enumerate() {
            if !section.top.is_finite() || !section.height.is_finite() || section.height < 0.0 {
                self.add_error(
                    &format!("scroll.sections[{i}]"),
                    &format!("section '{}' needs a finite top and a non-negative height", section.id),
                );
            }
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_typewriter(&mut self, typewriter: &TypewriterConfig, limits: &ConfigLimits) {
        if typewriter.phrases.is_empty() {
            self.add_warning(
                "typewriter.phrases",
                "no phrases configured; the typewriter will show an empty line",
            );
        }

        for (i, phrase) in typewriter.phrases.iter().enumerate() {
            let len = char_len(phrase);
            if len > limits.max_phrase_len {
                self.add_warning(
                    &format!("typewriter.phrases[{i}]"),
                    &format!(
                        "phrase is {len} characters long (recommended at most {})",
                        limits.max_phrase_len
                    ),
                );
            }
        }
    }

    fn validate_cursor(&mut self, cursor: &CursorConfig, limits: &ConfigLimits) {
        if cursor.particle_colors.is_empty() {
            self.add_warning(
                "cursor.particle_colors",
                "no particle colors configured; the default palette is used",
            );
        }

        for (i, color) in cursor.particle_colors.iter().enumerate() {
            if Color::parse_hex(color).is_none() {
                self.add_error(
                    &format!("cursor.particle_colors[{i}]"),
                    &format!("'{color}' is not a #rgb or #rrggbb hex color"),
                );
            }
        }

        if cursor.particle_count > limits.max_particles {
            self.add_error(
                "cursor.particle_count",
                &format!(
                    "{} particles per click exceeds the limit of {}",
                    cursor.particle_count, limits.max_particles
                ),
            );
        }

        for (field, value) in [
            ("cursor.idle_timeout_ms", cursor.idle_timeout_ms),
            ("cursor.wave_ttl_ms", cursor.wave_ttl_ms),
            ("cursor.particle_ttl_ms", cursor.particle_ttl_ms),
        ] {
            if value == 0 {
                self.add_error(field, "must be greater than zero");
            }
        }

        if !(0.0..=MAX_PARTICLE_SPREAD).contains(&cursor.particle_spread) {
            self.add_error(
                "cursor.particle_spread",
                &format!("must be a number between 0 and {MAX_PARTICLE_SPREAD}"),
            );
        }

        let burst = cursor.particle_count.saturating_add(1);
        if let Some(cap) = cursor.max_live_effects.filter(|cap| *cap < burst) {
            self.add_warning(
                "cursor.max_live_effects",
                &format!("a cap of {cap} is below one click's {burst} effects; clicks spawn nothing"),
            );
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ConfigLimits {
        ConfigLimits {
            max_particles: 64,
            max_config_size: 1024 * 1024,
            max_phrase_len: 200,
        }
    }

    fn validate(config: &VitrineConfig) -> ValidationResult {
        Validator::new().validate(config, &limits())
    }

    #[test]
    fn test_default_config_is_clean() {
        let result = validate(&VitrineConfig::default());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_bad_color_is_error_with_index() {
        let mut config = VitrineConfig::default();
        config.cursor.particle_colors = vec!["#00e5ff".into(), "blue".into()];
        let result = validate(&config);
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "cursor.particle_colors[1]");
    }

    #[test]
    fn test_too_many_particles() {
        let mut config = VitrineConfig::default();
        config.cursor.particle_count = 65;
        let result = validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "cursor.particle_count");
    }

    #[test]
    fn test_zero_durations_collected_together() {
        let mut config = VitrineConfig::default();
        config.cursor.idle_timeout_ms = 0;
        config.cursor.wave_ttl_ms = 0;
        config.cursor.particle_ttl_ms = 0;
        let result = validate(&config);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_empty_lists_are_warnings() {
        let mut config = VitrineConfig::default();
        config.typewriter.phrases.clear();
        config.cursor.particle_colors.clear();
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().all(|w| w.severity == Severity::Warning));
    }

    #[test]
    fn test_long_phrase_warning_counts_chars() {
        let mut config = VitrineConfig::default();
        config.typewriter.phrases = vec!["é".repeat(200), "x".repeat(201)];
        let result = validate(&config);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, "typewriter.phrases[1]");
    }

    #[test]
    fn test_particle_spread_bounds() {
        for spread in [1.0e308, -0.5, f64::NAN] {
            let mut config = VitrineConfig::default();
            config.cursor.particle_spread = spread;
            let result = validate(&config);
            assert_eq!(result.errors.len(), 1, "spread {spread}");
            assert_eq!(result.errors[0].path, "cursor.particle_spread");
        }

        let mut config = VitrineConfig::default();
        config.cursor.particle_spread = 0.0;
        assert!(validate(&config).is_valid());
    }

    #[test]
    fn test_cap_below_one_click_warns() {
        let mut config = VitrineConfig::default();
        config.cursor.max_live_effects = Some(6);
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings[0].path, "cursor.max_live_effects");

        config.cursor.max_live_effects = Some(7);
        assert!(validate(&config).warnings.is_empty());
    }

    #[test]
    fn test_bad_section_geometry() {
        let mut config = VitrineConfig::default();
        config.scroll.sections = vec![
            crate::scroll::Section::new("home", 0.0, 500.0),
            crate::scroll::Section::new("about", f64::INFINITY, 500.0),
        ];
        let result = validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "scroll.sections[1]");
    }

    #[test]
    fn test_negative_header_offset() {
        let mut config = VitrineConfig::default();
        config.scroll.header_offset = -1.0;
        assert!(validate(&config).has_errors());
    }
}
