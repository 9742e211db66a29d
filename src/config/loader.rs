//! Configuration loader
//!
//! Pipeline:
//! 1. Size check and read
//! 2. UTF-8 BOM stripping
//! 3. YAML parsing (empty documents are rejected)
//! 4. Deserialization to [`VitrineConfig`]
//! 5. Validation
//! 6. Freeze with `Arc`

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::debug;

use crate::config::schema::VitrineConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration values and size.
    pub config_limits: ConfigLimits,
}

/// Limits guarding against configurations that would swamp the page.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum particles spawned per click.
    pub max_particles: usize,
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
    /// Phrase length (in characters) above which a warning is issued.
    pub max_phrase_len: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_particles: env_or("VITRINE_MAX_PARTICLES", 64),
            max_config_size: env_or("VITRINE_MAX_CONFIG_SIZE", 1024 * 1024),
            max_phrase_len: 200,
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<VitrineConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a configuration file and returns the frozen configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing or deserialization fails
    /// - Validation reports any error
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let limit = self.options.config_limits.max_config_size;
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(limit.saturating_add(1));
        if file_size > limit {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {limit} bytes"),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), bytes = raw.len(), "loading configuration");
        self.load_str(&raw, path)
    }

    /// Loads a configuration from YAML text. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing, deserialization, or validation fails.
    pub fn load_str(&self, content: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let root: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        if root.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        let config: VitrineConfig =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: format!("Failed to deserialize configuration: {e}"),
            })?;

        let mut validator = Validator::new();
        let validation = validator.validate(&config, &self.options.config_limits);

        if validation.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: validation.errors,
            });
        }

        let warnings = validation
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }
}

/// Loads `path` when given, otherwise returns the built-in defaults.
///
/// # Errors
///
/// Propagates any [`ConfigLoader::load`] failure.
pub fn load_or_default(path: Option<&Path>) -> Result<LoadResult, ConfigError> {
    match path {
        Some(path) => ConfigLoader::with_defaults().load(path),
        None => Ok(LoadResult {
            config: Arc::new(VitrineConfig::default()),
            warnings: Vec::new(),
        }),
    }
}

/// Reads a numeric limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
