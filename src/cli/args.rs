//! CLI argument definitions
//!
//! All Clap derive structs for `vitrine` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Portfolio page animation engines: typewriter hero text and cursor
/// effects, runnable in virtual time.
#[derive(Parser, Debug)]
#[command(name = "vitrine", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "VITRINE_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration files.
    Validate(ValidateArgs),

    /// Run the typewriter and cursor engine in virtual time.
    Simulate(SimulateArgs),

    /// Check a contact form submission against the page's rules.
    CheckForm(CheckFormArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to YAML configuration file (defaults apply when omitted).
    #[arg(short, long, env = "VITRINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// YAML input timeline (`- { at_ms: 500, click: { x: 10, y: 20 } }`).
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Page time to simulate (e.g. `10s`, `1500ms`).
    #[arg(short, long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1280)]
    pub viewport_width: u32,

    /// Write the JSONL event stream to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Fixed RNG seed, overriding `cursor.seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drive the machines on the wall clock instead of virtual time.
    #[arg(long)]
    pub realtime: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `check-form`.
#[derive(Args, Debug)]
pub struct CheckFormArgs {
    /// YAML or JSON file with `name`, `email`, `subject` and `message`.
    pub form: PathBuf,

    /// Path to YAML configuration file (defaults apply when omitted).
    #[arg(short, long, env = "VITRINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_files() {
        assert!(Cli::try_parse_from(["vitrine", "validate"]).is_err());
        let cli = Cli::try_parse_from(["vitrine", "validate", "a.yaml", "b.yaml"]).unwrap();
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.files.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_simulate_defaults() {
        let cli = Cli::try_parse_from(["vitrine", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.duration, Duration::from_secs(10));
                assert_eq!(args.viewport_width, 1280);
                assert_eq!(args.format, OutputFormat::Human);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_simulate_humantime_duration() {
        let cli =
            Cli::try_parse_from(["vitrine", "simulate", "--duration", "1500ms"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => assert_eq!(args.duration, Duration::from_millis(1500)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_duration_rejected() {
        assert!(Cli::try_parse_from(["vitrine", "simulate", "--duration", "soon"]).is_err());
    }

    #[test]
    fn test_check_form_takes_one_file() {
        let cli = Cli::try_parse_from(["vitrine", "check-form", "form.yaml"]).unwrap();
        match cli.command {
            Commands::CheckForm(args) => {
                assert_eq!(args.form, PathBuf::from("form.yaml"));
                assert_eq!(args.format, OutputFormat::Human);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["vitrine", "check-form"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["vitrine", "-vvv", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["vitrine", "version", "--quiet", "--color", "never"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_version_json_format() {
        let cli = Cli::try_parse_from(["vitrine", "version", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Version(args) => assert_eq!(args.format, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
