//! Diagnostics on stderr.
//!
//! Verbosity flags only raise the level of the crate's own spans and
//! events; dependencies stay at `warn`. `VITRINE_LOG_LEVEL` replaces the
//! whole filter and `VITRINE_LOG_FORMAT=json` switches to JSON lines.

use std::io::IsTerminal;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, ColorChoice};

/// Full filter override, in `EnvFilter` syntax.
pub const LOG_LEVEL_ENV: &str = "VITRINE_LOG_LEVEL";

/// Output format override (`human` or `json`).
pub const LOG_FORMAT_ENV: &str = "VITRINE_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact lines, colored when the terminal allows it.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// How the subscriber should be set up for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Line format.
    pub format: LogFormat,
    /// `-v` count.
    pub verbosity: u8,
    /// `--quiet`: errors only.
    pub quiet: bool,
    /// `--color`.
    pub color: ColorChoice,
}

impl LogSettings {
    /// Settings from the global flags, with the format taken from
    /// `VITRINE_LOG_FORMAT` when it parses.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Self {
            format,
            verbosity: cli.verbose,
            quiet: cli.quiet,
            color: cli.color,
        }
    }

    /// Filter directives implied by the flags alone.
    #[must_use]
    pub fn directives(&self) -> String {
        if self.quiet {
            return "error".to_string();
        }
        let level = match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
    }

    /// The filter to install. An override that fails to parse is ignored.
    #[must_use]
    pub fn filter(&self, env_override: Option<&str>) -> EnvFilter {
        env_override
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(self.directives()))
    }

    fn use_ansi(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        }
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(settings: &LogSettings) {
    let env_override = std::env::var(LOG_LEVEL_ENV).ok();
    let filter = settings.filter(env_override.as_deref());
    // Targets only help once the crate's internals are being traced.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.verbosity >= 2)
        .with_writer(std::io::stderr);

    let _ = match settings.format {
        LogFormat::Human => builder.with_ansi(settings.use_ansi()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
