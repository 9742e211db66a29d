//! `vitrine validate`: load and check configuration files.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadResult};
use crate::error::{ConfigError, Severity, ValidationIssue, VitrineError};

/// Outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate every file, printing a report for each.
///
/// All files are checked even after a failure.
///
/// # Errors
///
/// Returns the first file's configuration error once all files were
/// reported.
pub fn run(args: &ValidateArgs) -> Result<(), VitrineError> {
    let loader = ConfigLoader::with_defaults();
    let mut first_error: Option<ConfigError> = None;
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        info!(file = %path.display(), "validating configuration");
        let outcome = loader
            .load(path)
            .and_then(|loaded| promote_warnings(path, loaded, args.strict));

        let report = match outcome {
            Ok(loaded) => {
                for warning in &loaded.warnings {
                    warn!(
                        location = warning.location.as_deref().unwrap_or("<unknown>"),
                        "{}",
                        warning.message
                    );
                }
                FileReport {
                    file: path.display().to_string(),
                    valid: true,
                    errors: Vec::new(),
                    warnings: loaded.warnings.iter().map(ToString::to_string).collect(),
                }
            }
            Err(err) => {
                let report = FileReport {
                    file: path.display().to_string(),
                    valid: false,
                    errors: describe(&err),
                    warnings: Vec::new(),
                };
                first_error.get_or_insert(err);
                report
            }
        };
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                let status = if report.valid { "ok" } else { "invalid" };
                println!("{}: {status}", report.file);
                for line in report.errors.iter().chain(&report.warnings) {
                    println!("  {line}");
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    first_error.map_or(Ok(()), |err| Err(err.into()))
}

/// Under `--strict`, turns load warnings into a validation error.
fn promote_warnings(
    path: &Path,
    loaded: LoadResult,
    strict: bool,
) -> Result<LoadResult, ConfigError> {
    if !strict || loaded.warnings.is_empty() {
        return Ok(loaded);
    }
    Err(ConfigError::ValidationError {
        path: path.display().to_string(),
        errors: loaded
            .warnings
            .into_iter()
            .map(|w| ValidationIssue {
                path: w.location.unwrap_or_default(),
                message: w.message,
                severity: Severity::Error,
            })
            .collect(),
    })
}

/// One line per problem.
fn describe(err: &ConfigError) -> Vec<String> {
    match err {
        ConfigError::ValidationError { errors, .. } => {
            errors.iter().map(ToString::to_string).collect()
        }
        ConfigError::ParseError {
            line: Some(line),
            message,
            ..
        } => vec![format!("error: line {line}: {message}")],
        other => vec![format!("error: {other}")],
    }
}
