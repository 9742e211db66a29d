//! `vitrine check-form`: run the contact form checks on a saved submission.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::args::{CheckFormArgs, OutputFormat};
use crate::config::load_or_default;
use crate::error::VitrineError;
use crate::form::{self, ContactForm, FieldError, FormRules};

#[derive(Debug, Serialize)]
struct FormReport<'a> {
    valid: bool,
    errors: &'a [FieldError],
}

/// Check one submission with the configured rules.
///
/// # Errors
///
/// Returns a config, I/O or YAML error when inputs cannot be read, and
/// [`VitrineError::InvalidForm`] when any field fails.
pub fn run(args: &CheckFormArgs) -> Result<(), VitrineError> {
    let loaded = load_or_default(args.config.as_deref())?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let submission = load_form(&args.form)?;
    let errors = check(&submission, &loaded.config.form.rules());
    debug!(failing = errors.len(), "contact form checked");

    match args.format {
        OutputFormat::Json => {
            let report = FormReport {
                valid: errors.is_empty(),
                errors: &errors,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            if errors.is_empty() {
                println!("{}: ok", args.form.display());
            }
            for error in &errors {
                println!("{}: {}", error.field.as_str(), error.message);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(VitrineError::InvalidForm {
            count: errors.len(),
        })
    }
}

/// Reads a submission. JSON is valid YAML, so both parse.
fn load_form(path: &Path) -> Result<ContactForm, VitrineError> {
    let raw = std::fs::read_to_string(path)?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    if raw.trim().is_empty() {
        return Ok(ContactForm::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}

fn check(submission: &ContactForm, rules: &FormRules) -> Vec<FieldError> {
    form::validate(submission, rules).err().unwrap_or_default()
}
