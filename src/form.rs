//! Contact form validation
//!
//! Client-side checks run before the (stubbed) submission. Messages are in
//! Portuguese, matching the page copy.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Raw field values as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactForm {
    /// Visitor name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
}

/// Tunable rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormRules {
    /// Minimum message length in characters, after trimming.
    pub min_message_len: usize,
}

impl Default for FormRules {
    fn default() -> Self {
        Self {
            min_message_len: 10,
        }
    }
}

/// Form field names, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Visitor name.
    Name,
    /// Reply address.
    Email,
    /// Subject line.
    Subject,
    /// Message body.
    Message,
}

impl Field {
    /// Form control name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

/// A failed check on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The offending field.
    pub field: Field,
    /// Message shown under the field.
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Whether `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks every field and reports all failures in field order.
///
/// # Errors
///
/// Returns the list of field errors when any check fails.
pub fn validate(form: &ContactForm, rules: &FormRules) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(FieldError::new(Field::Name, "Nome é obrigatório"));
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new(Field::Email, "Email é obrigatório"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new(Field::Email, "Email inválido"));
    }

    if form.subject.trim().is_empty() {
        errors.push(FieldError::new(Field::Subject, "Assunto é obrigatório"));
    }

    let message = form.message.trim();
    if message.is_empty() {
        errors.push(FieldError::new(Field::Message, "Mensagem é obrigatória"));
    } else if message.chars().count() < rules.min_message_len {
        errors.push(FieldError::new(
            Field::Message,
            format!(
                "Mensagem deve ter pelo menos {} caracteres",
                rules.min_message_len
            ),
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: "Projeto".into(),
            message: "Gostaria de conversar".into(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert_eq!(validate(&filled(), &FormRules::default()), Ok(()));
    }

    #[test]
    fn test_empty_form_reports_all_fields_in_order() {
        let errors = validate(&ContactForm::default(), &FormRules::default()).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![Field::Name, Field::Email, Field::Subject, Field::Message]
        );
        assert_eq!(errors[0].message, "Nome é obrigatório");
        assert_eq!(errors[3].message, "Mensagem é obrigatória");
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let form = ContactForm {
            name: "   ".into(),
            ..filled()
        };
        let errors = validate(&form, &FormRules::default()).unwrap_err();
        assert_eq!(errors, vec![FieldError::new(Field::Name, "Nome é obrigatório")]);
    }

    #[test]
    fn test_invalid_email() {
        for bad in ["ana", "ana@", "ana@example", "a na@example.com", "@example.com"] {
            let form = ContactForm {
                email: bad.into(),
                ..filled()
            };
            let errors = validate(&form, &FormRules::default()).unwrap_err();
            assert_eq!(errors[0].message, "Email inválido", "input: {bad}");
        }
    }

    #[test]
    fn test_email_is_trimmed() {
        let form = ContactForm {
            email: "  ana@example.com ".into(),
            ..filled()
        };
        assert!(validate(&form, &FormRules::default()).is_ok());
    }

    #[test]
    fn test_short_message() {
        let form = ContactForm {
            message: "  Olá!  ".into(),
            ..filled()
        };
        let errors = validate(&form, &FormRules::default()).unwrap_err();
        assert_eq!(errors[0].message, "Mensagem deve ter pelo menos 10 caracteres");
    }

    #[test]
    fn test_message_length_counts_characters() {
        let form = ContactForm {
            message: "ééééééééé".into(),
            ..filled()
        };
        assert!(validate(&form, &FormRules::default()).is_err());
        let form = ContactForm {
            message: "éééééééééé".into(),
            ..filled()
        };
        assert!(validate(&form, &FormRules::default()).is_ok());
    }

    #[test]
    fn test_field_names_match_serde() {
        for field in [Field::Name, Field::Email, Field::Subject, Field::Message] {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json.as_str(), Some(field.as_str()));
        }
    }

    #[test]
    fn test_custom_min_length() {
        let form = ContactForm {
            message: "Oi".into(),
            ..filled()
        };
        assert!(validate(&form, &FormRules { min_message_len: 2 }).is_ok());
    }
}
