//! Modal form controllers for templates, schema rows, users and user status.
//!
//! A form is a small state machine (closed / open for create / open for
//! edit) plus its bound field values. Validation rules are declared per field
//! and run on submit. Every close path resets the form to its defaults, so
//! nothing from an edited record leaks into a later create flow.

mod confirm;
mod schema;
mod status;
mod template;
mod user;

pub use confirm::Confirmation;
pub use schema::{SchemaField, SchemaRowForm};
pub use status::StatusForm;
pub use template::{RoleSelection, TemplateField, TemplateForm};
pub use user::{UserField, UserForm, UserIdCheck, generate_username};

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::table::RecordId;

/// `MAJOR.MINOR.PATCH`.
pub static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+$").unwrap_or_else(|e| panic!("semver pattern: {e}"))
});

/// Minimal `local@domain.tld` shape.
pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
});

/// Presentation state of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    #[default]
    Closed,
    Create,
    Edit(RecordId),
}

impl ModalMode {
    pub fn is_open(self) -> bool {
        self != ModalMode::Closed
    }

    /// Record being edited, if any.
    pub fn editing(self) -> Option<RecordId> {
        match self {
            ModalMode::Edit(id) => Some(id),
            _ => None,
        }
    }
}

/// Declarative validation rule for a single field.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must contain non-whitespace.
    Required(&'static str),
    /// Non-empty value must match the pattern.
    Pattern(&'static LazyLock<Regex>, &'static str),
    /// Non-empty value must look like an email address.
    Email(&'static str),
}

/// Message of the first rule `value` violates.
pub fn check(value: &str, rules: &[Rule]) -> Option<&'static str> {
    rules.iter().find_map(|rule| match rule {
        Rule::Required(msg) if value.trim().is_empty() => Some(*msg),
        Rule::Pattern(re, msg) if !value.is_empty() && !re.is_match(value) => Some(*msg),
        Rule::Email(msg) if !value.is_empty() && !EMAIL.is_match(value) => Some(*msg),
        _ => None,
    })
}

/// One invalid field and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation outcome of a submit attempt, one message per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Runs `rules` against `value` and records the first failure.
    pub fn check(&mut self, field: &'static str, value: &str, rules: &[Rule]) {
        if let Some(msg) = check(value, rules) {
            self.push(field, msg);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Keyboard-editable fields of a form.
pub trait FormFields {
    type Field: Copy + Eq + fmt::Debug + 'static;

    /// Fields in focus order.
    const FIELDS: &'static [Self::Field];

    fn label(field: Self::Field) -> &'static str;

    /// Current text of a free-text field; `None` for list/select fields.
    fn text(&self, field: Self::Field) -> Option<&str>;

    fn text_mut(&mut self, field: Self::Field) -> Option<&mut String>;

    /// Validation message shown next to the field.
    fn error(&self, field: Self::Field) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    static VERSION_RULES: &[Rule] = &[
        Rule::Required("Version is required"),
        Rule::Pattern(&SEMVER, "bad version"),
    ];

    #[test]
    fn rules_report_first_failure() {
        assert_eq!(check("", VERSION_RULES), Some("Version is required"));
        assert_eq!(check("  ", VERSION_RULES), Some("Version is required"));
        assert_eq!(check("1.0", VERSION_RULES), Some("bad version"));
        assert_eq!(check("1.0.0-beta", VERSION_RULES), Some("bad version"));
        assert_eq!(check("10.20.30", VERSION_RULES), None);
    }

    #[test]
    fn pattern_alone_allows_empty() {
        assert_eq!(check("", &[Rule::Email("bad")]), None);
        assert_eq!(check("a@b", &[Rule::Email("bad")]), Some("bad"));
        assert_eq!(check("a@b.io", &[Rule::Email("bad")]), None);
        assert_eq!(check("a b@c.io", &[Rule::Email("bad")]), Some("bad"));
    }

    #[test]
    fn errors_keep_one_message_per_field() {
        let mut errors = ValidationErrors::default();
        errors.push("name", "first");
        errors.push("name", "second");
        errors.push("version", "v");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.to_string(), "first; v");
        assert!(errors.into_result(|| ()).is_err());
    }

    #[test]
    fn modal_mode_helpers() {
        assert!(!ModalMode::Closed.is_open());
        assert!(ModalMode::Create.is_open());
        assert_eq!(ModalMode::Edit(4).editing(), Some(4));
        assert_eq!(ModalMode::Create.editing(), None);
    }
}
