//! Input validation for offer requests.
//!
//! Checks run in a fixed order and stop at the first failure:
//! required fields, email syntax, date range, template presence.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::models::{OfferRequest, ValidatedOffer};

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    MissingField,
    InvalidEmail,
    InvalidDateRange,
    MissingTemplate,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing-field",
            Self::InvalidEmail => "invalid-email",
            Self::InvalidDateRange => "invalid-date-range",
            Self::MissingTemplate => "missing-template",
        }
    }
}

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: RejectionKind,
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(kind: RejectionKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn missing_field(field: &str, label: &str) -> Self {
        Self::new(
            RejectionKind::MissingField,
            field,
            format!("{} must not be empty", label),
        )
        .with_suggestion(format!("Please fill in the {}", label.to_lowercase()))
    }

    pub fn invalid_email(value: &str) -> Self {
        Self::new(
            RejectionKind::InvalidEmail,
            "email",
            format!("'{}' is not a valid email address", value),
        )
        .with_suggestion("Use an address like intern@example.com")
    }

    pub fn invalid_date_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(
            RejectionKind::InvalidDateRange,
            "end_date",
            format!("End date {} cannot be before start date {}", end, start),
        )
    }

    pub fn missing_template(path: &Path) -> Self {
        Self::new(
            RejectionKind::MissingTemplate,
            "template",
            format!("Offer letter template missing at {}", path.display()),
        )
        .with_suggestion("Ask an administrator to install the template")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate a raw request against the template at `template_path`.
///
/// A missing `offer_date` defaults to `today`.
pub fn validate_offer(
    request: &OfferRequest,
    template_path: &Path,
    today: NaiveDate,
) -> Result<ValidatedOffer, ValidationError> {
    let intern_name = required_text(&request.intern_name, "intern_name", "Intern name")?;
    let domain = required_text(&request.domain, "domain", "Domain")?;
    let email = required_text(&request.email, "email", "Recipient email")?;
    let start_date = request
        .start_date
        .ok_or_else(|| ValidationError::missing_field("start_date", "Start date"))?;
    let end_date = request
        .end_date
        .ok_or_else(|| ValidationError::missing_field("end_date", "End date"))?;

    if !is_valid_email(&email) {
        return Err(ValidationError::invalid_email(&email));
    }

    if end_date < start_date {
        return Err(ValidationError::invalid_date_range(start_date, end_date));
    }

    if !template_path.is_file() {
        return Err(ValidationError::missing_template(template_path));
    }

    Ok(ValidatedOffer {
        intern_name,
        domain,
        email,
        start_date,
        end_date,
        offer_date: request.offer_date.unwrap_or(today),
    })
}

/// Basic syntactic email check: something@domain.tld, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

fn required_text(
    value: &Option<String>,
    field: &str,
    label: &str,
) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ValidationError::missing_field(field, label)),
    }
}
