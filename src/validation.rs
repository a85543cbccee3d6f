//! Field validation shared by the FUT registry and the school CRUD screens.
//!
//! Every submission is checked against its field set before any network
//! call is made. Errors are collected, never short-circuited, so the caller
//! can report all of them at once.

use std::fmt;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// Validation error with a user-facing message in Spanish.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Hint for how to fix the value
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} es obligatorio", label))
    }

    pub fn invalid_phone(field: &str) -> Self {
        Self::new(field, "El teléfono debe tener 9 dígitos")
            .with_suggestion("Ejemplo: 987654321")
    }

    pub fn invalid_email(field: &str) -> Self {
        Self::new(field, "El correo electrónico no es válido")
            .with_suggestion("Ejemplo: apoderado@correo.com")
    }

    pub fn invalid_dni(field: &str) -> Self {
        Self::new(field, "El DNI debe tener 8 dígitos").with_suggestion("Ejemplo: 45678912")
    }

    pub fn invalid_date(field: &str, value: &str) -> Self {
        Self::new(field, format!("La fecha '{}' no es válida", value))
            .with_suggestion("Use el formato AAAA-MM-DD")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Single-line message listing every failure, used in notifications.
    pub fn joined_message(&self) -> String {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        format!("Errores de validación: {}", messages.join(", "))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined_message())
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

pub fn validate_required_option<T>(
    value: Option<&T>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) {
    if value.is_none() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

fn is_digits(value: &str, count: usize) -> bool {
    value.len() == count && value.chars().all(|c| c.is_ascii_digit())
}

/// Peruvian mobile numbers: exactly 9 digits.
pub fn validate_phone(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, label));
        return;
    }
    if !is_digits(trimmed, 9) {
        errors.add(ValidationError::invalid_phone(field));
    }
}

pub fn validate_phone_optional(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !is_digits(trimmed, 9) {
        errors.add(ValidationError::invalid_phone(field));
    }
}

pub fn validate_email(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, label));
        return;
    }
    if !EMAIL_PATTERN.is_match(trimmed) {
        errors.add(ValidationError::invalid_email(field));
    }
}

pub fn validate_email_optional(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !EMAIL_PATTERN.is_match(trimmed) {
        errors.add(ValidationError::invalid_email(field));
    }
}

pub fn validate_dni(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, label));
        return;
    }
    if !is_digits(trimmed, 8) {
        errors.add(ValidationError::invalid_dni(field));
    }
}

pub fn validate_dni_optional(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !is_digits(trimmed, 8) {
        errors.add(ValidationError::invalid_dni(field));
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
pub fn is_iso_date(value: &str) -> bool {
    let date_part = value.trim().get(..10).unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").is_ok()
}

pub fn validate_date(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, label));
        return;
    }
    if !is_iso_date(trimmed) {
        errors.add(ValidationError::invalid_date(field, trimmed));
    }
}

pub fn validate_date_optional(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !is_iso_date(trimmed) {
        errors.add(ValidationError::invalid_date(field, trimmed));
    }
}

pub fn validate_pattern(
    value: &str,
    pattern: &Regex,
    field: &str,
    message: &str,
    errors: &mut ValidationErrors,
) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !pattern.is_match(trimmed) {
        errors.add(ValidationError::new(field, message));
    }
}
