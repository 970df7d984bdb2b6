//! Field validation utilities.
//!
//! This module contains the pure validators used to gate step transitions,
//! plus helpers for parsing and displaying comma-grouped numbers.

use log::*;
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Outcome of validating a single field value.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    /// Return a passing result.
    ///
    pub fn valid() -> ValidationResult {
        ValidationResult {
            is_valid: true,
            error: None,
        }
    }

    /// Return a failing result carrying the given field error text.
    ///
    pub fn invalid(error: &str) -> ValidationResult {
        ValidationResult {
            is_valid: false,
            error: Some(error.to_string()),
        }
    }
}

/// Validate a required text field. Empty or whitespace-only input fails.
///
pub fn validate_required(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid("This field is required");
    }
    ValidationResult::valid()
}

/// Validate an email address.
///
/// Checks run in a fixed order so multiply-invalid input always produces the
/// same error text: empty, embedded space, missing local part, missing
/// domain, then the format pattern.
pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::invalid("Email is required");
    }
    if email.contains(' ') {
        return ValidationResult::invalid("Email cannot contain spaces");
    }
    if email.starts_with('@') {
        return ValidationResult::invalid("Email must have local part");
    }
    if email.ends_with('@') {
        return ValidationResult::invalid("Email must have domain");
    }

    let re = match Regex::new(EMAIL_PATTERN) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to compile email pattern '{}': {}", EMAIL_PATTERN, e);
            return ValidationResult::invalid("Invalid email format");
        }
    };
    if !re.is_match(email) {
        return ValidationResult::invalid("Invalid email format");
    }

    ValidationResult::valid()
}

/// Validate a cargo value as typed, accepting comma-grouped input such as
/// "1,500,000.50".
///
pub fn validate_cargo_value(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Cargo value is required");
    }

    let amount = match parse_formatted_number(value) {
        Some(n) => n,
        None => return ValidationResult::invalid("Cargo value must be a valid number"),
    };

    if amount <= 0.0 {
        return ValidationResult::invalid("Cargo value must be greater than 0");
    }

    ValidationResult::valid()
}

/// Parse a possibly comma-grouped number string. Returns `None` for anything
/// that is not a finite number after stripping commas.
///
pub fn parse_formatted_number(value: &str) -> Option<f64> {
    let cleaned = value.replace(',', "");
    match cleaned.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

/// Format a number with thousands separators for display, e.g.
/// `1500000.5` becomes `"1,500,000.5"`.
///
pub fn format_number(value: f64) -> String {
    let text = value.to_string();
    let (integer_part, fraction_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part.as_str()),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
