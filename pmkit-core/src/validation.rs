//! Required-field and range checks run before any record is written.
//!
//! Inputs arrive with every field optional, the way an unfilled form would
//! submit them. A blank string counts as missing.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Names of the fields the error refers to.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::MissingFields(fields) => fields.clone(),
            Self::InvalidField { field, .. } => vec![field.clone()],
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Accumulates missing fields so a single error can name all of them.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, name: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(v) if !is_blank(v) => Some(v.trim().to_string()),
            _ => {
                self.missing.push(name.to_string());
                None
            }
        }
    }

    pub fn value<T>(&mut self, name: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(name.to_string());
        }
        value
    }

    pub fn mark_missing(&mut self, name: &str) {
        self.missing.push(name.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::MissingFields(self.missing)
    }

    pub fn check(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid(field, "expected a date formatted YYYY-MM-DD"))
}

pub fn non_negative(field: &str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::invalid(field, "must not be negative"));
    }
    Ok(value)
}

/// Checks a count that is a subset of another, such as retained within total.
pub fn subset_count(
    part_field: &str,
    part: i64,
    whole_field: &str,
    whole: i64,
) -> Result<(), ValidationError> {
    non_negative(whole_field, whole)?;
    non_negative(part_field, part)?;
    if part > whole {
        return Err(ValidationError::invalid(
            part_field,
            format!("cannot exceed {whole_field}"),
        ));
    }
    Ok(())
}
