//! Field validation shared by respondent and sleep-record models.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure raised before any write.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Mandatory text field is empty after trim.
    BlankField(&'static str),
    /// Numeric field must be zero or greater.
    NegativeValue { field: &'static str, value: f64 },
    /// Float field is NaN or infinite.
    NonFiniteValue(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::NegativeValue { field, value } => {
                write!(f, "field `{field}` must not be negative, got {value}")
            }
            Self::NonFiniteValue(field) => write!(f, "field `{field}` must be a finite number"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_non_negative_int(
    field: &'static str,
    value: i32,
) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeValue {
            field,
            value: f64::from(value),
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative_float(
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue(field));
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(())
}
