//! Respondent domain model.
//!
//! # Responsibility
//! - Define the persisted survey participant record and its create/patch
//!   inputs.
//! - Normalize and validate text fields before they reach storage.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `first_name`, `last_name` and `email` are non-blank; `age >= 0`.
//! - `email` is unique across respondents (case-insensitive, store enforced).

use crate::model::validation::{require_non_negative_int, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned respondent identity.
pub type RespondentId = i64;

/// Persisted survey participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: RespondentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub country: String,
    pub age: i32,
}

/// Create input for a respondent. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRespondent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub country: String,
    pub age: i32,
}

/// Named-field replacement for an existing respondent.
///
/// `Some` overwrites the stored value, `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RespondentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub age: Option<i32>,
}

impl NewRespondent {
    /// Returns a copy with surrounding whitespace removed from text fields.
    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            gender: self.gender.trim().to_string(),
            country: self.country.trim().to_string(),
            age: self.age,
        }
    }

    /// Checks mandatory fields and age.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.first_name, &self.last_name, &self.email, self.age)
    }

    /// Attaches a store-assigned id.
    pub fn into_respondent(self, id: RespondentId) -> Respondent {
        Respondent {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            gender: self.gender,
            country: self.country,
            age: self.age,
        }
    }
}

impl Respondent {
    /// Checks mandatory fields and age.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.first_name, &self.last_name, &self.email, self.age)
    }

    /// Applies every `Some` field of `patch`, trimming text values.
    pub fn apply_patch(&mut self, patch: &RespondentPatch) {
        if let Some(value) = patch.first_name.as_deref() {
            self.first_name = value.trim().to_string();
        }
        if let Some(value) = patch.last_name.as_deref() {
            self.last_name = value.trim().to_string();
        }
        if let Some(value) = patch.email.as_deref() {
            self.email = value.trim().to_string();
        }
        if let Some(value) = patch.gender.as_deref() {
            self.gender = value.trim().to_string();
        }
        if let Some(value) = patch.country.as_deref() {
            self.country = value.trim().to_string();
        }
        if let Some(value) = patch.age {
            self.age = value;
        }
    }
}

impl RespondentPatch {
    /// Builds a patch that replaces every field.
    pub fn replace_all(fields: &NewRespondent) -> Self {
        Self {
            first_name: Some(fields.first_name.clone()),
            last_name: Some(fields.last_name.clone()),
            email: Some(fields.email.clone()),
            gender: Some(fields.gender.clone()),
            country: Some(fields.country.clone()),
            age: Some(fields.age),
        }
    }

    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn validate_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    age: i32,
) -> Result<(), ValidationError> {
    require_text("first_name", first_name)?;
    require_text("last_name", last_name)?;
    require_text("email", email)?;
    require_non_negative_int("age", age)?;
    Ok(())
}
