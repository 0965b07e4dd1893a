//! Domain model for survey respondents and their sleep records.
//!
//! # Responsibility
//! - Define canonical data structures used by repositories and services.
//! - Own field-level validation shared by create and update paths.
//!
//! # Invariants
//! - Identities are store-assigned integers and never change after insert.
//! - A sleep record references its respondent by id only (lookup, not
//!   containment).

pub mod respondent;
pub mod sleep_record;
pub mod validation;
