//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate their input before persistence.
//! - Repository APIs return semantic errors (`NotFound`, constraint
//!   violations) in addition to DB transport errors.

pub mod respondent_repo;
pub mod sleep_record_repo;
