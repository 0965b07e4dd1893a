//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the presentation-facing surface.
//! - Enforce existence checks and map storage results to domain errors.

pub mod respondent_service;
pub mod sleep_record_service;
