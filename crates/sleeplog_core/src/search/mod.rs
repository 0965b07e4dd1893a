//! Sleep-record search entry points.
//!
//! # Responsibility
//! - Model per-dimension range bounds with explicit optional values.
//! - Compose the SQL predicate list for multi-field range search.
//!
//! # Invariants
//! - Active predicates are combined with `AND`.
//! - An empty query produces no `WHERE` clause at all.

pub mod range_filter;
pub mod sleep_query;
