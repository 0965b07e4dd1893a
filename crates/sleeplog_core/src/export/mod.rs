//! Spreadsheet export of query results.
//!
//! # Responsibility
//! - Serialize respondents and sleep records to CSV that spreadsheet tools
//!   open directly.
//!
//! # Invariants
//! - Output is one header row followed by one row per record, in input order.
//! - Export is stateless; it never reads from or writes to the store.

pub mod spreadsheet;
