//! Pure browse engines.
//!
//! # Responsibility
//! - Derive the month listing from the catalog (`month_filter`).
//! - Slice listings into pages and track the current page (`pagination`).
//!
//! # Invariants
//! - Engine functions are pure and deterministic for fixed inputs.
//! - Engine functions never fail; bad input yields empty output.

pub mod month_filter;
pub mod pagination;
