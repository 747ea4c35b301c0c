//! Domain model for the new-titles catalog.
//!
//! # Responsibility
//! - Define the book record shape shared by the catalog, engines and UI hosts.
//! - Define the calendar month value used for acquisition filtering.
//!
//! # Invariants
//! - Every loaded book carries a stable `BookId` and its catalog position.
//! - Books are immutable after catalog load.

pub mod book;
pub mod month;
