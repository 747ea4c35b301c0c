//! Browse use-case services.
//!
//! # Responsibility
//! - Hold UI session state: reference month, page, selection.
//! - Keep UI hosts decoupled from engine and catalog details.

pub mod selection;
pub mod session;
