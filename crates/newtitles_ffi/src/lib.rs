//! Host-facing bindings for the new-titles core.

pub mod api;
