//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative in-memory submission sequence.
//! - Keep UI/CLI layers decoupled from slot and wire-format details.

pub mod shared_store;
pub mod submission_store;
