//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot persistence contract used by the submission store.
//! - Isolate slot keys and wire format from service orchestration.
//!
//! # Invariants
//! - `save` writes the whole collection; there are no partial updates.
//! - Decode failures are reported, never masked as empty data; recovery
//!   policy belongs to the caller.

pub mod submission_repo;
