//! Domain model for contact-form submissions.
//!
//! # Responsibility
//! - Define the persisted submission record and the caller input shape.
//!
//! # Invariants
//! - Identity and creation time are store-assigned, never caller-supplied.
//! - Records are immutable after creation; removal is whole-record.

pub mod submission;
