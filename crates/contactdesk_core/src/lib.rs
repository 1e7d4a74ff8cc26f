//! Core of the contact form backend.
//! This crate is the single source of truth for submission store invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slot;

pub use config::{SqliteSubmissionStore, StoreConfig};
pub use logging::{default_log_level, init_logging};
pub use model::submission::{ContactFormData, ContactSubmission, SubmissionId};
pub use repo::submission_repo::{
    RepoError, RepoResult, SlotSubmissionRepository, SubmissionRepository, CONTACT_STORAGE_KEY,
};
pub use service::shared_store::SharedSubmissionStore;
pub use service::submission_store::{StoreError, StoreResult, SubmissionStore};
pub use slot::{MemorySlotStorage, SlotError, SlotResult, SlotStorage, SqliteSlotStorage};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
