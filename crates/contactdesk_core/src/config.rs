//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location and logging settings for composition roots.
//! - Build a ready-to-use SQLite-backed submission store.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution itself never fails; invalid values surface when used.

use crate::logging::{default_log_level, init_logging};
use crate::repo::submission_repo::SlotSubmissionRepository;
use crate::service::submission_store::SubmissionStore;
use crate::slot::{SlotResult, SqliteSlotStorage};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CONTACTDESK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CONTACTDESK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CONTACTDESK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "contactdesk.sqlite3";

/// Submission store backed by the SQLite slot table.
pub type SqliteSubmissionStore = SubmissionStore<SlotSubmissionRepository<SqliteSlotStorage>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Reads `CONTACTDESK_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }

    /// Opens the configured database and rehydrates a submission store.
    pub fn open_store(&self) -> SlotResult<SqliteSubmissionStore> {
        let slots = SqliteSlotStorage::open(&self.db_path)?;
        Ok(SubmissionStore::open(SlotSubmissionRepository::new(slots)))
    }
}
