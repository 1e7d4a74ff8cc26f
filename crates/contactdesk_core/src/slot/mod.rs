//! Durable key-value slots.
//!
//! # Responsibility
//! - Define the named-slot persistence contract used by repositories.
//! - Provide SQLite-backed and in-memory slot implementations.
//!
//! # Invariants
//! - `set` fully overwrites the previous value of a slot.
//! - A slot that was never written reads as `None`, not as an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemorySlotStorage;
pub use sqlite::SqliteSlotStorage;

pub type SlotResult<T> = Result<T, SlotError>;

/// Error raised by slot reads and writes.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Backend refused the operation, e.g. quota exhausted or storage offline.
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "slot storage unavailable: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named-slot persistence layer.
pub trait SlotStorage {
    fn get(&self, key: &str) -> SlotResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SlotResult<()>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> SlotResult<bool>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for &S {
    fn get(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> SlotResult<bool> {
        (**self).remove(key)
    }
}
