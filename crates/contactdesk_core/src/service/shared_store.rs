//! Thread-safe handle around [`SubmissionStore`].
//!
//! # Responsibility
//! - Serialize read-mutate-persist cycles for multi-threaded hosts.
//!
//! # Invariants
//! - Every mutation holds the lock across the in-memory change and the
//!   snapshot write, so concurrent adds cannot overwrite each other.

use crate::model::submission::{ContactFormData, ContactSubmission};
use crate::repo::submission_repo::SubmissionRepository;
use crate::service::submission_store::{StoreError, StoreResult, SubmissionStore};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-guarded submission store.
pub struct SharedSubmissionStore<R: SubmissionRepository> {
    inner: Arc<Mutex<SubmissionStore<R>>>,
}

impl<R: SubmissionRepository> Clone for SharedSubmissionStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: SubmissionRepository> SharedSubmissionStore<R> {
    pub fn new(store: SubmissionStore<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Rehydrates a store from `repo` and wraps it.
    pub fn open(repo: R) -> Self {
        Self::new(SubmissionStore::open(repo))
    }

    pub fn add(&self, input: ContactFormData) -> StoreResult<ContactSubmission> {
        self.lock()?.add(input)
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.lock()?.delete(id)
    }

    pub fn flush(&self) -> StoreResult<()> {
        self.lock()?.flush()
    }

    /// Copies the current sequence, newest first.
    pub fn snapshot(&self) -> StoreResult<Vec<ContactSubmission>> {
        Ok(self.lock()?.submissions().to_vec())
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<ContactSubmission>> {
        Ok(self.lock()?.get(id).cloned())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Runs `f` against the store while holding the lock.
    pub fn with<T>(&self, f: impl FnOnce(&SubmissionStore<R>) -> T) -> StoreResult<T> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, SubmissionStore<R>>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}
