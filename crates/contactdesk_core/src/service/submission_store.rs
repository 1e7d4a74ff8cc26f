//! Contact submission store.
//!
//! # Responsibility
//! - Maintain the newest-first sequence of contact submissions.
//! - Write the full sequence through to the repository on every mutation.
//! - Recover from unreadable snapshots by starting empty.
//!
//! # Invariants
//! - Submission ids are unique across the sequence at all times.
//! - Order is insertion order, newest first; deletes never reorder.
//! - After a mutation returns `Ok`, memory and the persisted snapshot match.
//! - A failed write leaves the mutation applied in memory and is reported
//!   as `StoreError::Persist`; `is_synced()` stays false until a later
//!   write succeeds.

use crate::model::submission::{
    new_submission_id, ContactFormData, ContactSubmission, SubmissionId,
};
use crate::repo::submission_repo::{RepoError, SubmissionRepository};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure surfaced to callers.
#[derive(Debug)]
pub enum StoreError {
    /// The in-memory change was applied but could not be persisted.
    Persist {
        operation: &'static str,
        source: RepoError,
    },
    /// A thread panicked while holding the shared store lock.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist { operation, source } => write!(
                f,
                "{operation} applied in memory but not persisted; it may not survive a restart: {source}"
            ),
            Self::Poisoned => write!(f, "submission store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist { source, .. } => Some(source),
            Self::Poisoned => None,
        }
    }
}

/// Authoritative store of contact submissions.
pub struct SubmissionStore<R: SubmissionRepository> {
    repo: R,
    submissions: Vec<ContactSubmission>,
    synced: bool,
}

impl<R: SubmissionRepository> SubmissionStore<R> {
    /// Rehydrates the store from `repo`.
    ///
    /// Never fails: a missing snapshot yields an empty store, and an
    /// unreadable one is logged and replaced by an empty store.
    pub fn open(repo: R) -> Self {
        let (submissions, synced) = match repo.load() {
            Ok(Some(loaded)) => {
                let loaded_count = loaded.len();
                let submissions = dedup_by_id(loaded);
                let dropped = loaded_count - submissions.len();
                if dropped > 0 {
                    warn!(
                        "event=store_rehydrate module=store status=degraded reason=duplicate_ids dropped={}",
                        dropped
                    );
                }
                info!(
                    "event=store_rehydrate module=store status=ok count={}",
                    submissions.len()
                );
                (submissions, dropped == 0)
            }
            Ok(None) => {
                info!("event=store_rehydrate module=store status=ok count=0 source=empty_slot");
                (Vec::new(), true)
            }
            Err(err) => {
                warn!(
                    "event=store_rehydrate module=store status=degraded reason=unreadable_snapshot error={}",
                    err
                );
                (Vec::new(), false)
            }
        };

        Self {
            repo,
            submissions,
            synced,
        }
    }

    /// Records a new submission and persists the full sequence.
    ///
    /// The returned record carries the store-assigned `id` and `created_at`.
    ///
    /// # Errors
    /// - `StoreError::Persist` when the write fails. The record is still the
    ///   first element of `submissions()`.
    pub fn add(&mut self, input: ContactFormData) -> StoreResult<ContactSubmission> {
        let submission = ContactSubmission::from_form_at(self.fresh_id(), Utc::now(), input);
        self.submissions.insert(0, submission.clone());
        debug!(
            "event=submission_add module=store status=applied id={} count={}",
            submission.id,
            self.submissions.len()
        );

        self.persist("add")?;
        Ok(submission)
    }

    /// Removes every submission with `id` and persists the result.
    ///
    /// Unknown ids are a no-op. The write is skipped when nothing changed and
    /// the persisted snapshot is already in sync.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let before = self.submissions.len();
        self.submissions.retain(|submission| submission.id != id);
        let removed = before - self.submissions.len();

        if removed == 0 {
            debug!("event=submission_delete module=store status=noop id={id}");
            if self.synced {
                return Ok(());
            }
        } else {
            debug!(
                "event=submission_delete module=store status=applied id={} count={}",
                id,
                self.submissions.len()
            );
        }

        self.persist("delete")
    }

    /// Re-persists the current sequence, e.g. to retry after a failed write.
    pub fn flush(&mut self) -> StoreResult<()> {
        self.persist("flush")
    }

    /// Current submissions, newest first.
    pub fn submissions(&self) -> &[ContactSubmission] {
        &self.submissions
    }

    pub fn get(&self, id: &str) -> Option<&ContactSubmission> {
        self.submissions.iter().find(|submission| submission.id == id)
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Whether the last persistence attempt left memory and storage equal.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn fresh_id(&self) -> SubmissionId {
        loop {
            let id = new_submission_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self, operation: &'static str) -> StoreResult<()> {
        match self.repo.save(&self.submissions) {
            Ok(()) => {
                self.synced = true;
                info!(
                    "event=store_persist module=store status=ok operation={} count={}",
                    operation,
                    self.submissions.len()
                );
                Ok(())
            }
            Err(source) => {
                self.synced = false;
                error!(
                    "event=store_persist module=store status=error operation={} count={} error_code=persist_failed error={}",
                    operation,
                    self.submissions.len(),
                    source
                );
                Err(StoreError::Persist { operation, source })
            }
        }
    }
}

fn dedup_by_id(submissions: Vec<ContactSubmission>) -> Vec<ContactSubmission> {
    let mut seen = HashSet::with_capacity(submissions.len());
    submissions
        .into_iter()
        .filter(|submission| seen.insert(submission.id.clone()))
        .collect()
}
