//! Submission snapshot repository over a durable slot.
//!
//! # Responsibility
//! - Load and save the full submission sequence under one fixed slot key.
//! - Own the snapshot envelope format.
//!
//! # Invariants
//! - Slot value shape is `{"state":{"submissions":[...]},"version":0}`.
//! - Every save is a full overwrite of the slot.
//! - Sequence order is preserved exactly across save/load.

use crate::model::submission::ContactSubmission;
use crate::slot::{SlotError, SlotStorage};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key owned exclusively by the submission store.
pub const CONTACT_STORAGE_KEY: &str = "contact-storage";

/// Envelope version written with every snapshot.
pub const SNAPSHOT_VERSION: u32 = 0;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Slot(SlotError),
    /// Stored snapshot exists but cannot be parsed.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slot(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "invalid persisted submission snapshot: {err}"),
            Self::Encode(err) => write!(f, "failed to encode submission snapshot: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<SlotError> for RepoError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

/// Persistence backend for the submission store.
pub trait SubmissionRepository {
    /// Returns `None` when nothing has been persisted yet.
    fn load(&self) -> RepoResult<Option<Vec<ContactSubmission>>>;
    /// Overwrites the persisted snapshot with `submissions`.
    fn save(&self, submissions: &[ContactSubmission]) -> RepoResult<()>;
}

impl<R: SubmissionRepository + ?Sized> SubmissionRepository for &R {
    fn load(&self) -> RepoResult<Option<Vec<ContactSubmission>>> {
        (**self).load()
    }

    fn save(&self, submissions: &[ContactSubmission]) -> RepoResult<()> {
        (**self).save(submissions)
    }
}

// `version` is not read back: snapshots of any version load as-is.
#[derive(Deserialize)]
struct SnapshotEnvelope {
    state: SnapshotState,
}

#[derive(Deserialize)]
struct SnapshotState {
    #[serde(default)]
    submissions: Vec<ContactSubmission>,
}

#[derive(Serialize)]
struct SnapshotEnvelopeRef<'a> {
    state: SnapshotStateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
struct SnapshotStateRef<'a> {
    submissions: &'a [ContactSubmission],
}

/// Slot-backed submission repository bound to `CONTACT_STORAGE_KEY`.
pub struct SlotSubmissionRepository<S: SlotStorage> {
    slots: S,
}

impl<S: SlotStorage> SlotSubmissionRepository<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }
}

impl<S: SlotStorage> SubmissionRepository for SlotSubmissionRepository<S> {
    fn load(&self) -> RepoResult<Option<Vec<ContactSubmission>>> {
        let Some(raw) = self.slots.get(CONTACT_STORAGE_KEY)? else {
            return Ok(None);
        };
        decode_snapshot(&raw).map(Some)
    }

    fn save(&self, submissions: &[ContactSubmission]) -> RepoResult<()> {
        let raw = encode_snapshot(submissions)?;
        self.slots.set(CONTACT_STORAGE_KEY, &raw)?;
        Ok(())
    }
}

/// Serializes a submission sequence into the slot envelope.
pub fn encode_snapshot(submissions: &[ContactSubmission]) -> RepoResult<String> {
    let envelope = SnapshotEnvelopeRef {
        state: SnapshotStateRef { submissions },
        version: SNAPSHOT_VERSION,
    };
    serde_json::to_string(&envelope).map_err(RepoError::Encode)
}

/// Parses a slot envelope back into the submission sequence.
pub fn decode_snapshot(raw: &str) -> RepoResult<Vec<ContactSubmission>> {
    let envelope: SnapshotEnvelope = serde_json::from_str(raw).map_err(RepoError::Decode)?;
    Ok(envelope.state.submissions)
}
