//! Contact submission domain model.
//!
//! # Responsibility
//! - Define the canonical record captured from the public contact form.
//! - Keep the serialized shape compatible with snapshots written by the web
//!   deployment (`camelCase` keys).
//!
//! # Invariants
//! - `id` is unique within one store and never reused.
//! - `created_at` is an RFC 3339 UTC timestamp assigned at creation.
//! - Fields are free text; no format validation happens here.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a stored submission.
///
/// Kept as a string so snapshots with non-UUID ids still load.
pub type SubmissionId = String;

/// Fields a visitor may supply through the contact form.
///
/// `id` and `created_at` are deliberately absent: the store assigns them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Caller-supplied category label, e.g. `retail`.
    pub business_field: String,
}

impl ContactFormData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        business_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            business_field: business_field.into(),
        }
    }
}

/// One contact-form record captured by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: SubmissionId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_field: String,
    /// ISO-8601 creation time, serialized as `createdAt`.
    pub created_at: String,
}

impl ContactSubmission {
    /// Builds a record from form input with a fresh id and the current time.
    pub fn from_form(input: ContactFormData) -> Self {
        Self::from_form_at(new_submission_id(), Utc::now(), input)
    }

    /// Builds a record with caller-chosen identity and creation time.
    ///
    /// Used by the store when it has to re-draw a colliding id, and by tests
    /// that need deterministic timestamps.
    pub fn from_form_at(
        id: SubmissionId,
        created_at: DateTime<Utc>,
        input: ContactFormData,
    ) -> Self {
        let ContactFormData {
            name,
            email,
            phone,
            business_field,
        } = input;

        Self {
            id,
            name,
            email,
            phone,
            business_field,
            created_at: format_timestamp(created_at),
        }
    }

    /// Parses `created_at` back into a UTC timestamp.
    ///
    /// Returns `None` when a rehydrated record carries an unparseable value.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }

    /// Returns the caller-supplied part of this record.
    pub fn form_data(&self) -> ContactFormData {
        ContactFormData {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            business_field: self.business_field.clone(),
        }
    }
}

/// Generates a new random submission id.
pub fn new_submission_id() -> SubmissionId {
    Uuid::new_v4().to_string()
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
