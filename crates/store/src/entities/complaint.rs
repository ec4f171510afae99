//! Complaint entity.
//!
//! Persisted layout: `complaints{studentId, studentName, department, category,
//! priority, title, description, status, date, timestamp}` with the id
//! assigned by the store.

use serde::{Deserialize, Serialize};

use campuscare_common::{AppError, AppResult};

use crate::gateway::{Document, Fields};

/// Complaint priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Complaint lifecycle state.
///
/// The two-value domain is the whole invariant: a complaint is either
/// pending or resolved, nothing else, ever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Resolved,
}

impl Status {
    /// The other state; toggling twice restores the original.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Resolved,
            Self::Resolved => Self::Pending,
        }
    }

    /// The persisted string form, also used for lexicographic status sorting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

/// A student-submitted complaint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Store-assigned id (not a document field).
    #[serde(skip)]
    pub id: String,

    /// Owning student's user id; set once at creation, never reassigned.
    pub student_id: String,

    /// Owner's display name at submission time.
    pub student_name: String,

    pub department: String,
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub status: Status,

    /// Display date string, formatted at creation.
    pub date: String,

    /// Creation instant in milliseconds; immutable after creation.
    pub timestamp: i64,
}

/// Fields of a complaint about to be inserted.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    pub student_id: String,
    pub student_name: String,
    pub department: String,
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub date: String,
    pub timestamp: i64,
}

impl Complaint {
    /// Hydrate a complaint from a fetched document.
    pub fn from_document(doc: Document) -> AppResult<Self> {
        let mut complaint: Self =
            serde_json::from_value(serde_json::Value::Object(doc.fields))?;
        complaint.id = doc.id;
        Ok(complaint)
    }
}

impl NewComplaint {
    /// Serialize into the field map handed to the store.
    pub fn fields(&self) -> AppResult<Fields> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields),
            other => Err(AppError::Serialization(format!(
                "complaint serialized to a non-object value: {other}"
            ))),
        }
    }
}
