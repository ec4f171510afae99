//! User entity.
//!
//! Persisted layout: `users{name, username, password, department, createdAt}`
//! with the id assigned by the store.

use serde::{Deserialize, Serialize};

use campuscare_common::{AppError, AppResult};

use crate::gateway::{Document, Fields};

/// A registered student account.
///
/// Created at signup and immutable afterwards; accounts are never deleted.
/// The password is stored verbatim (carried-forward legacy behavior).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned id (not a document field).
    #[serde(skip)]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login name, unique across the collection.
    pub username: String,

    /// Plaintext password.
    pub password: String,

    /// Department the student belongs to.
    pub department: String,

    /// Creation instant, RFC 3339.
    pub created_at: String,
}

/// Fields of a user about to be inserted.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub department: String,
    pub created_at: String,
}

impl User {
    /// Hydrate a user from a fetched document.
    pub fn from_document(doc: Document) -> AppResult<Self> {
        let mut user: Self = serde_json::from_value(serde_json::Value::Object(doc.fields))?;
        user.id = doc.id;
        Ok(user)
    }
}

impl NewUser {
    /// Serialize into the field map handed to the store.
    pub fn fields(&self) -> AppResult<Fields> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields),
            other => Err(AppError::Serialization(format!(
                "user serialized to a non-object value: {other}"
            ))),
        }
    }
}
