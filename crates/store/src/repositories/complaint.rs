//! Complaint repository.

use std::sync::Arc;

use serde_json::Value;

use campuscare_common::{AppError, AppResult};

use crate::entities::{COMPLAINTS, Complaint, NewComplaint, Status};
use crate::gateway::{ChangeStream, DataStore, Document, Fields};

/// Complaint repository for store operations on the `complaints` collection.
#[derive(Clone)]
pub struct ComplaintRepository {
    store: Arc<dyn DataStore>,
}

impl ComplaintRepository {
    /// Create a new complaint repository.
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Insert a new complaint and return it with its store-assigned id.
    pub async fn create(&self, record: NewComplaint) -> AppResult<Complaint> {
        let fields = record.fields()?;
        let id = self.store.insert(COMPLAINTS, fields).await?;
        Ok(Complaint {
            id,
            student_id: record.student_id,
            student_name: record.student_name,
            department: record.department,
            category: record.category,
            priority: record.priority,
            title: record.title,
            description: record.description,
            status: record.status,
            date: record.date,
            timestamp: record.timestamp,
        })
    }

    /// Fetch a complaint by id, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Complaint> {
        let fields = self
            .store
            .get_by_id(COMPLAINTS, id)
            .await?
            .ok_or_else(|| AppError::ComplaintNotFound(id.to_string()))?;
        Complaint::from_document(Document {
            id: id.to_string(),
            fields,
        })
    }

    /// Fetch the full current complaint set. No pagination.
    pub async fn list_all(&self) -> AppResult<Vec<Complaint>> {
        let docs = self.store.list(COMPLAINTS).await?;
        docs.into_iter().map(Complaint::from_document).collect()
    }

    /// Fetch the complaints owned by one student.
    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<Complaint>> {
        let docs = self
            .store
            .query_equals(
                COMPLAINTS,
                "studentId",
                &Value::String(student_id.to_string()),
            )
            .await?;
        docs.into_iter().map(Complaint::from_document).collect()
    }

    /// Write a complaint's status back to the store.
    ///
    /// Last write wins; there is no optimistic concurrency token.
    pub async fn set_status(&self, id: &str, status: Status) -> AppResult<()> {
        let mut partial = Fields::new();
        partial.insert("status".to_string(), serde_json::to_value(status)?);
        self.store.update_by_id(COMPLAINTS, id, partial).await
    }

    /// Remove a complaint.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete_by_id(COMPLAINTS, id).await
    }

    /// Subscribe to change notifications on the complaints collection.
    #[must_use]
    pub fn watch(&self) -> ChangeStream {
        self.store.subscribe(COMPLAINTS)
    }
}
