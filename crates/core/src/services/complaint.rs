//! Complaint service.
//!
//! Owns the complaint lifecycle (submit, toggle, delete) and the pure
//! query helpers used to present complaint lists.

use campuscare_common::{AppError, AppResult};
use campuscare_store::ChangeStream;
use campuscare_store::entities::{Complaint, NewComplaint, Priority, Status};
use campuscare_store::repositories::ComplaintRepository;

use crate::services::identity::Identity;

/// Input for submitting a new complaint.
///
/// Required-field presence is the only validation: empty title and
/// description are accepted (carried-forward permissive behavior).
#[derive(Clone, Debug)]
pub struct NewComplaintInput {
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
}

/// Which complaints a listing covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Every complaint in the system (admin view).
    All,
    /// Complaints owned by one student.
    Student(String),
}

/// Status filter for presented lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Resolved,
}

/// Sort order for presented lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Timestamp descending.
    Newest,
    /// Timestamp ascending.
    Oldest,
    /// Lexicographic ascending on the status string, so "pending" groups
    /// before "resolved".
    Status,
}

/// Keep only the complaints matching a status filter, preserving order.
#[must_use]
pub fn filter_by_status(complaints: &[Complaint], filter: StatusFilter) -> Vec<Complaint> {
    let wanted = match filter {
        StatusFilter::All => return complaints.to_vec(),
        StatusFilter::Pending => Status::Pending,
        StatusFilter::Resolved => Status::Resolved,
    };
    complaints
        .iter()
        .filter(|c| c.status == wanted)
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, description, student name,
/// and category. An empty term matches everything.
#[must_use]
pub fn search(complaints: &[Complaint], term: &str) -> Vec<Complaint> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return complaints.to_vec();
    }
    complaints
        .iter()
        .filter(|c| {
            c.title.to_lowercase().contains(&term)
                || c.description.to_lowercase().contains(&term)
                || c.student_name.to_lowercase().contains(&term)
                || c.category.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Sort complaints in place. Stable for ties.
pub fn sort(complaints: &mut [Complaint], key: SortKey) {
    match key {
        SortKey::Newest => complaints.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortKey::Oldest => complaints.sort_by_key(|c| c.timestamp),
        SortKey::Status => complaints.sort_by_key(|c| c.status.as_str()),
    }
}

/// Complaint service for lifecycle operations.
#[derive(Clone)]
pub struct ComplaintService {
    complaints: ComplaintRepository,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub const fn new(complaints: ComplaintRepository) -> Self {
        Self { complaints }
    }

    /// Submit a new complaint owned by the given student.
    ///
    /// Status always starts pending; the creation instant and display date
    /// are stamped here. Student name and department come from the submitting
    /// identity.
    pub async fn submit(
        &self,
        owner: &Identity,
        input: NewComplaintInput,
    ) -> AppResult<Complaint> {
        let Identity::Student {
            id,
            name,
            department,
            ..
        } = owner
        else {
            return Err(AppError::Forbidden(
                "only students can submit complaints".to_string(),
            ));
        };

        let now = chrono::Local::now();
        let record = NewComplaint {
            student_id: id.clone(),
            student_name: name.clone(),
            department: department.clone(),
            category: input.category,
            priority: input.priority,
            title: input.title,
            description: input.description,
            status: Status::Pending,
            date: now.format("%-m/%-d/%Y").to_string(),
            timestamp: now.timestamp_millis(),
        };

        let complaint = self.complaints.create(record).await?;
        tracing::info!(
            id = %complaint.id,
            student_id = %complaint.student_id,
            "Complaint submitted"
        );
        Ok(complaint)
    }

    /// Fetch the current complaint set for a scope. Full set, no pagination.
    pub async fn list(&self, scope: &Scope) -> AppResult<Vec<Complaint>> {
        match scope {
            Scope::All => self.complaints.list_all().await,
            Scope::Student(id) => self.complaints.list_for_student(id).await,
        }
    }

    /// Flip a complaint between pending and resolved.
    ///
    /// Read-modify-write with no concurrency token: concurrent toggles are
    /// last-write-wins. Admin gating happens in the surrounding layer.
    pub async fn toggle_status(&self, id: &str) -> AppResult<Complaint> {
        let mut complaint = self.complaints.get_by_id(id).await?;
        let status = complaint.status.toggled();
        self.complaints.set_status(id, status).await?;
        complaint.status = status;
        tracing::info!(id, status = status.as_str(), "Complaint status toggled");
        Ok(complaint)
    }

    /// Delete a complaint on behalf of its owning student.
    ///
    /// The interaction boundary confirms with the user before calling this.
    pub async fn delete(&self, id: &str, requester_id: &str) -> AppResult<()> {
        let complaint = self.complaints.get_by_id(id).await?;
        if complaint.student_id != requester_id {
            return Err(AppError::Forbidden(
                "complaint belongs to another student".to_string(),
            ));
        }
        self.complaints.delete(id).await?;
        tracing::info!(id, "Complaint deleted");
        Ok(())
    }

    /// Subscribe to change notifications on the complaint set.
    #[must_use]
    pub fn watch(&self) -> ChangeStream {
        self.complaints.watch()
    }
}
