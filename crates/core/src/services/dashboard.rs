//! Dashboard aggregation.
//!
//! Statistics are derived, never stored: every dashboard entry point
//! recomputes from the full current complaint set, and consumers of the
//! change stream re-enter after each notification. No incremental patching.

use serde::Serialize;

use campuscare_common::AppResult;
use campuscare_store::ChangeStream;
use campuscare_store::entities::{Complaint, Status};
use campuscare_store::repositories::{ComplaintRepository, UserRepository};

use crate::services::identity::Identity;

/// System-wide counts for the administrator dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub student_count: usize,
}

/// Per-student counts and resolution rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    /// round(resolved / total × 100); 0 when there are no complaints.
    pub resolution_rate: u8,
}

/// Public pre-login counters for the landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStats {
    pub total_complaints: usize,
    pub student_count: usize,
    /// round(resolved / total × 100); 0 when there are no complaints.
    pub success_rate: u8,
}

/// Administrator dashboard projection.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub complaints: Vec<Complaint>,
}

/// Student dashboard projection.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub stats: StudentStats,
    pub complaints: Vec<Complaint>,
}

/// The dashboard for whichever identity entered.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardView {
    Admin(AdminDashboard),
    Student(StudentDashboard),
}

fn count_by_status(complaints: &[Complaint]) -> (usize, usize) {
    let pending = complaints
        .iter()
        .filter(|c| c.status == Status::Pending)
        .count();
    let resolved = complaints
        .iter()
        .filter(|c| c.status == Status::Resolved)
        .count();
    (pending, resolved)
}

fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Compute administrator statistics over the full complaint set.
#[must_use]
pub fn compute_admin_stats(complaints: &[Complaint], student_count: usize) -> AdminStats {
    let (pending, resolved) = count_by_status(complaints);
    AdminStats {
        total: complaints.len(),
        pending,
        resolved,
        student_count,
    }
}

/// Compute a student's statistics over their owned complaints.
#[must_use]
pub fn compute_student_stats(complaints: &[Complaint]) -> StudentStats {
    let (pending, resolved) = count_by_status(complaints);
    StudentStats {
        total: complaints.len(),
        pending,
        resolved,
        resolution_rate: percentage(resolved, complaints.len()),
    }
}

/// Compute the public landing-page counters.
#[must_use]
pub fn compute_hero_stats(complaints: &[Complaint], student_count: usize) -> HeroStats {
    let (_, resolved) = count_by_status(complaints);
    HeroStats {
        total_complaints: complaints.len(),
        student_count,
        success_rate: percentage(resolved, complaints.len()),
    }
}

/// Dashboard service producing full projections from current store state.
#[derive(Clone)]
pub struct DashboardService {
    complaints: ComplaintRepository,
    users: UserRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(complaints: ComplaintRepository, users: UserRepository) -> Self {
        Self { complaints, users }
    }

    /// Explicit dashboard entry point for an authenticated identity.
    ///
    /// Call this when the presentation layer routes to a dashboard, and call
    /// it again on every change notification from [`Self::watch`].
    pub async fn enter(&self, identity: &Identity) -> AppResult<DashboardView> {
        match identity {
            Identity::Admin { .. } => Ok(DashboardView::Admin(self.admin_dashboard().await?)),
            Identity::Student { id, .. } => {
                Ok(DashboardView::Student(self.student_dashboard(id).await?))
            }
        }
    }

    /// Full administrator projection: stats plus the complete complaint list.
    pub async fn admin_dashboard(&self) -> AppResult<AdminDashboard> {
        // Independent reads, issued concurrently and awaited jointly.
        let (complaints, student_count) =
            tokio::try_join!(self.complaints.list_all(), self.users.count())?;

        tracing::debug!(
            total = complaints.len(),
            student_count,
            "Admin dashboard refreshed"
        );
        Ok(AdminDashboard {
            stats: compute_admin_stats(&complaints, student_count),
            complaints,
        })
    }

    /// Full student projection over the complaints they own.
    pub async fn student_dashboard(&self, student_id: &str) -> AppResult<StudentDashboard> {
        let complaints = self.complaints.list_for_student(student_id).await?;

        tracing::debug!(
            student_id,
            total = complaints.len(),
            "Student dashboard refreshed"
        );
        Ok(StudentDashboard {
            stats: compute_student_stats(&complaints),
            complaints,
        })
    }

    /// Public landing-page counters.
    pub async fn hero_stats(&self) -> AppResult<HeroStats> {
        let (complaints, student_count) =
            tokio::try_join!(self.complaints.list_all(), self.users.count())?;
        Ok(compute_hero_stats(&complaints, student_count))
    }

    /// Subscribe to complaint-set change notifications.
    ///
    /// Each item means "refetch": re-enter the dashboard to rebuild the full
    /// projection. A notification triggered by a local mutation repeats work
    /// already done; the recompute is idempotent, so that is harmless.
    #[must_use]
    pub fn watch(&self) -> ChangeStream {
        self.complaints.watch()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campuscare_store::entities::Priority;

    fn complaint(status: Status) -> Complaint {
        Complaint {
            id: "c".to_string(),
            student_id: "u1".to_string(),
            student_name: "Ann".to_string(),
            department: "CS".to_string(),
            category: "Internet".to_string(),
            priority: Priority::High,
            title: "Wifi down".to_string(),
            description: "desc".to_string(),
            status,
            date: "8/7/2026".to_string(),
            timestamp: 1,
        }
    }

    #[test]
    fn test_rate_is_zero_on_empty_set() {
        let stats = compute_student_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.resolution_rate, 0);
    }

    #[test]
    fn test_rate_stays_in_bounds() {
        for resolved in 0..=7usize {
            let set: Vec<Complaint> = (0..7)
                .map(|i| {
                    complaint(if i < resolved {
                        Status::Resolved
                    } else {
                        Status::Pending
                    })
                })
                .collect();
            let stats = compute_student_stats(&set);
            assert!(stats.resolution_rate <= 100);
        }
    }

    #[test]
    fn test_single_resolved_complaint_is_full_rate() {
        let stats = compute_student_stats(&[complaint(Status::Resolved)]);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.resolution_rate, 100);
    }

    #[test]
    fn test_rate_rounds_to_nearest() {
        // 1 of 3 resolved: 33.33…% rounds to 33.
        let set = vec![
            complaint(Status::Resolved),
            complaint(Status::Pending),
            complaint(Status::Pending),
        ];
        assert_eq!(compute_student_stats(&set).resolution_rate, 33);

        // 2 of 3 resolved: 66.66…% rounds to 67.
        let set = vec![
            complaint(Status::Resolved),
            complaint(Status::Resolved),
            complaint(Status::Pending),
        ];
        assert_eq!(compute_student_stats(&set).resolution_rate, 67);
    }

    #[test]
    fn test_admin_stats_counts() {
        let set = vec![
            complaint(Status::Pending),
            complaint(Status::Resolved),
            complaint(Status::Pending),
        ];
        let stats = compute_admin_stats(&set, 12);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.student_count, 12);
    }

    #[test]
    fn test_hero_stats_on_empty_store() {
        let stats = compute_hero_stats(&[], 0);
        assert_eq!(stats.total_complaints, 0);
        assert_eq!(stats.student_count, 0);
        assert_eq!(stats.success_rate, 0);
    }
}
