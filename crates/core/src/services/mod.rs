//! Business logic services.

#![allow(missing_docs)]

pub mod complaint;
pub mod dashboard;
pub mod identity;
pub mod session;

pub use complaint::{
    ComplaintService, NewComplaintInput, Scope, SortKey, StatusFilter, filter_by_status, search,
    sort,
};
pub use dashboard::{
    AdminDashboard, AdminStats, DashboardService, DashboardView, HeroStats, StudentDashboard,
    StudentStats, compute_admin_stats, compute_hero_stats, compute_student_stats,
};
pub use identity::{Identity, IdentityService, RegisterInput, Role};
pub use session::SessionStore;
