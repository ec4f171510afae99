//! Document shapes of the persisted collections.

pub mod complaint;
pub mod user;

pub use complaint::{Complaint, NewComplaint, Priority, Status};
pub use user::{NewUser, User};

/// Name of the users collection.
pub const USERS: &str = "users";

/// Name of the complaints collection.
pub const COMPLAINTS: &str = "complaints";
