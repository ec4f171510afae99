//! Identity service.
//!
//! Resolves login attempts to a session identity and registers new student
//! accounts. The service itself is stateless; persisting the resulting
//! identity is the session store's job.

use serde::{Deserialize, Serialize};

use campuscare_common::{AppError, AppResult};
use campuscare_store::entities::NewUser;
use campuscare_store::repositories::UserRepository;

// Hardcoded admin credentials (fixed shared secret, carried forward).
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

/// The role a login attempt claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

/// The authenticated principal for the current session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Identity {
    /// The fixed administrator account.
    Admin { username: String },
    /// A registered student.
    #[serde(rename_all = "camelCase")]
    Student {
        id: String,
        name: String,
        username: String,
        department: String,
    },
}

impl Identity {
    /// Human-readable name for greetings and banners.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Admin { .. } => "Administrator",
            Self::Student { name, .. } => name,
        }
    }

    /// Whether this identity is the administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// The student's user id, if this is a student identity.
    #[must_use]
    pub fn student_id(&self) -> Option<&str> {
        match self {
            Self::Admin { .. } => None,
            Self::Student { id, .. } => Some(id),
        }
    }
}

/// Input for registering a new student account.
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub password: String,
    pub department: String,
}

/// Identity service for login and signup.
#[derive(Clone)]
pub struct IdentityService {
    users: UserRepository,
}

impl IdentityService {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Resolve a login attempt to an identity.
    ///
    /// Admin logins succeed only on an exact match against the fixed
    /// credential pair. Student logins look the username up in the store and
    /// compare the stored password verbatim (no hashing, carried forward).
    pub async fn authenticate(
        &self,
        role: Role,
        username: &str,
        password: &str,
    ) -> AppResult<Identity> {
        match role {
            Role::Admin => {
                if username == ADMIN_USERNAME && password == ADMIN_PASSWORD {
                    tracing::info!(username, "Admin login successful");
                    Ok(Identity::Admin {
                        username: username.to_string(),
                    })
                } else {
                    Err(AppError::InvalidAdminCredentials)
                }
            }
            Role::Student => {
                let user = self
                    .users
                    .find_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

                if user.password != password {
                    return Err(AppError::PasswordMismatch);
                }

                tracing::info!(username, "Student login successful");
                Ok(Identity::Student {
                    id: user.id,
                    name: user.name,
                    username: user.username,
                    department: user.department,
                })
            }
        }
    }

    /// Register a new student account and return its store-assigned id.
    ///
    /// The uniqueness check queries before inserting and is not atomic:
    /// concurrent registrations with the same username can both pass the
    /// lookup. Known race, accepted at this layer.
    pub async fn register(&self, input: RegisterInput) -> AppResult<String> {
        if self
            .users
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::UsernameTaken(input.username));
        }

        let user = self
            .users
            .create(NewUser {
                name: input.name,
                username: input.username,
                password: input.password,
                department: input.department,
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await?;

        tracing::info!(username = %user.username, id = %user.id, "User registered");
        Ok(user.id)
    }
}
