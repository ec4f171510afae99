//! User repository.

use std::sync::Arc;

use serde_json::Value;

use campuscare_common::AppResult;

use crate::entities::{NewUser, USERS, User};
use crate::gateway::DataStore;

/// User repository for store operations on the `users` collection.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DataStore>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Insert a new user and return it with its store-assigned id.
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let fields = new_user.fields()?;
        let id = self.store.insert(USERS, fields).await?;
        Ok(User {
            id,
            name: new_user.name,
            username: new_user.username,
            password: new_user.password,
            department: new_user.department,
            created_at: new_user.created_at,
        })
    }

    /// Find a user by exact username.
    ///
    /// When duplicates exist (the uniqueness check is not atomic), the first
    /// match wins.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let hits = self
            .store
            .query_equals(USERS, "username", &Value::String(username.to_string()))
            .await?;
        hits.into_iter().next().map(User::from_document).transpose()
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let fields = self.store.get_by_id(USERS, id).await?;
        fields
            .map(|fields| {
                User::from_document(crate::gateway::Document {
                    id: id.to_string(),
                    fields,
                })
            })
            .transpose()
    }

    /// Count registered users.
    pub async fn count(&self) -> AppResult<usize> {
        Ok(self.store.list(USERS).await?.len())
    }
}
