//! Session store.
//!
//! Process-wide slot holding the currently authenticated identity, persisted
//! as JSON on disk so it survives restarts. Exactly one identity is active at
//! a time; there is no multi-session support.

use std::path::PathBuf;

use campuscare_common::{AppError, AppResult, Config};

use crate::services::identity::Identity;

/// Durable single-identity session slot.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a session store over an explicit slot path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a session store from the application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session.path.clone())
    }

    /// Persist an identity, replacing any prior value.
    pub async fn set_identity(&self, identity: &Identity) -> AppResult<()> {
        let json = serde_json::to_string(identity)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create directory: {e}")))?;
        }

        // Write-then-rename keeps the slot readable at every instant.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write session slot: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to replace session slot: {e}")))?;

        tracing::debug!(path = %self.path.display(), "Session identity persisted");
        Ok(())
    }

    /// Read the persisted identity, if any.
    ///
    /// A corrupt slot is cleared and reported as absent rather than failing
    /// the caller.
    pub async fn identity(&self) -> Option<Identity> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to read session slot");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt session slot, clearing");
                if let Err(clear_err) = self.clear().await {
                    clear_err.log();
                }
                None
            }
        }
    }

    /// Remove the persisted identity. An absent slot is not an error.
    pub async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to clear session slot: {e}"
            ))),
        }
    }
}
