//! File-backed user directory.
//!
//! The real user store is an external collaborator; this shim loads a JSON
//! snapshot of user records at startup so the service is runnable on its
//! own. Password updates are applied in memory only — durable persistence
//! of business entities is out of scope here.

use crate::errors::AuthError;
use crate::models::UserRecord;
use crate::services::session_service::UserDirectory;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{error, info};

pub struct StaticDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl StaticDirectory {
    pub fn from_records(records: Vec<UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Load a JSON array of user records.
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to read user directory");
            AuthError::Internal
        })?;

        let records: Vec<UserRecord> = serde_json::from_str(&raw).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to parse user directory");
            AuthError::Internal
        })?;

        info!(user_count = records.len(), "user directory loaded");
        Ok(Self::from_records(records))
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn find_by_account(&self, account: &str) -> Result<Option<UserRecord>, AuthError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.account == account).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AuthError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or(AuthError::Unauthorized)?;
        user.password_hash = password_hash.to_string();
        user.password_reset = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionMap;

    fn record(id: &str, account: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            account: account.to_string(),
            name: account.to_string(),
            password_hash: "$2b$10$placeholderplaceholderplaceholderplacehold".to_string(),
            password_reset: false,
            disabled: false,
            permissions: PermissionMap::new(),
            department: String::new(),
            department_name: String::new(),
            role: String::new(),
            role_name: String::new(),
            badge_number: String::new(),
            phone: String::new(),
        }
    }

    #[tokio::test]
    async fn lookup_by_account_and_id() {
        let directory = StaticDirectory::from_records(vec![record("u1", "alice")]);

        assert!(directory.find_by_account("alice").await.unwrap().is_some());
        assert!(directory.find_by_account("bob").await.unwrap().is_none());
        assert!(directory.find_by_id("u1").await.unwrap().is_some());
        assert!(directory.find_by_id("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_password_marks_reset() {
        let directory = StaticDirectory::from_records(vec![record("u1", "alice")]);
        directory.update_password("u1", "$2b$10$newhash").await.unwrap();

        let user = directory.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "$2b$10$newhash");
        assert!(user.password_reset);
    }

    #[tokio::test]
    async fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let records = vec![record("u1", "alice")];
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let directory = StaticDirectory::from_file(&path).unwrap();
        assert!(directory.find_by_account("alice").await.unwrap().is_some());
    }
}
