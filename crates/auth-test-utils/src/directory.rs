//! In-memory `UserDirectory` implementation for tests.

use crate::fixtures;
use async_trait::async_trait;
use auth_service::errors::AuthError;
use auth_service::models::UserRecord;
use auth_service::services::session_service::UserDirectory;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory seeded with a single user. The user id is
    /// `"<account>-id"`, the password bcrypt-hashed at the fixture cost.
    pub fn with_user(account: &str, password: &str) -> Self {
        let record = fixtures::user_record(&format!("{account}-id"), account, password);
        let mut users = HashMap::new();
        users.insert(record.id.clone(), record);
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn insert(&self, record: UserRecord) {
        self.users.write().await.insert(record.id.clone(), record);
    }

    pub async fn disable(&self, account: &str) {
        let mut users = self.users.write().await;
        if let Some(user) = users.values_mut().find(|u| u.account == account) {
            user.disabled = true;
        }
    }

    pub async fn set_password_reset(&self, account: &str, value: bool) {
        let mut users = self.users.write().await;
        if let Some(user) = users.values_mut().find(|u| u.account == account) {
            user.password_reset = value;
        }
    }

    pub async fn set_permissions(
        &self,
        account: &str,
        permissions: auth_service::permissions::PermissionMap,
    ) {
        let mut users = self.users.write().await;
        if let Some(user) = users.values_mut().find(|u| u.account == account) {
            user.permissions = permissions;
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
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
