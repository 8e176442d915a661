//! Redis revocation backend.
//!
//! `INCR` is atomic server-side, which is exactly the primitive the
//! revocation protocol needs. The multiplexed connection is cheap to clone
//! and safe for concurrent use; no locking is required here.

use super::RevocationBackend;
use crate::errors::AuthError;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::error;

#[derive(Clone)]
pub struct RedisRevocationStore {
    connection: MultiplexedConnection,
}

impl RedisRevocationStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the client cannot be created or the
    /// connection cannot be established.
    pub async fn connect(redis_url: &str) -> Result<Self, AuthError> {
        let client = Client::open(redis_url).map_err(|e| {
            // Do NOT log redis_url, it may contain credentials.
            error!(
                target: "auth.revocation.redis",
                error = %e,
                "failed to open Redis client"
            );
            AuthError::Store(format!("failed to open Redis client: {e}"))
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!(
                    target: "auth.revocation.redis",
                    error = %e,
                    "failed to connect to Redis"
                );
                AuthError::Store(format!("failed to connect to Redis: {e}"))
            })?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl RevocationBackend for RedisRevocationStore {
    async fn incr(&self, key: &str) -> Result<i64, AuthError> {
        let mut conn = self.connection.clone();
        conn.incr(key, 1)
            .await
            .map_err(|e| AuthError::Store(format!("INCR failed: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, AuthError> {
        let mut conn = self.connection.clone();
        conn.get(key)
            .await
            .map_err(|e| AuthError::Store(format!("GET failed: {e}")))
    }
}
