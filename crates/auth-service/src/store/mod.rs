//! Session revocation store.
//!
//! Every identity has a monotonic counter in an external store; a token is
//! acceptable only while its embedded version equals the current counter.
//! Bumping the counter on any credential-affecting event (login, password
//! change/reset, logout) revokes every outstanding token for that identity
//! in O(1), without a token blacklist. The trade-off is strictly
//! all-or-nothing: there is no per-device revocation.

mod memory;
mod redis;

pub use memory::MemoryRevocationStore;
pub use redis::RedisRevocationStore;

use crate::errors::AuthError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const KEY_PREFIX: &str = "user_version";

/// Atomic counter primitive the store is built on.
///
/// `incr` must be atomic on the backend side: a read-modify-write here
/// would lose updates between a password-change bump and a concurrent
/// login.
#[async_trait]
pub trait RevocationBackend: Send + Sync {
    /// Atomically increment the counter and return the new value.
    /// Backends start absent keys at zero, so the first increment yields 1.
    async fn incr(&self, key: &str) -> Result<i64, AuthError>;

    /// Read the counter. `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<i64>, AuthError>;
}

/// Per-identity revocation counters over a [`RevocationBackend`].
///
/// Every backend round trip is bounded by the configured timeout. An
/// unreachable store is never interpreted as "no revocation in effect":
/// validation fails closed.
#[derive(Clone)]
pub struct SessionRevocationStore {
    backend: Arc<dyn RevocationBackend>,
    timeout: Duration,
}

impl SessionRevocationStore {
    pub fn new(backend: Arc<dyn RevocationBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    fn key(identity_id: &str) -> String {
        format!("{}_{}", KEY_PREFIX, identity_id)
    }

    /// Advance the identity's counter, invalidating every outstanding token.
    ///
    /// Invoked on every credential-affecting event. Failure here is an
    /// infrastructure error: without a fresh version no new session can be
    /// issued.
    pub async fn bump(&self, identity_id: &str) -> Result<i64, AuthError> {
        let key = Self::key(identity_id);
        let new_version = tokio::time::timeout(self.timeout, self.backend.incr(&key))
            .await
            .map_err(|_| AuthError::Store("revocation store timeout on incr".to_string()))??;

        debug!(
            target: "auth.revocation",
            identity_id = %identity_id,
            new_version = new_version,
            "bumped session version"
        );
        Ok(new_version)
    }

    /// Read the identity's current counter. `None` when no session was ever
    /// established.
    pub async fn current_version(&self, identity_id: &str) -> Result<Option<i64>, AuthError> {
        let key = Self::key(identity_id);
        tokio::time::timeout(self.timeout, self.backend.get(&key))
            .await
            .map_err(|_| AuthError::Store("revocation store timeout on get".to_string()))?
    }

    /// Equality test against the current counter.
    ///
    /// Fail closed: a store miss, error or timeout is treated as invalid,
    /// never as "no revocation in effect".
    pub async fn is_valid(&self, identity_id: &str, presented_version: i64) -> bool {
        match self.current_version(identity_id).await {
            Ok(Some(current)) => current == presented_version,
            Ok(None) => {
                debug!(
                    target: "auth.revocation",
                    identity_id = %identity_id,
                    "no session version recorded, treating token as invalid"
                );
                false
            }
            Err(e) => {
                warn!(
                    target: "auth.revocation",
                    identity_id = %identity_id,
                    error = %e,
                    "revocation store unavailable, failing closed"
                );
                false
            }
        }
    }
}
