//! In-memory revocation backend for tests and embedded use.

use super::RevocationBackend;
use crate::errors::AuthError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Counter map behind a single mutex; increments are atomic with respect
/// to each other, matching the contract Redis `INCR` provides.
#[derive(Default)]
pub struct MemoryRevocationStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a counter directly, bypassing increments. Test setup only.
    pub async fn set(&self, key: &str, value: i64) {
        self.counters.lock().await.insert(key.to_string(), value);
    }
}

#[async_trait]
impl RevocationBackend for MemoryRevocationStore {
    async fn incr(&self, key: &str) -> Result<i64, AuthError> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, AuthError> {
        Ok(self.counters.lock().await.get(key).copied())
    }
}
