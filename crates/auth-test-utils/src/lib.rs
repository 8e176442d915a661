//! Test utilities for the account auth service.
//!
//! Provides keypair fixtures, token tampering helpers and an in-memory
//! user directory. Helpers unwrap freely: a broken fixture should fail the
//! test loudly.

pub mod directory;
pub mod fixtures;
