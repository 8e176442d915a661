//! Account authentication and authorization service library.
//!
//! The core is the session engine: issuance and verification of signed
//! session tokens, instant cross-device revocation through per-identity
//! counters, and a bitmask permission model gating actions.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Cryptographic operations (token signing, key wrapping)
//! - `directory` - File-backed user directory shim
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `keys` - Signing keypair lifecycle
//! - `middleware` - Authentication and authorization filters
//! - `models` - Session and user data models
//! - `permissions` - Bitmask permission model
//! - `routes` - Route table
//! - `services` - Business logic layer
//! - `store` - Session revocation store

pub mod config;
pub mod crypto;
pub mod directory;
pub mod errors;
pub mod handlers;
pub mod keys;
pub mod middleware;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod services;
pub mod store;
