//! Keypair, user and token fixtures.

use auth_service::crypto;
use auth_service::keys::KeyManager;
use auth_service::models::UserRecord;
use auth_service::permissions::{mask_of, AuthAction, AuthObject, PermissionMap};

/// PBKDF2 iteration count for fixtures; fast, never used in production.
pub const TEST_ITERATIONS: u32 = 1_000;

/// Bcrypt cost for fixtures; the minimum the service accepts.
pub const TEST_BCRYPT_COST: u32 = 10;

/// A fresh in-memory keypair. Every call generates a distinct pair.
pub fn key_manager() -> KeyManager {
    let (public_pem, private_der) =
        crypto::generate_signing_key().expect("keypair generation should succeed");
    KeyManager::from_keypair(&public_pem, &private_der)
        .expect("keypair construction should succeed")
}

/// Default fixture permissions: full control of users, read on roles.
pub fn default_permissions() -> PermissionMap {
    [
        (
            AuthObject::User,
            mask_of(&[
                AuthAction::Get,
                AuthAction::Add,
                AuthAction::Update,
                AuthAction::Delete,
            ]),
        ),
        (AuthObject::Role, mask_of(&[AuthAction::Get])),
    ]
    .into_iter()
    .collect()
}

/// Build a user record with a bcrypt-hashed password and sensible defaults.
/// Tests adjust fields as needed before inserting it into a directory.
pub fn user_record(id: &str, account: &str, password: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        account: account.to_string(),
        name: account.to_string(),
        password_hash: crypto::hash_password(password, TEST_BCRYPT_COST)
            .expect("password hashing should succeed"),
        password_reset: true,
        disabled: false,
        permissions: default_permissions(),
        department: "dep-1".to_string(),
        department_name: "Operations".to_string(),
        role: "role-1".to_string(),
        role_name: "Operator".to_string(),
        badge_number: "100001".to_string(),
        phone: "13800000000".to_string(),
    }
}

/// Produce one variant of `token` per byte position, each with that single
/// byte replaced by a different character from the base64 alphabet.
pub fn tamper_each_byte(token: &str) -> Vec<String> {
    (0..token.len())
        .map(|i| {
            let mut bytes = token.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            String::from_utf8(bytes).expect("tampered token should remain UTF-8")
        })
        .collect()
}
