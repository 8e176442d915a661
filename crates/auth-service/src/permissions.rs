//! Bitmask permission model.
//!
//! Capability objects and actions are closed enums with stable wire ids, so
//! a miswired object/action bit position is a compile error rather than a
//! silent integer mismatch. A session carries one action bitmask per
//! capability object; multiple permitted actions are OR-ed into that
//! object's mask. Objects are never merged into a single mask.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capability object: a coarse resource/feature domain subject to
/// permission checks. Wire ids are stable and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AuthObject {
    /// Cross-department capability. Callers lacking it must additionally
    /// satisfy a department-scope predicate supplied by the calling layer;
    /// this module only supplies the base bitmask check.
    CrossDepartment = 1,
    LogoLibrary = 4,
    FaceLibrary = 6,
    ImageLibrary = 8,
    KeywordLibrary = 10,
    Department = 17,
    Role = 18,
    User = 19,
}

impl From<AuthObject> for u8 {
    fn from(obj: AuthObject) -> u8 {
        obj as u8
    }
}

impl TryFrom<u8> for AuthObject {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(AuthObject::CrossDepartment),
            4 => Ok(AuthObject::LogoLibrary),
            6 => Ok(AuthObject::FaceLibrary),
            8 => Ok(AuthObject::ImageLibrary),
            10 => Ok(AuthObject::KeywordLibrary),
            17 => Ok(AuthObject::Department),
            18 => Ok(AuthObject::Role),
            19 => Ok(AuthObject::User),
            other => Err(format!("unknown auth object id: {}", other)),
        }
    }
}

/// Action category within a capability object. Each variant is a single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum AuthAction {
    Get = 1,
    Add = 2,
    Update = 4,
    Delete = 8,
    Download = 16,
    Upload = 32,
    Feedback = 64,
}

impl AuthAction {
    pub fn bit(self) -> u64 {
        self as u64
    }
}

/// OR a set of actions into a stored mask.
pub fn mask_of(actions: &[AuthAction]) -> u64 {
    actions.iter().fold(0, |mask, action| mask | action.bit())
}

/// Per-session permission set: one action bitmask per capability object.
pub type PermissionMap = HashMap<AuthObject, u64>;

/// A single route-declared requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub object: AuthObject,
    pub action: AuthAction,
}

impl Requirement {
    pub const fn new(object: AuthObject, action: AuthAction) -> Self {
        Self { object, action }
    }
}

/// Check that every requirement holds against the permission map.
///
/// A requirement holds iff the object has an entry and the stored mask
/// shares the action's bit. Logical AND over the list, short-circuiting on
/// the first failure; the empty list holds vacuously.
pub fn check(permissions: &PermissionMap, requirements: &[Requirement]) -> bool {
    requirements.iter().all(|req| {
        permissions
            .get(&req.object)
            .is_some_and(|mask| mask & req.action.bit() != 0)
    })
}

/// Whether the session holds the designated cross-department capability.
pub fn has_cross_department(permissions: &PermissionMap) -> bool {
    permissions
        .get(&AuthObject::CrossDepartment)
        .is_some_and(|mask| *mask != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(AuthObject, &[AuthAction])]) -> PermissionMap {
        entries
            .iter()
            .map(|(obj, actions)| (*obj, mask_of(actions)))
            .collect()
    }

    #[test]
    fn empty_requirements_hold_vacuously() {
        assert!(check(&PermissionMap::new(), &[]));
    }

    #[test]
    fn requirement_holds_iff_bit_set() {
        let perms = map(&[(AuthObject::User, &[AuthAction::Get, AuthAction::Update])]);

        assert!(check(
            &perms,
            &[Requirement::new(AuthObject::User, AuthAction::Get)]
        ));
        assert!(check(
            &perms,
            &[Requirement::new(AuthObject::User, AuthAction::Update)]
        ));
        assert!(!check(
            &perms,
            &[Requirement::new(AuthObject::User, AuthAction::Delete)]
        ));
    }

    #[test]
    fn missing_object_fails() {
        let perms = map(&[(AuthObject::User, &[AuthAction::Get])]);
        assert!(!check(
            &perms,
            &[Requirement::new(AuthObject::Role, AuthAction::Get)]
        ));
    }

    #[test]
    fn objects_are_not_merged() {
        // A bit set under one object must not satisfy another object.
        let perms = map(&[(AuthObject::Role, &[AuthAction::Delete])]);
        assert!(!check(
            &perms,
            &[Requirement::new(AuthObject::User, AuthAction::Delete)]
        ));
    }

    #[test]
    fn all_requirements_must_hold() {
        let perms = map(&[
            (AuthObject::User, &[AuthAction::Get]),
            (AuthObject::Role, &[AuthAction::Get]),
        ]);

        assert!(check(
            &perms,
            &[
                Requirement::new(AuthObject::User, AuthAction::Get),
                Requirement::new(AuthObject::Role, AuthAction::Get),
            ]
        ));
        assert!(!check(
            &perms,
            &[
                Requirement::new(AuthObject::User, AuthAction::Get),
                Requirement::new(AuthObject::Role, AuthAction::Add),
            ]
        ));
    }

    #[test]
    fn cross_department_detection() {
        assert!(!has_cross_department(&PermissionMap::new()));

        let perms = map(&[(AuthObject::CrossDepartment, &[AuthAction::Get])]);
        assert!(has_cross_department(&perms));

        // An entry with an empty mask does not grant the capability.
        let empty: PermissionMap = [(AuthObject::CrossDepartment, 0u64)].into_iter().collect();
        assert!(!has_cross_department(&empty));
    }

    #[test]
    fn wire_ids_survive_serde() {
        let json = serde_json::to_string(&AuthObject::User).unwrap();
        assert_eq!(json, "19");
        let back: AuthObject = serde_json::from_str("19").unwrap();
        assert_eq!(back, AuthObject::User);

        assert!(serde_json::from_str::<AuthObject>("42").is_err());
    }

    #[test]
    fn permission_map_serializes_with_numeric_keys() {
        let perms = map(&[(AuthObject::User, &[AuthAction::Get, AuthAction::Add])]);
        let json = serde_json::to_string(&perms).unwrap();
        assert_eq!(json, r#"{"19":3}"#);

        let back: PermissionMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, perms);
    }
}
