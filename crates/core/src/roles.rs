//! Well-known admin role names.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260101000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_MANAGER: &str = "Manager";
pub const ROLE_USER: &str = "User";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_USER];

/// Role assigned when a user is created without an explicit role.
pub const DEFAULT_ROLE: &str = ROLE_USER;

/// Validate that a role name is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Whether a user may edit client records.
///
/// Admins always can; everyone else needs the explicit `can_modify` grant.
pub fn can_modify_clients(role: &str, can_modify: bool) -> bool {
    role == ROLE_ADMIN || can_modify
}
