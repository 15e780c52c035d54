//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `Admin` role.
//! - [`rbac::RequireEditor`] -- Requires `Admin` or the `can_modify` grant.

pub mod auth;
pub mod rbac;
