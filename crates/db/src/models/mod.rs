//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where rows are mutable

pub mod client;
pub mod modification_log;
pub mod note;
pub mod stats;
pub mod traveler;
pub mod user;
