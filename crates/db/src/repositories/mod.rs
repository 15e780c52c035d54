//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument. Multi-row writes run in
//! a single transaction.

pub mod client_repo;
pub mod modification_log_repo;
pub mod note_repo;
pub mod stats_repo;
pub mod traveler_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use modification_log_repo::ModificationLogRepo;
pub use note_repo::NoteRepo;
pub use stats_repo::StatsRepo;
pub use traveler_repo::TravelerRepo;
pub use user_repo::UserRepo;
