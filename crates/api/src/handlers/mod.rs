//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `cardex_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod clients;
pub mod stats;
pub mod submission;
pub mod upload;
pub mod users;
