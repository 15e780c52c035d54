//! Domain vocabulary and pure rules for the Cardex client intake service.
//!
//! Nothing in this crate touches the database or the network.

pub mod audit;
pub mod client;
pub mod error;
pub mod export;
pub mod intake;
pub mod notes;
pub mod pagination;
pub mod passport;
pub mod roles;
pub mod types;
