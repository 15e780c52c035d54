//! Route definitions for the `/clients` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// Reads require authentication; `PUT` and traveler creation require the
/// `can_modify` grant or the `Admin` role.
///
/// ```text
/// GET    /                  -> list_clients
/// GET    /export            -> export_clients
/// GET    /{id}              -> get_client
/// PUT    /{id}              -> update_client
/// DELETE /{id}              -> delete_client (501)
/// GET    /{id}/travelers    -> list_travelers
/// POST   /{id}/travelers    -> add_traveler
/// POST   /{id}/note         -> add_note
/// GET    /{id}/notes        -> list_notes
/// GET    /{id}/history      -> get_history
/// GET    /{id}/passport     -> download_passport
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list_clients))
        .route("/export", get(clients::export_clients))
        .route(
            "/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/{id}/travelers",
            get(clients::list_travelers).post(clients::add_traveler),
        )
        .route("/{id}/note", post(clients::add_note))
        .route("/{id}/notes", get(clients::list_notes))
        .route("/{id}/history", get(clients::get_history))
        .route("/{id}/passport", get(clients::download_passport))
}
