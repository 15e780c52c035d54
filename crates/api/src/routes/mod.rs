pub mod auth;
pub mod clients;
pub mod health;
pub mod intake;
pub mod stats;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /submit-form                                     intake submission (public)
/// /upload                                          passport upload (public)
///
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /clients                                         list (search, filters, paging)
/// /clients/export                                  CSV export
/// /clients/{id}                                    get, update, delete (501)
/// /clients/{id}/travelers                          list, add
/// /clients/{id}/note                               add note
/// /clients/{id}/notes                              list notes
/// /clients/{id}/history                            modification log
/// /clients/{id}/passport                           passport download
///
/// /stats                                           dashboard statistics
///
/// /users                                           list, create (admin only)
/// /users/{id}                                      get, update, delete
/// /users/{id}/reset-password                       reset password
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public intake endpoints.
        .merge(intake::router())
        // Authentication routes (login, me).
        .nest("/auth", auth::router())
        // Client records.
        .nest("/clients", clients::router())
        // Dashboard.
        .nest("/stats", stats::router())
        // User management (admin only).
        .nest("/users", users::router())
}
