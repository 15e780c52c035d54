//! Public routes used by the intake form.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use cardex_core::passport::MAX_UPLOAD_BYTES;

use crate::handlers::{submission, upload};
use crate::state::AppState;

/// Multipart framing allowance on top of the document itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Public routes merged at the `/api` root.
///
/// ```text
/// POST /submit-form  -> submit_form
/// POST /upload       -> upload_passport (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit-form", post(submission::submit_form))
        .route(
            "/upload",
            post(upload::upload_passport)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
}
