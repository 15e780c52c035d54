//! Shared success envelope for API handlers.
//!
//! Every JSON response carries a top-level `success` flag. Successful payloads
//! are built with [`success`] so the flag and the payload fields sit side by
//! side: `{ "success": true, "client": {...} }`.

use axum::Json;
use serde_json::Value;

/// Wrap a JSON object payload in the `{ "success": true, ... }` envelope.
///
/// Non-object payloads are nested under `data`.
///
/// # Example
///
/// ```ignore
/// Ok(success(json!({ "client": client })))
/// ```
pub fn success(payload: Value) -> Json<Value> {
    let mut body = match payload {
        Value::Object(map) => Value::Object(map),
        other => serde_json::json!({ "data": other }),
    };
    body["success"] = Value::Bool(true);
    Json(body)
}
