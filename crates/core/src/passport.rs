//! Passport document upload rules.
//!
//! Uploads are accepted when either the declared MIME type or the file
//! extension is on the allow-list. Stored names never reuse the client's
//! original filename.

use crate::types::DbId;

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted file extensions (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// Accepted MIME types.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Who the uploaded document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Client,
    Traveler,
}

impl UploadTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Traveler => "traveler",
        }
    }

    /// Parse a target string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Self::Client),
            "traveler" => Some(Self::Traveler),
            _ => None,
        }
    }
}

/// Lowercase extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// Validate an upload and return the extension to store it under.
pub fn validate_upload(
    filename: &str,
    content_type: Option<&str>,
    size: usize,
) -> Result<String, String> {
    if size == 0 {
        return Err("Uploaded file is empty".to_string());
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(format!(
            "File too large. Maximum size is {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ));
    }

    let ext = extension_of(filename).filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()));
    let mime = content_type
        .map(|ct| ct.trim().to_lowercase())
        .filter(|ct| ALLOWED_MIME_TYPES.contains(&ct.as_str()));

    match (ext, mime) {
        (Some(ext), _) => Ok(ext),
        (None, Some(mime)) => extension_for_mime(&mime)
            .map(str::to_string)
            .ok_or_else(|| "Unsupported file type".to_string()),
        (None, None) => Err(format!(
            "Invalid file type. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )),
    }
}

/// Build the stored filename: `{target}_{client}[_{traveler}]_{millis}.{ext}`.
pub fn stored_filename(
    target: UploadTarget,
    client_id: DbId,
    traveler_id: Option<DbId>,
    timestamp_millis: i64,
    ext: &str,
) -> String {
    match traveler_id {
        Some(t) => format!(
            "{}_{client_id}_{t}_{timestamp_millis}.{ext}",
            target.as_str()
        ),
        None => format!("{}_{client_id}_{timestamp_millis}.{ext}", target.as_str()),
    }
}

/// Guess a Content-Type from a stored filename.
pub fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
