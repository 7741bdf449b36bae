use thiserror::Error;

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content type stored when neither the client nor the filename tells us better.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Reasons an uploaded payload is rejected before anything is stored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("empty payload")]
    Empty,

    #[error("payload too large ({actual} > {limit} bytes)")]
    TooLarge { actual: usize, limit: usize },
}

/// Accept `data` only if `0 < len <= limit`.
pub fn validate_upload(data: &[u8], limit: usize) -> Result<(), UploadError> {
    match data.len() {
        0 => Err(UploadError::Empty),
        actual if actual > limit => Err(UploadError::TooLarge { actual, limit }),
        _ => Ok(()),
    }
}

/// Pick the content type to store for an upload.
///
/// The client-declared type wins; otherwise the type is guessed from the
/// filename extension, falling back to [`DEFAULT_CONTENT_TYPE`].
pub fn resolve_content_type(declared: Option<&str>, filename: &str) -> String {
    if let Some(declared) = declared.map(str::trim).filter(|s| !s.is_empty()) {
        return declared.to_string();
    }

    mime_guess::from_path(filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
