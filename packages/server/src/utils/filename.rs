use thiserror::Error;

/// Longest filename accepted for an uploaded image, in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

/// Why a client-supplied image filename was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename cannot be empty")]
    Empty,
    #[error("Filename must be at most {MAX_FILENAME_LEN} bytes")]
    TooLong,
    #[error("Invalid filename: path separators are not allowed")]
    PathSeparator,
    #[error("Invalid filename: '..' is not allowed")]
    Traversal,
    #[error("Invalid filename: control characters are not allowed")]
    ControlCharacter,
    #[error("Invalid filename: hidden files (starting with '.') are not allowed")]
    Hidden,
}

/// Checks a single-component filename and returns it trimmed.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let name = filename.trim();

    if name.is_empty() {
        return Err(FilenameError::Empty);
    }
    if name.len() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }
    // Covers NUL as well as CR/LF, which would break Content-Disposition.
    if name.chars().any(char::is_control) {
        return Err(FilenameError::ControlCharacter);
    }
    if name.contains(['/', '\\']) {
        return Err(FilenameError::PathSeparator);
    }
    if name == ".." {
        return Err(FilenameError::Traversal);
    }
    if name.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(name)
}

/// `Content-Disposition: inline` value carrying both an ASCII fallback and
/// the RFC 5987 encoded original name.
pub fn content_disposition_value(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let fallback = if fallback.is_empty() {
        "image".to_string()
    } else {
        fallback
    };

    let mut encoded = String::with_capacity(filename.len());
    for b in filename.bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            encoded.push(b as char);
        } else {
            encoded.push_str(&format!("%{b:02X}"));
        }
    }

    format!("inline; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
