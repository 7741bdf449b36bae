//! Image ingestion helpers shared by the recipe server.
//!
//! Everything here is synchronous and free of I/O: payload validation,
//! best-effort thumbnail derivation and `data:` URI encoding.

pub mod data_uri;
pub mod thumbnail;
pub mod upload;

pub use data_uri::encode_data_uri;
pub use thumbnail::{BoundingBox, Thumbnail, ThumbnailError, derive_thumbnail, fit_within};
pub use upload::{
    DEFAULT_CONTENT_TYPE, MAX_UPLOAD_BYTES, UploadError, resolve_content_type, validate_upload,
};
