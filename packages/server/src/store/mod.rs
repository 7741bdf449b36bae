//! Persistence for recipe images.

mod error;
mod traits;

pub mod database;

pub use database::DbImageStore;
pub use error::StoreError;
pub use traits::{ImageMetadataUpdate, ImageStore, ImageSummary, NewImage};
