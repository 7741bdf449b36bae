use async_trait::async_trait;
use chrono::{DateTime, Utc};
use media::Thumbnail;
use sea_orm::FromQueryResult;
use uuid::Uuid;

use super::error::StoreError;
use crate::entity::image;

/// Input for [`ImageStore::create`]. The stored size is taken from `data`.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub recipe_id: i32,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub thumbnail: Option<Thumbnail>,
}

/// Partial metadata update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadataUpdate {
    pub filename: Option<String>,
    pub recipe_id: Option<i32>,
}

impl ImageMetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Image row without the binary payloads.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ImageSummary {
    pub id: Uuid,
    pub recipe_id: i32,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    /// Set iff the image has a thumbnail.
    pub thumbnail_content_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImageSummary {
    pub fn has_data(&self) -> bool {
        self.size > 0
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_content_type.is_some()
    }
}

impl From<&image::Model> for ImageSummary {
    fn from(model: &image::Model) -> Self {
        let thumbnail_content_type = match (&model.thumbnail, &model.thumbnail_content_type) {
            (Some(bytes), Some(content_type)) if !bytes.is_empty() => Some(content_type.clone()),
            _ => None,
        };
        Self {
            id: model.id,
            recipe_id: model.recipe_id,
            filename: model.filename.clone(),
            content_type: model.content_type.clone(),
            size: model.data.len() as i64,
            thumbnail_content_type,
            created_at: model.created_at,
        }
    }
}

/// Storage for recipe images, keyed by an opaque UUID.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert a new image. Fails with [`StoreError::OwnerNotFound`] if the
    /// recipe does not exist.
    async fn create(&self, image: NewImage) -> Result<image::Model, StoreError>;

    /// Fetch a full image row including payloads.
    async fn get(&self, id: Uuid) -> Result<image::Model, StoreError>;

    /// List images, newest first, optionally restricted to one recipe.
    async fn list(&self, recipe_id: Option<i32>) -> Result<Vec<ImageSummary>, StoreError>;

    /// Change the filename and/or owning recipe of an image.
    async fn update_metadata(
        &self,
        id: Uuid,
        update: ImageMetadataUpdate,
    ) -> Result<image::Model, StoreError>;

    /// Remove an image. Fails with [`StoreError::NotFound`] if it is absent.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
