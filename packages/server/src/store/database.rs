use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::error::StoreError;
use super::traits::{ImageMetadataUpdate, ImageStore, ImageSummary, NewImage};
use crate::entity::{image, recipe};

/// [`ImageStore`] backed by the relational database; payloads live in the row.
#[derive(Clone)]
pub struct DbImageStore {
    db: DatabaseConnection,
}

impl DbImageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn ensure_recipe<C: ConnectionTrait>(db: &C, recipe_id: i32) -> Result<(), StoreError> {
    recipe::Entity::find_by_id(recipe_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(StoreError::OwnerNotFound(recipe_id))
}

async fn find_image<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<image::Model, StoreError> {
    image::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound(id))
}

#[async_trait]
impl ImageStore for DbImageStore {
    #[instrument(skip(self, image), fields(recipe_id = image.recipe_id, size = image.data.len()))]
    async fn create(&self, image: NewImage) -> Result<image::Model, StoreError> {
        let txn = self.db.begin().await?;
        ensure_recipe(&txn, image.recipe_id).await?;

        let size = image.data.len() as i64;
        let (thumbnail, thumbnail_content_type) = match image.thumbnail {
            Some(t) => (Some(t.data), Some(t.content_type)),
            None => (None, None),
        };

        let model = image::ActiveModel {
            id: Set(Uuid::now_v7()),
            recipe_id: Set(image.recipe_id),
            filename: Set(image.filename),
            content_type: Set(image.content_type),
            size: Set(size),
            data: Set(image.data),
            thumbnail: Set(thumbnail),
            thumbnail_content_type: Set(thumbnail_content_type),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        debug!(id = %model.id, "Stored image");
        Ok(model)
    }

    async fn get(&self, id: Uuid) -> Result<image::Model, StoreError> {
        find_image(&self.db, id).await
    }

    async fn list(&self, recipe_id: Option<i32>) -> Result<Vec<ImageSummary>, StoreError> {
        let mut select = image::Entity::find();
        if let Some(recipe_id) = recipe_id {
            select = select.filter(image::Column::RecipeId.eq(recipe_id));
        }

        let rows = select
            .select_only()
            .column(image::Column::Id)
            .column(image::Column::RecipeId)
            .column(image::Column::Filename)
            .column(image::Column::ContentType)
            .column(image::Column::Size)
            .column(image::Column::ThumbnailContentType)
            .column(image::Column::CreatedAt)
            .order_by_desc(image::Column::CreatedAt)
            .order_by_desc(image::Column::Id)
            .into_model::<ImageSummary>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    #[instrument(skip(self, update), fields(%id))]
    async fn update_metadata(
        &self,
        id: Uuid,
        update: ImageMetadataUpdate,
    ) -> Result<image::Model, StoreError> {
        if update.is_empty() {
            return find_image(&self.db, id).await;
        }

        let txn = self.db.begin().await?;
        let existing = find_image(&txn, id).await?;
        let mut active: image::ActiveModel = existing.into();

        if let Some(filename) = update.filename {
            active.filename = Set(filename);
        }
        if let Some(recipe_id) = update.recipe_id {
            ensure_recipe(&txn, recipe_id).await?;
            active.recipe_id = Set(recipe_id);
        }

        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(model)
    }

    #[instrument(skip(self), fields(%id))]
    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = image::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
