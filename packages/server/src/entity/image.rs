use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stored recipe image: original bytes plus an optional derived thumbnail.
///
/// `thumbnail` and `thumbnail_content_type` are written together and are
/// either both set or both NULL.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub recipe_id: i32,
    #[sea_orm(belongs_to, from = "recipe_id", to = "id")]
    pub recipe: HasOne<super::recipe::Entity>,

    /// Original upload filename.
    pub filename: String,

    /// MIME content type of `data`.
    pub content_type: String,

    /// Always `data.len()`.
    pub size: i64,

    #[sea_orm(column_type = "Blob")]
    pub data: Vec<u8>,

    #[sea_orm(column_type = "Blob", nullable)]
    pub thumbnail: Option<Vec<u8>>,

    pub thumbnail_content_type: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
