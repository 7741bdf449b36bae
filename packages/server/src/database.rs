use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{image, ingredient};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    prepare_schema(&db).await?;

    Ok(db)
}

/// Create or update tables for every entity, then the secondary indexes.
pub async fn prepare_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("recipe_server::entity::*")
        .sync(db)
        .await?;
    ensure_indexes(db).await
}

/// Ensure lookup indexes on foreign keys exist.
///
/// SeaORM's schema-sync doesn't create indexes for `belongs_to` columns,
/// so we create them on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    // SELECT ... FROM image WHERE recipe_id = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_image_recipe_created")
        .table(image::Entity)
        .col(image::Column::RecipeId)
        .col(image::Column::CreatedAt)
        .to_owned();
    db.execute_raw(backend.build(&stmt)).await?;
    info!("Ensured index idx_image_recipe_created exists");

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_ingredient_recipe")
        .table(ingredient::Entity)
        .col(ingredient::Column::RecipeId)
        .to_owned();
    db.execute_raw(backend.build(&stmt)).await?;
    info!("Ensured index idx_ingredient_recipe exists");

    Ok(())
}
