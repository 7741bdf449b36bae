use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::store::{DbImageStore, ImageStore};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub images: Arc<dyn ImageStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            images: Arc::new(DbImageStore::new(db.clone())),
            db,
            config,
        }
    }
}
