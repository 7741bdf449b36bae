use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Absolute base (e.g. `https://recipes.example.com`) used when building
    /// resource URLs. When unset, URLs are derived from the request's `Host`.
    #[serde(default)]
    pub public_url: Option<String>,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
    /// Side of the square box uploaded images are thumbnailed into.
    pub thumbnail_size: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: media::MAX_UPLOAD_BYTES,
            thumbnail_size: media::BoundingBox::UPLOAD.width,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub images: ImageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = with_defaults(Config::builder())?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., RECIPES__DATABASE__URL)
            .add_source(Environment::with_prefix("RECIPES").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let images = ImageConfig::default();
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8000)?
        .set_default("server.cors.max_age", 3600)?
        .set_default("database.url", "sqlite://recipes.db?mode=rwc")?
        .set_default("images.max_upload_bytes", images.max_upload_bytes as i64)?
        .set_default("images.thumbnail_size", i64::from(images.thumbnail_size))
}
