use std::io::Cursor;
use std::net::SocketAddr;

use reqwest::Client;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;

use recipe_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, ImageConfig, ServerConfig,
};
use recipe_server::state::AppState;

pub mod routes {
    pub const RECIPES: &str = "/api/v1/recipes";
    pub const INGREDIENTS: &str = "/api/v1/ingredients";
    pub const IMAGES: &str = "/api/v1/images";

    pub fn recipe(id: i32) -> String {
        format!("/api/v1/recipes/{id}")
    }

    pub fn recipe_ingredients(id: i32) -> String {
        format!("/api/v1/recipes/{id}/ingredients")
    }

    pub fn recipe_images(id: i32) -> String {
        format!("/api/v1/recipes/{id}/images")
    }

    pub fn ingredient(id: i32) -> String {
        format!("/api/v1/ingredients/{id}")
    }

    pub fn ingredients_for(recipe_id: i32) -> String {
        format!("/api/v1/ingredients/recipes/{recipe_id}")
    }

    pub fn image_uploads(recipe_id: i32) -> String {
        format!("/api/v1/images/recipes/{recipe_id}/images/")
    }

    pub fn image(id: &str) -> String {
        format!("/api/v1/images/{id}")
    }

    pub fn image_raw(id: &str) -> String {
        format!("/api/v1/images/{id}/raw/")
    }

    pub fn image_thumb(id: &str) -> String {
        format!("/api/v1/images/{id}/thumb/")
    }

    pub fn image_base64(id: &str) -> String {
        format!("/api/v1/images/{id}/base64/")
    }
}

/// A running test server backed by a throwaway SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Binary response for payload endpoints.
pub struct BytesResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub fn test_config(db_url: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            public_url: None,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: db_url.to_string(),
        },
        images: ImageConfig::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a tweaked configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let mut opts = ConnectOptions::new(&db_url);
        opts.max_connections(5).min_connections(1);
        let db = Database::connect(opts)
            .await
            .expect("Failed to connect to test database");
        recipe_server::database::prepare_schema(&db)
            .await
            .expect("Failed to prepare schema");

        let mut config = test_config(&db_url);
        configure(&mut config);

        let app = recipe_server::build_router(AppState::new(db.clone(), config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_bytes(&self, path: &str) -> BytesResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        BytesResponse {
            status,
            content_type,
            bytes,
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Upload `file_bytes` as the `file` field. `mime` of `None` sends no part content type.
    pub async fn upload(
        &self,
        recipe_id: i32,
        file_name: &str,
        file_bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> TestResponse {
        let mut part = reqwest::multipart::Part::bytes(file_bytes).file_name(file_name.to_string());
        if let Some(mime) = mime {
            part = part.mime_str(mime).expect("Failed to set MIME type");
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(self.url(&routes::image_uploads(recipe_id)))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Create a recipe via the API and return its `id`.
    pub async fn create_recipe(&self, name: &str) -> i32 {
        let res = self.post(routes::RECIPES, &recipe_body(name)).await;
        assert_eq!(res.status, 201, "create_recipe failed: {}", res.text);
        res.id()
    }

    /// Upload a generated PNG and return the image `id`.
    pub async fn upload_png(&self, recipe_id: i32, file_name: &str) -> String {
        let res = self
            .upload(recipe_id, file_name, png_bytes(64, 32), Some("image/png"))
            .await;
        assert_eq!(res.status, 200, "upload failed: {}", res.text);
        res.uuid()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    pub fn uuid(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain a string 'id'")
            .to_string()
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

pub fn recipe_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": "A test recipe",
        "instructions": "Combine everything and cook.",
        "diet_type": "vegetarian",
        "meal_type": "dinner",
        "meal_category": "main_course",
        "preparation_time": 10,
        "cooking_time": 20,
        "difficulty_level": "medium",
    })
}

pub fn ingredient_body(name: &str, quantity: i32) -> Value {
    serde_json::json!({
        "name": name,
        "category": "Pantry",
        "quantity": quantity,
        "measurement_unit": "gram",
    })
}

/// Encode a gradient of the given size as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}
