use chrono::{DateTime, Utc};
use media::encode_data_uri;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::image;
use crate::error::AppError;
use crate::extractors::context::RequestContext;
use crate::store::{ImageMetadataUpdate, ImageSummary};
use crate::utils::filename::validate_flat_filename;

/// Path prefix under which image resources are served.
pub const IMAGES_BASE_PATH: &str = "/api/v1/images";

/// Image metadata as returned to clients. Binary payloads are referenced by URL.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: Uuid,
    #[schema(example = 7)]
    pub recipe_id: i32,
    #[schema(example = "pancakes.jpg")]
    pub filename: String,
    /// Size of the original upload in bytes.
    #[schema(example = 142857)]
    pub size: i64,
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// Absolute URL of the original bytes; `null` when there is no payload.
    pub url: Option<String>,
    /// Absolute URL of the thumbnail; `null` when none could be derived.
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImageResponse {
    pub fn present(summary: ImageSummary, ctx: &RequestContext) -> Self {
        let url = summary
            .has_data()
            .then(|| ctx.absolute_uri(&format!("{IMAGES_BASE_PATH}/{}/raw/", summary.id)));
        let thumbnail_url = summary
            .has_thumbnail()
            .then(|| ctx.absolute_uri(&format!("{IMAGES_BASE_PATH}/{}/thumb/", summary.id)));

        Self {
            id: summary.id,
            recipe_id: summary.recipe_id,
            filename: summary.filename,
            size: summary.size,
            content_type: summary.content_type,
            url,
            thumbnail_url,
            created_at: summary.created_at,
        }
    }

    pub fn present_model(model: &image::Model, ctx: &RequestContext) -> Self {
        Self::present(ImageSummary::from(model), ctx)
    }

    pub fn present_all(summaries: Vec<ImageSummary>, ctx: &RequestContext) -> Vec<Self> {
        summaries
            .into_iter()
            .map(|s| Self::present(s, ctx))
            .collect()
    }
}

/// Original bytes inlined as a `data:` URI.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImageBase64Response {
    pub id: Uuid,
    #[schema(example = "pancakes.jpg")]
    pub filename: String,
    #[schema(example = "data:image/jpeg;base64,/9j/4AAQSkZJRg...")]
    pub data: String,
}

impl From<&image::Model> for ImageBase64Response {
    fn from(model: &image::Model) -> Self {
        Self {
            id: model.id,
            filename: model.filename.clone(),
            data: encode_data_uri(&model.content_type, &model.data),
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateImageRequest {
    #[schema(example = "renamed.jpg")]
    pub filename: Option<String>,
    /// Move the image to another existing recipe.
    #[schema(example = 8)]
    pub recipe_id: Option<i32>,
}

impl UpdateImageRequest {
    pub fn into_update(self) -> Result<ImageMetadataUpdate, AppError> {
        let filename = match self.filename {
            Some(name) => Some(
                validate_flat_filename(&name)
                    .map_err(|e| AppError::Validation(e.to_string()))?
                    .to_string(),
            ),
            None => None,
        };
        Ok(ImageMetadataUpdate {
            filename,
            recipe_id: self.recipe_id,
        })
    }
}

/// Multipart form accepted by the upload endpoint. Documentation only.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadImageForm {
    /// The image file. Its filename is required.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
