use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use media::{BoundingBox, derive_thumbnail, resolve_content_type, validate_upload};
use sea_orm::EntityTrait;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::recipe;
use crate::error::{AppError, ErrorBody};
use crate::extractors::context::RequestContext;
use crate::extractors::json::AppJson;
use crate::models::image::{
    ImageBase64Response, ImageResponse, UpdateImageRequest, UploadImageForm,
};
use crate::models::shared::SuccessResponse;
use crate::state::AppState;
use crate::store::NewImage;
use crate::utils::filename::{content_disposition_value, validate_flat_filename};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn upload_body_limit(max_upload_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD))
}

/// Ids that are not UUIDs cannot name an image, so they are reported as missing.
fn parse_image_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Image not found".into()))
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::Validation(format!("Multipart error: {}", err.body_text()))
    }
}

fn binary_response(data: Vec<u8>, content_type: &str, filename: &str) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(header::CONTENT_DISPOSITION, content_disposition_value(filename))
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Images",
    operation_id = "listImages",
    summary = "List all images",
    description = "Returns metadata for every stored image, newest first.",
    responses(
        (status = 200, description = "Image list", body = Vec<ImageResponse>),
    ),
)]
#[instrument(skip(state, ctx))]
pub async fn list_images(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let images = state.images.list(None).await?;
    Ok(Json(ImageResponse::present_all(images, &ctx)))
}

#[utoipa::path(
    get,
    path = "/recipes/{id}/images/",
    tag = "Images",
    operation_id = "listRecipeImages",
    summary = "List images of a recipe",
    description = "Returns metadata for the images owned by a recipe, newest first. \
        An unknown recipe yields an empty list.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Image list", body = Vec<ImageResponse>),
    ),
)]
#[instrument(skip(state, ctx), fields(recipe_id))]
pub async fn list_images_for_recipe(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(recipe_id): Path<i32>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let images = state.images.list(Some(recipe_id)).await?;
    Ok(Json(ImageResponse::present_all(images, &ctx)))
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/images/",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image to a recipe",
    description = "Stores the `file` multipart field as a new image of the recipe. \
        A JPEG thumbnail is derived when the payload decodes as an image; \
        undecodable payloads are still stored, without a thumbnail.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Empty or malformed upload (EMPTY_PAYLOAD, VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Recipe not found (OWNER_NOT_FOUND)", body = ErrorBody),
        (status = 413, description = "Upload exceeds the size limit (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, ctx, multipart), fields(recipe_id))]
pub async fn upload_image(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(recipe_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ImageResponse>, AppError> {
    if recipe::Entity::find_by_id(recipe_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(AppError::InvalidOwner(format!("Recipe {recipe_id} not found")));
    }

    let limit = state.config.images.max_upload_bytes;
    let mut upload: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        upload = Some((file_name, declared, bytes.to_vec()));
    }

    let (file_name, declared, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    validate_upload(&data, limit)?;

    let file_name =
        file_name.ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
    let filename = validate_flat_filename(&file_name)
        .map_err(|e| AppError::Validation(e.to_string()))?
        .to_string();
    let content_type = resolve_content_type(declared.as_deref(), &filename);

    let bounds = BoundingBox::square(state.config.images.thumbnail_size);
    let (data, thumbnail) = tokio::task::spawn_blocking(move || {
        let thumbnail = derive_thumbnail(&data, bounds);
        (data, thumbnail)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Thumbnail task failed: {e}")))?;

    let model = state
        .images
        .create(NewImage {
            recipe_id,
            filename,
            content_type,
            data,
            thumbnail,
        })
        .await?;

    info!(id = %model.id, size = model.size, has_thumbnail = model.thumbnail.is_some(), "Image uploaded");
    Ok(Json(ImageResponse::present_model(&model, &ctx)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Get image metadata",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Image metadata", body = ImageResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, ctx), fields(id))]
pub async fn get_image(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ImageResponse>, AppError> {
    let model = state.images.get(parse_image_id(&id)?).await?;
    Ok(Json(ImageResponse::present_model(&model, &ctx)))
}

#[utoipa::path(
    get,
    path = "/{id}/raw/",
    tag = "Images",
    operation_id = "getImageRaw",
    summary = "Download the original image bytes",
    description = "Returns the bytes exactly as uploaded, with the stored content type.",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Original image bytes"),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_image_raw(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let model = state.images.get(parse_image_id(&id)?).await?;
    binary_response(model.data, &model.content_type, &model.filename)
}

#[utoipa::path(
    get,
    path = "/{id}/thumb/",
    tag = "Images",
    operation_id = "getImageThumbnail",
    summary = "Download the image thumbnail",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Thumbnail bytes"),
        (status = 404, description = "Image or thumbnail not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_image_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let model = state.images.get(parse_image_id(&id)?).await?;
    match (model.thumbnail, model.thumbnail_content_type) {
        (Some(thumbnail), Some(content_type)) if !thumbnail.is_empty() => {
            binary_response(thumbnail, &content_type, &model.filename)
        }
        _ => Err(AppError::NotFound("Thumbnail not found".into())),
    }
}

#[utoipa::path(
    get,
    path = "/{id}/base64/",
    tag = "Images",
    operation_id = "getImageBase64",
    summary = "Get the image inlined as a data URI",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Base64 envelope", body = ImageBase64Response),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_image_base64(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageBase64Response>, AppError> {
    let model = state.images.get(parse_image_id(&id)?).await?;
    Ok(Json(ImageBase64Response::from(&model)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Images",
    operation_id = "updateImage",
    summary = "Update image metadata",
    description = "Renames the image and/or moves it to another recipe. Payload bytes are immutable. \
        An empty body returns the image unchanged.",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Image updated", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Image or target recipe not found (NOT_FOUND, OWNER_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, ctx, payload), fields(id))]
pub async fn update_image(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    let id = parse_image_id(&id)?;
    let update = payload.into_update()?;
    let model = state.images.update_metadata(id, update).await?;
    Ok(Json(ImageResponse::present_model(&model, &ctx)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete an image",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Image deleted", body = SuccessResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.images.delete(parse_image_id(&id)?).await?;
    Ok(Json(SuccessResponse::ok()))
}
