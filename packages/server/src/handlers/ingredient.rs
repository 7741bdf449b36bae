use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::recipe::find_recipe;
use crate::entity::ingredient;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::ingredient::*;
use crate::models::shared::SuccessResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Ingredients",
    operation_id = "listIngredients",
    summary = "List ingredients",
    description = "Returns all ingredients, or only those of `recipe_id` when given.",
    params(IngredientListQuery),
    responses(
        (status = 200, description = "Ingredient list", body = Vec<IngredientResponse>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientListQuery>,
) -> Result<Json<Vec<IngredientResponse>>, AppError> {
    let mut select = ingredient::Entity::find();
    if let Some(recipe_id) = query.recipe_id {
        select = select.filter(ingredient::Column::RecipeId.eq(recipe_id));
    }

    let data = select
        .order_by_asc(ingredient::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(IngredientResponse::from)
        .collect();
    Ok(Json(data))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Ingredients",
    operation_id = "getIngredient",
    summary = "Get an ingredient by ID",
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Ingredient not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, AppError> {
    Ok(Json(find_ingredient(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/recipes/{recipe_id}",
    tag = "Ingredients",
    operation_id = "createIngredient",
    summary = "Create an ingredient for a recipe",
    params(("recipe_id" = i32, Path, description = "Recipe ID")),
    request_body = IngredientFields,
    responses(
        (status = 201, description = "Ingredient created", body = IngredientResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(recipe_id))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
    AppJson(payload): AppJson<IngredientFields>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    find_recipe(&state.db, recipe_id).await?;

    let model = payload.into_active_model(recipe_id).insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(IngredientResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Ingredients",
    operation_id = "updateIngredient",
    summary = "Replace an ingredient's fields",
    description = "Replaces name, category, quantity and unit. The owning recipe is unchanged.",
    params(("id" = i32, Path, description = "Ingredient ID")),
    request_body = IngredientFields,
    responses(
        (status = 200, description = "Ingredient updated", body = IngredientResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Ingredient not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<IngredientFields>,
) -> Result<Json<IngredientResponse>, AppError> {
    payload.validate()?;

    let mut active: ingredient::ActiveModel = find_ingredient(&state.db, id).await?.into();
    payload.apply(&mut active);
    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Ingredients",
    operation_id = "deleteIngredient",
    summary = "Delete an ingredient",
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient deleted", body = SuccessResponse),
        (status = 404, description = "Ingredient not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, AppError> {
    let result = ingredient::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Ingredient not found".into()));
    }
    Ok(Json(SuccessResponse::ok()))
}

async fn find_ingredient<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<ingredient::Model, AppError> {
    ingredient::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient not found".into()))
}
