use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{image, ingredient, recipe};
use crate::error::{AppError, ErrorBody};
use crate::extractors::context::RequestContext;
use crate::extractors::json::AppJson;
use crate::models::image::ImageResponse;
use crate::models::ingredient::{IngredientFields, IngredientResponse};
use crate::models::recipe::*;
use crate::models::shared::{Pagination, SuccessResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Recipes",
    operation_id = "createRecipe",
    summary = "Create a recipe",
    description = "Creates a recipe together with its nested `ingredients` in one transaction. \
        Images are uploaded separately.",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.recipe.name))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let now = chrono::Utc::now();
    let mut active = recipe::ActiveModel {
        created_at: Set(now),
        ..Default::default()
    };
    payload.recipe.apply(&mut active, now);

    let txn = state.db.begin().await?;
    let model = active.insert(&txn).await?;

    let mut ingredients = Vec::with_capacity(payload.ingredients.len());
    for fields in payload.ingredients {
        let row = fields.into_active_model(model.id).insert(&txn).await?;
        ingredients.push(IngredientResponse::from(row));
    }
    txn.commit().await?;

    info!(id = model.id, ingredients = ingredients.len(), "Recipe created");
    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::new(model, ingredients, Vec::new())),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Recipes",
    operation_id = "listRecipes",
    summary = "List recipes with pagination",
    description = "Returns recipes newest first. Instructions and nested lists are omitted.",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "List of recipes", body = RecipeListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<RecipeListResponse>, AppError> {
    let (page, per_page) = Pagination::normalize(query.page, query.per_page);

    let total = recipe::Entity::find()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = recipe::Entity::find()
        .select_only()
        .column(recipe::Column::Id)
        .column(recipe::Column::Name)
        .column(recipe::Column::Description)
        .column(recipe::Column::DietType)
        .column(recipe::Column::MealType)
        .column(recipe::Column::MealCategory)
        .column(recipe::Column::PreparationTime)
        .column(recipe::Column::CookingTime)
        .column(recipe::Column::DifficultyLevel)
        .column(recipe::Column::Rating)
        .column(recipe::Column::NumberOfServings)
        .column(recipe::Column::CreatedAt)
        .column(recipe::Column::UpdatedAt)
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<RecipeListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(RecipeListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "getRecipe",
    summary = "Get a recipe by ID",
    description = "Returns the recipe with its ingredients and image metadata.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, ctx), fields(id))]
pub async fn get_recipe(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, AppError> {
    let model = find_recipe(&state.db, id).await?;
    let ingredients = recipe_ingredients(&state.db, id).await?;
    let images = ImageResponse::present_all(state.images.list(Some(id)).await?, &ctx);
    Ok(Json(RecipeResponse::new(model, ingredients, images)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "updateRecipe",
    summary = "Replace a recipe's fields",
    description = "Replaces every scalar field of the recipe. Ingredients and images are left untouched.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = RecipeFields,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, ctx, payload), fields(id))]
pub async fn update_recipe(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RecipeFields>,
) -> Result<Json<RecipeResponse>, AppError> {
    payload.validate()?;

    let existing = find_recipe(&state.db, id).await?;
    let mut active: recipe::ActiveModel = existing.into();
    payload.apply(&mut active, chrono::Utc::now());
    let model = active.update(&state.db).await?;

    let ingredients = recipe_ingredients(&state.db, id).await?;
    let images = ImageResponse::present_all(state.images.list(Some(id)).await?, &ctx);
    Ok(Json(RecipeResponse::new(model, ingredients, images)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "deleteRecipe",
    summary = "Delete a recipe",
    description = "Deletes the recipe together with all of its ingredients and images.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe deleted", body = SuccessResponse),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, AppError> {
    let txn = state.db.begin().await?;
    find_recipe(&txn, id).await?;

    let images = image::Entity::delete_many()
        .filter(image::Column::RecipeId.eq(id))
        .exec(&txn)
        .await?;
    let ingredients = ingredient::Entity::delete_many()
        .filter(ingredient::Column::RecipeId.eq(id))
        .exec(&txn)
        .await?;
    recipe::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        images = images.rows_affected,
        ingredients = ingredients.rows_affected,
        "Recipe deleted"
    );
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/{id}/ingredients",
    tag = "Recipes",
    operation_id = "listRecipeIngredients",
    summary = "List ingredients of a recipe",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Ingredient list", body = Vec<IngredientResponse>),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_recipe_ingredients(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<IngredientResponse>>, AppError> {
    find_recipe(&state.db, id).await?;
    Ok(Json(recipe_ingredients(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/{id}/ingredients",
    tag = "Recipes",
    operation_id = "addRecipeIngredient",
    summary = "Add an ingredient to a recipe",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = IngredientFields,
    responses(
        (status = 201, description = "Ingredient created", body = IngredientResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn add_recipe_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<IngredientFields>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    find_recipe(&state.db, id).await?;

    let model = payload.into_active_model(id).insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(IngredientResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}/images",
    tag = "Recipes",
    operation_id = "listRecipeImagesNested",
    summary = "List images of a recipe",
    description = "Returns image metadata for the recipe, newest first.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Image list", body = Vec<ImageResponse>),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, ctx), fields(id))]
pub async fn list_recipe_images(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    find_recipe(&state.db, id).await?;
    let images = state.images.list(Some(id)).await?;
    Ok(Json(ImageResponse::present_all(images, &ctx)))
}

pub(crate) async fn find_recipe<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<recipe::Model, AppError> {
    recipe::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}

async fn recipe_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
) -> Result<Vec<IngredientResponse>, AppError> {
    Ok(ingredient::Entity::find()
        .filter(ingredient::Column::RecipeId.eq(recipe_id))
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(IngredientResponse::from)
        .collect())
}
