use chrono::{DateTime, Utc};
use sea_orm::{FromQueryResult, Set};
use serde::{Deserialize, Serialize};

use super::image::ImageResponse;
use super::ingredient::{IngredientFields, IngredientResponse};
use super::shared::{Pagination, normalize_optional, validate_name, validate_non_negative};
use crate::entity::recipe::{self, DietType, DifficultyLevel, MealCategory, MealType};
use crate::error::AppError;

pub const MAX_RATING: f64 = 5.0;

fn default_servings() -> i32 {
    1
}

/// Scalar recipe fields. PUT replaces all of them; nested lists are separate.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RecipeFields {
    #[schema(example = "Shakshuka")]
    pub name: String,
    pub description: Option<String>,
    pub instructions: String,
    pub diet_type: DietType,
    pub meal_type: MealType,
    pub meal_category: MealCategory,
    /// Minutes.
    #[schema(example = 10)]
    pub preparation_time: i32,
    /// Minutes.
    #[schema(example = 25)]
    pub cooking_time: i32,
    pub difficulty_level: DifficultyLevel,
    pub video_url: Option<String>,
    #[serde(default)]
    #[schema(example = 4.5)]
    pub rating: f64,
    #[serde(default = "default_servings")]
    #[schema(example = 2)]
    pub number_of_servings: i32,
}

impl RecipeFields {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name, "Name")?;
        if self.instructions.trim().is_empty() {
            return Err(AppError::Validation("Instructions must not be empty".into()));
        }
        validate_non_negative(self.preparation_time, "Preparation time")?;
        validate_non_negative(self.cooking_time, "Cooking time")?;
        if self.number_of_servings < 1 {
            return Err(AppError::Validation("Number of servings must be >= 1".into()));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(AppError::Validation(format!(
                "Rating must be between 0 and {MAX_RATING}"
            )));
        }
        Ok(())
    }

    /// Copy every scalar field onto `active` and bump `updated_at`.
    pub fn apply(self, active: &mut recipe::ActiveModel, now: DateTime<Utc>) {
        active.name = Set(self.name.trim().to_string());
        active.description = Set(normalize_optional(self.description));
        active.instructions = Set(self.instructions);
        active.diet_type = Set(self.diet_type);
        active.meal_type = Set(self.meal_type);
        active.meal_category = Set(self.meal_category);
        active.preparation_time = Set(self.preparation_time);
        active.cooking_time = Set(self.cooking_time);
        active.difficulty_level = Set(self.difficulty_level);
        active.video_url = Set(normalize_optional(self.video_url));
        active.rating = Set(self.rating);
        active.number_of_servings = Set(self.number_of_servings);
        active.updated_at = Set(now);
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateRecipeRequest {
    #[serde(flatten)]
    pub recipe: RecipeFields,
    #[serde(default)]
    pub ingredients: Vec<IngredientFields>,
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        self.recipe.validate()?;
        self.ingredients.iter().try_for_each(IngredientFields::validate)
    }
}

/// Full recipe with its ingredients and presented images.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructions: String,
    pub diet_type: DietType,
    pub meal_type: MealType,
    pub meal_category: MealCategory,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub difficulty_level: DifficultyLevel,
    pub video_url: Option<String>,
    pub rating: f64,
    pub number_of_servings: i32,
    pub ingredients: Vec<IngredientResponse>,
    pub images: Vec<ImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeResponse {
    pub fn new(
        m: recipe::Model,
        ingredients: Vec<IngredientResponse>,
        images: Vec<ImageResponse>,
    ) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            instructions: m.instructions,
            diet_type: m.diet_type,
            meal_type: m.meal_type,
            meal_category: m.meal_category,
            preparation_time: m.preparation_time,
            cooking_time: m.cooking_time,
            difficulty_level: m.difficulty_level,
            video_url: m.video_url,
            rating: m.rating,
            number_of_servings: m.number_of_servings,
            ingredients,
            images,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Recipe row as shown in paginated listings; instructions are omitted.
#[derive(Debug, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct RecipeListItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub diet_type: DietType,
    pub meal_type: MealType,
    pub meal_category: MealCategory,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub difficulty_level: DifficultyLevel,
    pub rating: f64,
    pub number_of_servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RecipeListResponse {
    pub data: Vec<RecipeListItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Page number, 1-based. Defaults to 1.
    pub page: Option<u64>,
    /// Items per page, 1-100. Defaults to 20.
    pub per_page: Option<u64>,
}
