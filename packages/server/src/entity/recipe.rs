use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    #[sea_orm(string_value = "vegetarian")]
    Vegetarian,
    #[sea_orm(string_value = "vegan")]
    Vegan,
    #[sea_orm(string_value = "pescatarian")]
    Pescatarian,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    #[sea_orm(string_value = "breakfast")]
    Breakfast,
    #[sea_orm(string_value = "lunch")]
    Lunch,
    #[sea_orm(string_value = "dinner")]
    Dinner,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum MealCategory {
    #[sea_orm(string_value = "appetizer")]
    Appetizer,
    #[sea_orm(string_value = "main_course")]
    MainCourse,
    #[sea_orm(string_value = "dessert")]
    Dessert,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    #[sea_orm(string_value = "easy")]
    Easy,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "hard")]
    Hard,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub instructions: String,

    pub diet_type: DietType,
    pub meal_type: MealType,
    pub meal_category: MealCategory,
    pub difficulty_level: DifficultyLevel,

    pub preparation_time: i32, // in minutes
    pub cooking_time: i32,     // in minutes

    pub video_url: Option<String>,
    pub rating: f64,
    pub number_of_servings: i32,

    #[sea_orm(has_many)]
    pub ingredients: HasMany<super::ingredient::Entity>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::image::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
