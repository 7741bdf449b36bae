use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    #[sea_orm(string_value = "gram")]
    Gram,
    #[sea_orm(string_value = "kilogram")]
    Kilogram,
    #[sea_orm(string_value = "liter")]
    Liter,
    #[sea_orm(string_value = "teaspoon")]
    Teaspoon,
    #[sea_orm(string_value = "tablespoon")]
    Tablespoon,
    #[sea_orm(string_value = "cup")]
    Cup,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub measurement_unit: MeasurementUnit,

    pub recipe_id: i32,
    #[sea_orm(belongs_to, from = "recipe_id", to = "id")]
    pub recipe: HasOne<super::recipe::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
