use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::shared::{normalize_optional, validate_name, validate_non_negative};
use crate::entity::ingredient::{self, MeasurementUnit};
use crate::error::AppError;

/// Writable ingredient fields, used for both create and full replacement.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct IngredientFields {
    #[schema(example = "Flour")]
    pub name: String,
    #[schema(example = "Baking")]
    pub category: Option<String>,
    #[schema(example = 250)]
    pub quantity: i32,
    pub measurement_unit: MeasurementUnit,
}

impl IngredientFields {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name, "Ingredient name")?;
        validate_non_negative(self.quantity, "Quantity")
    }

    /// Copy the fields onto an active model; the owner is left untouched.
    pub fn apply(self, active: &mut ingredient::ActiveModel) {
        active.name = Set(self.name.trim().to_string());
        active.category = Set(normalize_optional(self.category));
        active.quantity = Set(self.quantity);
        active.measurement_unit = Set(self.measurement_unit);
    }

    pub fn into_active_model(self, recipe_id: i32) -> ingredient::ActiveModel {
        let mut active = ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            ..Default::default()
        };
        self.apply(&mut active);
        active
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct IngredientResponse {
    pub id: i32,
    pub recipe_id: i32,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub measurement_unit: MeasurementUnit,
}

impl From<ingredient::Model> for IngredientResponse {
    fn from(m: ingredient::Model) -> Self {
        Self {
            id: m.id,
            recipe_id: m.recipe_id,
            name: m.name,
            category: m.category,
            quantity: m.quantity,
            measurement_unit: m.measurement_unit,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientListQuery {
    /// Only return ingredients of this recipe.
    pub recipe_id: Option<i32>,
}
