use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/recipes", recipe_routes())
        .nest("/ingredients", ingredient_routes())
        .nest("/images", image_routes(config))
}

fn recipe_routes() -> OpenApiRouter<AppState> {
    use handlers::recipe::*;

    OpenApiRouter::new()
        .routes(routes!(list_recipes, create_recipe))
        .routes(routes!(get_recipe, update_recipe, delete_recipe))
        .routes(routes!(list_recipe_ingredients, add_recipe_ingredient))
        .routes(routes!(list_recipe_images))
}

fn ingredient_routes() -> OpenApiRouter<AppState> {
    use handlers::ingredient::*;

    OpenApiRouter::new()
        .routes(routes!(list_ingredients))
        .routes(routes!(create_ingredient))
        .routes(routes!(get_ingredient, update_ingredient, delete_ingredient))
}

fn image_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    use handlers::image::*;

    let metadata = OpenApiRouter::new()
        .routes(routes!(list_images))
        .routes(routes!(get_image, update_image, delete_image))
        .routes(routes!(get_image_raw))
        .routes(routes!(get_image_thumbnail))
        .routes(routes!(get_image_base64));

    let upload = OpenApiRouter::new()
        .routes(routes!(list_images_for_recipe, upload_image))
        .layer(upload_body_limit(config.images.max_upload_bytes));

    metadata.merge(upload)
}
