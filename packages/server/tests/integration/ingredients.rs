use serde_json::json;

use crate::common::{TestApp, ingredient_body, routes};

mod ingredient_crud {
    use super::*;

    #[tokio::test]
    async fn create_under_recipe_and_fetch() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Bread").await;

        let res = app
            .post(&routes::ingredients_for(recipe_id), &ingredient_body("  Yeast ", 7))
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Yeast");
        assert_eq!(res.body["recipe_id"], recipe_id);

        let fetched = app.get(&routes::ingredient(res.id())).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["quantity"], 7);
        assert_eq!(fetched.body["measurement_unit"], "gram");
    }

    #[tokio::test]
    async fn create_for_unknown_recipe_is_not_found() {
        let app = TestApp::spawn().await;
        let res = app
            .post(&routes::ingredients_for(77), &ingredient_body("Salt", 1))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn list_filters_by_recipe() {
        let app = TestApp::spawn().await;
        let bread = app.create_recipe("Bread").await;
        let soup = app.create_recipe("Soup").await;
        app.post(&routes::ingredients_for(bread), &ingredient_body("Flour", 500))
            .await;
        app.post(&routes::ingredients_for(soup), &ingredient_body("Leek", 2))
            .await;
        app.post(&routes::ingredients_for(soup), &ingredient_body("Stock", 1))
            .await;

        let all = app.get(routes::INGREDIENTS).await;
        assert_eq!(all.body.as_array().unwrap().len(), 3);

        let res = app
            .get(&format!("{}?recipe_id={soup}", routes::INGREDIENTS))
            .await;
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Leek", "Stock"]);
    }

    #[tokio::test]
    async fn put_replaces_fields() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Tea").await;
        let id = app
            .post(&routes::ingredients_for(recipe_id), &ingredient_body("Leaves", 2))
            .await
            .id();

        let res = app
            .put(
                &routes::ingredient(id),
                &json!({"name": "Honey", "quantity": 1, "measurement_unit": "teaspoon"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Honey");
        assert!(res.body["category"].is_null());
        assert_eq!(res.body["measurement_unit"], "teaspoon");
        assert_eq!(res.body["recipe_id"], recipe_id);

        let bad = app
            .put(
                &routes::ingredient(id),
                &json!({"name": "Honey", "quantity": 1, "measurement_unit": "pinch"}),
            )
            .await;
        assert_eq!(bad.status, 400);
        assert_eq!(bad.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Toast").await;
        let id = app
            .post(&routes::ingredients_for(recipe_id), &ingredient_body("Butter", 10))
            .await
            .id();

        let res = app.delete(&routes::ingredient(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);

        assert_eq!(app.get(&routes::ingredient(id)).await.status, 404);
        assert_eq!(app.delete(&routes::ingredient(id)).await.status, 404);
    }
}
