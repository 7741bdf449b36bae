use serde_json::json;

use crate::common::{TestApp, png_bytes, routes};

mod image_upload {
    use super::*;

    #[tokio::test]
    async fn png_upload_stores_original_and_thumbnail() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Tomato soup").await;
        let png = png_bytes(800, 400);

        let res = app
            .upload(recipe_id, "soup.png", png.clone(), Some("image/png"))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["filename"], "soup.png");
        assert_eq!(res.body["content_type"], "image/png");
        assert_eq!(res.body["size"].as_u64().unwrap(), png.len() as u64);
        assert_eq!(res.body["recipe_id"], recipe_id);

        let id = res.uuid();
        let url = res.body["url"].as_str().unwrap();
        assert_eq!(url, app.url(&routes::image_raw(&id)));
        let thumb_url = res.body["thumbnail_url"].as_str().unwrap();
        assert_eq!(thumb_url, app.url(&routes::image_thumb(&id)));
    }

    #[tokio::test]
    async fn jpeg_like_payload_is_stored_without_thumbnail() {
        let app = TestApp::spawn().await;
        for i in 0..6 {
            app.create_recipe(&format!("Filler {i}")).await;
        }
        let recipe_id = app.create_recipe("Seventh").await;
        assert_eq!(recipe_id, 7);

        let mut payload = vec![0xFF, 0xD8, 0xFF, 0xE0];
        payload.resize(50, 0xAB);

        let res = app
            .upload(recipe_id, "x.jpg", payload.clone(), Some("image/jpeg"))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["size"], 50);
        assert!(res.body["url"].as_str().unwrap().ends_with("/raw/"));
        assert!(res.body["thumbnail_url"].is_null());

        let id = res.uuid();
        let raw = app.get_bytes(&routes::image_raw(&id)).await;
        assert_eq!(raw.status, 200);
        assert_eq!(raw.bytes, payload);

        let b64 = app.get(&routes::image_base64(&id)).await;
        assert_eq!(b64.status, 200);
        assert!(
            b64.body["data"]
                .as_str()
                .unwrap()
                .starts_with("data:image/jpeg;base64,")
        );
        assert_eq!(b64.body["filename"], "x.jpg");

        let thumb = app.get(&routes::image_thumb(&id)).await;
        assert_eq!(thumb.status, 404);
        assert_eq!(thumb.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Empty").await;

        let res = app
            .upload(recipe_id, "empty.png", Vec::new(), Some("image/png"))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "EMPTY_PAYLOAD");
        assert!(app.get(routes::IMAGES).await.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = TestApp::spawn_with(|c| c.images.max_upload_bytes = 1024).await;
        let recipe_id = app.create_recipe("Big").await;

        let at_limit = app
            .upload(recipe_id, "ok.bin", vec![1; 1024], None)
            .await;
        assert_eq!(at_limit.status, 200, "{}", at_limit.text);

        let res = app
            .upload(recipe_id, "big.bin", vec![1; 1025], None)
            .await;
        assert_eq!(res.status, 413);
        assert_eq!(res.code(), "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn upload_to_unknown_recipe_is_owner_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(999, "cake.png", png_bytes(8, 8), Some("image/png"))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "OWNER_NOT_FOUND");
    }

    #[tokio::test]
    async fn content_type_is_guessed_when_not_declared() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Guess").await;

        let res = app
            .upload(recipe_id, "photo.png", png_bytes(10, 10), None)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["content_type"], "image/png");

        let res = app
            .upload(recipe_id, "mystery", b"???".to_vec(), None)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["content_type"], "application/octet-stream");
    }

    #[tokio::test]
    async fn upload_without_file_field_is_validation_error() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("No file").await;

        let form = reqwest::multipart::Form::new().text("note", "hello");
        let res = app
            .client
            .post(app.url(&routes::image_uploads(recipe_id)))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let res = crate::common::TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod image_retrieval {
    use super::*;

    #[tokio::test]
    async fn raw_returns_original_bytes_and_type() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Raw").await;
        let png = png_bytes(30, 20);
        let id = app
            .upload(recipe_id, "raw.png", png.clone(), Some("image/png"))
            .await
            .uuid();

        let raw = app.get_bytes(&routes::image_raw(&id)).await;
        assert_eq!(raw.status, 200);
        assert_eq!(raw.content_type.as_deref(), Some("image/png"));
        assert_eq!(raw.bytes, png);
    }

    #[tokio::test]
    async fn thumbnail_fits_the_upload_box() {
        let app = TestApp::spawn().await;
        let recipe_id = app.create_recipe("Thumb").await;
        let id = app
            .upload(recipe_id, "wide.png", png_bytes(1000, 250), Some("image/png"))
            .await
            .uuid();

        let thumb = app.get_bytes(&routes::image_thumb(&id)).await;
        assert_eq!(thumb.status, 200);
        assert_eq!(thumb.content_type.as_deref(), Some("image/jpeg"));

        let decoded = image::load_from_memory(&thumb.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 100));
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let app = TestApp::spawn().await;
        let missing = "01936f0e-1234-7abc-8000-000000000001";

        for path in [
            routes::image(missing),
            routes::image_raw(missing),
            routes::image_thumb(missing),
            routes::image_base64(missing),
            routes::image("not-a-uuid"),
            routes::image_raw("42"),
        ] {
            let res = app.get(&path).await;
            assert_eq!(res.status, 404, "{path}");
            assert_eq!(res.code(), "NOT_FOUND", "{path}");
        }
    }

    #[tokio::test]
    async fn lists_are_newest_first_and_scoped_by_recipe() {
        let app = TestApp::spawn().await;
        let soup = app.create_recipe("Soup").await;
        let cake = app.create_recipe("Cake").await;

        let first = app.upload_png(soup, "1.png").await;
        let second = app.upload_png(cake, "2.png").await;
        let third = app.upload_png(soup, "3.png").await;

        let all = app.get(routes::IMAGES).await;
        assert_eq!(all.status, 200);
        let ids: Vec<&str> = all
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![third.as_str(), second.as_str(), first.as_str()]);

        let soup_images = app.get(&routes::image_uploads(soup)).await;
        let ids: Vec<&str> = soup_images
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![third.as_str(), first.as_str()]);

        let none = app.get(&routes::image_uploads(12345)).await;
        assert_eq!(none.status, 200);
        assert!(none.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn public_url_overrides_request_host() {
        let app = TestApp::spawn_with(|c| {
            c.server.public_url = Some("https://recipes.example.com/".into())
        })
        .await;
        let recipe_id = app.create_recipe("Public").await;
        let id = app.upload_png(recipe_id, "p.png").await;

        let res = app.get(&routes::image(&id)).await;
        assert_eq!(
            res.body["url"].as_str().unwrap(),
            format!("https://recipes.example.com/api/v1/images/{id}/raw/")
        );
    }
}

mod image_metadata {
    use super::*;

    #[tokio::test]
    async fn update_renames_and_moves_image() {
        let app = TestApp::spawn().await;
        let soup = app.create_recipe("Soup").await;
        let cake = app.create_recipe("Cake").await;
        let id = app.upload_png(soup, "old.png").await;

        let res = app
            .put(
                &routes::image(&id),
                &json!({"filename": "new.png", "recipe_id": cake}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["filename"], "new.png");
        assert_eq!(res.body["recipe_id"], cake);

        let cake_images = app.get(&routes::recipe_images(cake)).await;
        assert_eq!(cake_images.body.as_array().unwrap().len(), 1);
        let soup_images = app.get(&routes::recipe_images(soup)).await;
        assert!(soup_images.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_to_unknown_recipe_is_owner_not_found() {
        let app = TestApp::spawn().await;
        let soup = app.create_recipe("Soup").await;
        let id = app.upload_png(soup, "a.png").await;

        let res = app.put(&routes::image(&id), &json!({"recipe_id": 999})).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "OWNER_NOT_FOUND");

        let unchanged = app.get(&routes::image(&id)).await;
        assert_eq!(unchanged.body["recipe_id"], soup);
    }

    #[tokio::test]
    async fn update_rejects_bad_filename_and_missing_image() {
        let app = TestApp::spawn().await;
        let soup = app.create_recipe("Soup").await;
        let id = app.upload_png(soup, "a.png").await;

        let res = app
            .put(&routes::image(&id), &json!({"filename": "../a.png"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");

        let res = app
            .put(
                &routes::image("01936f0e-1234-7abc-8000-000000000001"),
                &json!({"filename": "b.png"}),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = TestApp::spawn().await;
        let soup = app.create_recipe("Soup").await;
        let id = app.upload_png(soup, "a.png").await;

        let res = app.delete(&routes::image(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"success": true}));

        assert_eq!(app.get(&routes::image(&id)).await.status, 404);
        assert_eq!(app.get_bytes(&routes::image_raw(&id)).await.status, 404);

        let again = app.delete(&routes::image(&id)).await;
        assert_eq!(again.status, 404);
        assert_eq!(again.code(), "NOT_FOUND");
    }
}
