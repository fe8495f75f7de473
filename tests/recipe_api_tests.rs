mod common;

use common::TestEnvironment;
use serde_json::json;

#[tokio::test]
async fn test_create_then_get_recipe() {
    let env = TestEnvironment::new().await;

    let response = env
        .client
        .post(env.recipe("/api/recipes"))
        .json(&json!({ "name": "Tea", "image": "http://x/y.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["id"], 3);
    assert_eq!(created["name"], "Tea");
    assert_eq!(created["instructions"], "");

    let (status, fetched) = env.get_json(env.recipe("/api/recipes/3")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_failed_create_leaves_collection_unchanged() {
    let env = TestEnvironment::new().await;

    for body in [
        json!({ "name": "Tea" }),
        json!({ "image": "http://x/y.png" }),
        json!({ "name": "", "image": "http://x/y.png" }),
    ] {
        let response = env
            .client
            .post(env.recipe("/api/recipes"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        let error: serde_json::Value = response.json().await.unwrap();
        assert_eq!(error["message"], "Name and Image are required");
    }

    let (_, recipes) = env.get_json(env.recipe("/api/recipes")).await;
    assert_eq!(recipes.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_keeps_fields_sent_empty() {
    let env = TestEnvironment::new().await;

    let response = env
        .client
        .put(env.recipe("/api/recipes/1"))
        .json(&json!({ "name": "", "instructions": "Boil. Drain. Serve." }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["name"], "Spaghetti Carbonara");
    assert_eq!(updated["instructions"], "Boil. Drain. Serve.");
}

#[tokio::test]
async fn test_update_unknown_recipe() {
    let env = TestEnvironment::new().await;

    let response = env
        .client
        .put(env.recipe("/api/recipes/77"))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["message"], "Recipe not found");
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let env = TestEnvironment::new().await;

    for _ in 0..2 {
        let response = env
            .client
            .delete(env.recipe("/api/recipes/2"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Recipe deleted successfully");
    }

    let (_, recipes) = env.get_json(env.recipe("/api/recipes")).await;
    assert_eq!(recipes, json!([{
        "id": 1,
        "name": "Spaghetti Carbonara",
        "image": "https://www.themealdb.com/images/media/meals/llcbn01574260722.jpg",
        "instructions": "Cook pasta. Fry bacon. Mix eggs and cheese. Combine."
    }]));
}

#[tokio::test]
async fn test_ids_restart_after_everything_is_deleted() {
    let env = TestEnvironment::new().await;

    for id in [1, 2] {
        env.client
            .delete(env.recipe(&format!("/api/recipes/{}", id)))
            .send()
            .await
            .unwrap();
    }

    let created: serde_json::Value = env
        .client
        .post(env.recipe("/api/recipes"))
        .json(&json!({ "name": "Tea", "image": "http://x/y.png" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_read_as_empty() {
    let env = TestEnvironment::new().await;

    let response = env
        .client
        .post(env.recipe("/api/recipes"))
        .header("content-type", "text/plain")
        .body(r#"{"name":"Tea","image":"http://x/y.png"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["message"], "Name and Image are required");

    let response = env
        .client
        .put(env.recipe("/api/recipes/1"))
        .body(r#"{"name":"Renamed"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let recipe: serde_json::Value = response.json().await.unwrap();
    assert_eq!(recipe["name"], "Spaghetti Carbonara");

    let (_, recipes) = env.get_json(env.recipe("/api/recipes")).await;
    assert_eq!(recipes.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_metrics_count_recipe_operations() {
    let env = TestEnvironment::new().await;

    env.get_json(env.recipe("/api/recipes")).await;
    let (status, body) = env.get_text(env.recipe("/metrics")).await;

    assert_eq!(status, 200);
    assert!(body.contains("recipe_operations_total"));
    assert!(body.contains("endpoint=\"/api/recipes\""));
}
