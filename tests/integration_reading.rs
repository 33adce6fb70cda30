mod common;

use axum::http::StatusCode;
use common::{error_fields, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_log_read_and_history() {
    let app = setup_test_app();
    let (id, token) = app.register_and_login("alice123", "s3cret!").await;
    app.create_category(&token, "Fantasy").await;
    let book = app.create_book(&token, "The Hobbit", "Fantasy").await;

    let (status, entry) = app
        .post(
            "/users/me/read",
            Some(&token),
            json!({ "bookId": book["id"], "rating": 5, "review": "Loved it" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["bookId"], book["id"]);
    assert_eq!(entry["rating"], 5);

    let (status, mine) = app.get("/users/me/read", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["items"][0]["title"], "The Hobbit");
    assert_eq!(mine["items"][0]["review"], "Loved it");
    assert_eq!(
        mine["_links"]["self"]["href"],
        "http://localhost:3000/users/me/read?offset=0&limit=10"
    );

    let (status, public) = app.get(&format!("/users/{}/read", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public["items"], mine["items"]);
}

#[tokio::test]
async fn test_log_same_book_twice_is_401() {
    let app = setup_test_app();
    let (_, token) = app.register_and_login("alice123", "s3cret!").await;
    app.create_category(&token, "Fantasy").await;
    let book = app.create_book(&token, "The Hobbit", "Fantasy").await;
    let body = json!({ "bookId": book["id"], "rating": 4 });

    let (status, _) = app.post("/users/me/read", Some(&token), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/users/me/read", Some(&token), body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "You have already read this book");
}

#[tokio::test]
async fn test_log_unknown_book_is_404() {
    let app = setup_test_app();
    let (_, token) = app.register_and_login("alice123", "s3cret!").await;

    let (status, body) = app
        .post("/users/me/read", Some(&token), json!({ "bookId": 99, "rating": 3 }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_log_read_validation() {
    let app = setup_test_app();
    let (_, token) = app.register_and_login("alice123", "s3cret!").await;

    let (status, body) = app
        .post("/users/me/read", Some(&token), json!({ "bookId": 0, "rating": 6 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["bookId", "rating"]);
}

#[tokio::test]
async fn test_log_read_requires_token() {
    let app = setup_test_app();

    let (status, _) = app
        .post("/users/me/read", None, json!({ "bookId": 1, "rating": 3 }))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_history_of_unknown_user_is_404() {
    let app = setup_test_app();

    let (status, body) = app.get("/users/7/read", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_delete_read() {
    let app = setup_test_app();
    let (_, token) = app.register_and_login("alice123", "s3cret!").await;
    app.create_category(&token, "Fantasy").await;
    let book = app.create_book(&token, "The Hobbit", "Fantasy").await;
    let (_, entry) = app
        .post("/users/me/read", Some(&token), json!({ "bookId": book["id"], "rating": 4 }))
        .await;
    let uri = format!("/users/me/read/{}", entry["id"]);

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No such read exists");

    let (_, history) = app.get("/users/me/read", Some(&token)).await;
    assert_eq!(history["items"], json!([]));
}

#[tokio::test]
async fn test_cannot_delete_another_users_read() {
    let app = setup_test_app();
    let (_, alice) = app.register_and_login("alice123", "s3cret!").await;
    let (_, bob) = app.register_and_login("bob", "hunter22").await;
    app.create_category(&alice, "Fantasy").await;
    let book = app.create_book(&alice, "The Hobbit", "Fantasy").await;
    let (_, entry) = app
        .post("/users/me/read", Some(&alice), json!({ "bookId": book["id"], "rating": 4 }))
        .await;

    let (status, _) = app
        .delete(&format!("/users/me/read/{}", entry["id"]), Some(&bob))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = app.get("/users/me/read", Some(&alice)).await;
    assert_eq!(history["items"].as_array().map(Vec::len), Some(1));
}
