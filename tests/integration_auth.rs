mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bookshelf::bookshelf_auth::issue_token_at;
use bookshelf::bookshelf_config::JwtConfig;
use bookshelf::bookshelf_models::UserId;
use common::{TEST_SECRET, error_fields, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_admin() {
    let app = setup_test_app();

    let (status, user) = app
        .post(
            "/register",
            None,
            json!({ "username": "alice123", "password": "s3cret!" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "alice123");
    assert_eq!(user["name"], "");
    assert!(user["imgPath"].is_null());
    assert!(user.get("password").is_none());

    let (status, body) = app
        .post(
            "/login",
            None,
            json!({ "username": "alice123", "password": "s3cret!" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, body) = app.get("/admin", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice123");
}

#[tokio::test]
async fn test_register_reports_every_violation() {
    let app = setup_test_app();

    let (status, body) = app
        .post("/register", None, json!({ "username": "al", "password": "123" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["password", "username"]);
    assert_eq!(
        body["errors"][1]["message"],
        "Username has to be a string of length 3 or more"
    );
}

#[tokio::test]
async fn test_register_reports_type_and_rule_violations_together() {
    let app = setup_test_app();

    let (status, body) = app
        .post("/register", None, json!({ "username": 12, "password": "1" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["password", "username"]);
    assert_eq!(
        body["errors"][0]["message"],
        "Password has to be a string of length 6 or more"
    );
    assert_eq!(body["errors"][1]["message"], "username has to be a string");
}

#[tokio::test]
async fn test_duplicate_username_is_401() {
    let app = setup_test_app();
    app.register_and_login("alice123", "s3cret!").await;

    let (status, body) = app
        .post(
            "/register",
            None,
            json!({ "username": "alice123", "password": "other-pass" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"],
        "This username is already taken please choose another one"
    );
}

#[tokio::test]
async fn test_login_failures_are_distinguished() {
    let app = setup_test_app();
    app.register_and_login("alice123", "s3cret!").await;

    let (status, body) = app
        .post("/login", None, json!({ "username": "nobody", "password": "s3cret!" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No such user");

    let (status, body) = app
        .post(
            "/login",
            None,
            json!({ "username": "alice123", "password": "wrong-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid password");
}

#[tokio::test]
async fn test_admin_without_header_is_invalid_token() {
    let app = setup_test_app();

    let (status, body) = app.get("/admin", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_admin_with_malformed_header_is_invalid_token() {
    let app = setup_test_app();

    let request = Request::builder()
        .uri("/admin")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_expired_token_has_its_own_message() {
    let app = setup_test_app();
    let (id, _) = app.register_and_login("alice123", "s3cret!").await;

    let config = JwtConfig::new(TEST_SECRET, 60);
    let issued_long_ago = unix_now() - 3600;
    let token = issue_token_at(UserId(id as i32), &config, issued_long_ago).unwrap();

    let (status, body) = app.get("/admin", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "expired token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_invalid() {
    let app = setup_test_app();
    let (id, _) = app.register_and_login("alice123", "s3cret!").await;

    let config = JwtConfig::new("some-other-secret", 3600);
    let token = issue_token_at(UserId(id as i32), &config, unix_now()).unwrap();

    let (status, body) = app.get("/admin", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_token_for_unknown_user_is_invalid() {
    let app = setup_test_app();

    let config = JwtConfig::new(TEST_SECRET, 3600);
    let token = issue_token_at(UserId(999), &config, unix_now()).unwrap();

    let (status, body) = app.get("/admin", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_unparsable_body_is_invalid_json() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid json");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app();

    let (status, body) = app.get("/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let app = setup_test_app();

    let (status, body) = app.delete("/books", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
