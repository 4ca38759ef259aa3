//! API integration tests, driving the router in-process

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, AppConfig, AppState};

const BASE_URL: &str = "/api/v1";

fn app() -> Router {
    let state = AppState::bootstrap(AppConfig::default()).expect("Failed to bootstrap state");
    api::create_router(state)
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(format!("{}{}", BASE_URL, path));
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

/// Helper to get a session token
async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().expect("No token in response").to_string()
}

async fn sign_up(app: &Router, username: &str, password: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "name": "Jane Doe",
            "home": "Dhaka",
            "age": "30",
            "username": username,
            "password": password
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["authors"], 1);
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn test_boot_scenario() {
    let app = app();

    let (status, authors) = send(&app, "GET", "/authors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(authors.as_array().unwrap().len(), 1);
    assert_eq!(authors[0]["name"], "Admin User");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let token = login(&app, "admin", "admin123").await;

    let (status, added) = send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!([{ "isbn": "X1", "title": "T" }])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added[0]["authors"], json!(["admin"]));

    let (_, books) = send(&app, "GET", "/books", None, None).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["isbn"], "X1");
    assert_eq!(books[0]["authors"], json!(["admin"]));

    let (status, _) = send(&app, "DELETE", "/books/X1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, books) = send(&app, "GET", "/books", None, None).await;
    assert!(books.as_array().unwrap().is_empty());
    let (_, admin) = send(&app, "GET", "/authors/admin", None, None).await;
    assert!(admin["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_user_gets_same_answer_as_wrong_password() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_signup_conflict_is_normalized() {
    let app = app();
    sign_up(&app, "Jane Doe", "pw").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "name": "Other",
            "home": "X",
            "age": "1",
            "username": "JANEDOE",
            "password": "pw2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({ "name": "No Password", "home": "X", "age": "1", "username": "x", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_writes_require_a_valid_token() {
    let app = app();
    let book = json!([{ "isbn": "X1", "title": "T" }]);

    let (status, _) = send(&app, "POST", "/books", None, Some(book.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "POST", "/books", Some("garbage"), Some(book)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");

    let (status, _) = send(&app, "DELETE", "/books/X1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let token = login(&app, "admin", "admin123").await;

    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!({ "isbn": "not-a-list" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!([{ "isbn": "", "title": "T" }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!([{ "isbn": "   ", "title": "T" }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!([{ "isbn": "X1", "title": "T" }])),
    )
    .await;
    let (status, _) = send(
        &app,
        "PATCH",
        "/books/X1",
        Some(&token),
        Some(json!({ "genre": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PATCH", "/books/X1", Some(&token), Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, book) = send(&app, "GET", "/books/X1", None, None).await;
    assert_eq!(book["genre"], "");
}

#[tokio::test]
async fn test_partial_update_and_ownership() {
    let app = app();
    let admin = login(&app, "admin", "admin123").await;
    sign_up(&app, "jane", "pw").await;
    let jane = login(&app, "jane", "pw").await;

    send(
        &app,
        "POST",
        "/books",
        Some(&admin),
        Some(json!([{ "isbn": "X1", "book_name": "T", "genre": "Fiction", "pub": "Demo" }])),
    )
    .await;

    let (status, updated) = send(
        &app,
        "PATCH",
        "/books/X1",
        Some(&admin),
        Some(json!({ "genre": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["genre"], "X");
    assert_eq!(updated["title"], "T");
    assert_eq!(updated["publisher"], "Demo");

    let (status, _) = send(
        &app,
        "PATCH",
        "/books/X1",
        Some(&jane),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/books/X1", Some(&jane), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PATCH", "/books/missing", Some(&admin), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(&jane),
        Some(json!([{ "isbn": "X1", "title": "Mine now" }])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, book) = send(&app, "GET", "/books/X1", None, None).await;
    assert_eq!(book["title"], "T");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = app();
    let token = login(&app, "admin", "admin123").await;

    let (status, body) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");

    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!([{ "isbn": "X1", "title": "T" }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = app();
    let token = login(&app, "admin", "admin123").await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("{}/auth/logout", BASE_URL))
        .header(header::COOKIE, format!("jwt={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("Cookie not cleared")
        .to_string();
    assert!(set_cookie.starts_with("jwt=;"), "{}", set_cookie);
    assert!(set_cookie.contains("Max-Age=0"), "{}", set_cookie);

    // the cookie's session is gone server side too
    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(&token),
        Some(json!([{ "isbn": "X1", "title": "T" }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_cookie_accepted_for_writes() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri(format!("{}/auth/login", BASE_URL))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": "admin", "password": "admin123" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("No cookie set")
        .to_string();
    assert!(set_cookie.starts_with("jwt="));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .method("POST")
        .uri(format!("{}/books", BASE_URL))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(json!([{ "isbn": "C1", "title": "T" }]).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_own_account_cascades() {
    let app = app();
    sign_up(&app, "jane", "pw").await;
    let jane = login(&app, "jane", "pw").await;
    let admin = login(&app, "admin", "admin123").await;

    send(
        &app,
        "POST",
        "/books",
        Some(&jane),
        Some(json!([{ "isbn": "J1", "title": "T" }, { "isbn": "J2", "title": "T" }])),
    )
    .await;

    let (status, _) = send(&app, "DELETE", "/authors/jane", Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/authors/jane", Some(&jane), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, books) = send(&app, "GET", "/books", None, None).await;
    assert!(books.as_array().unwrap().is_empty());
    let (status, _) = send(&app, "GET", "/authors/jane", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "jane", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleted_account_sessions_do_not_reach_a_new_account() {
    let app = app();
    sign_up(&app, "jane", "pw").await;
    let first = login(&app, "jane", "pw").await;
    let second = login(&app, "jane", "pw").await;

    let (status, _) = send(&app, "DELETE", "/authors/jane", Some(&first), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // somebody else takes the username
    sign_up(&app, "Jane", "different").await;

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(&second),
        Some(json!([{ "isbn": "P1", "title": "T" }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");

    let (_, jane) = send(&app, "GET", "/authors/jane", None, None).await;
    assert!(jane["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = app();
    let request = Request::builder()
        .uri(format!("{}/health", BASE_URL))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
