//! Admin creation and login over HTTP.

#[macro_use]
mod common;

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::basic;

fn mock_account(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "password": "lorem ipsum dolor sit amet",
        "email": email,
        "firstName": "Alice",
        "lastName": "Liddell",
        "phoneNumber": 5551234,
    })
}

fn without(mut body: Value, field: &str) -> Value {
    body.as_object_mut().unwrap().remove(field);
    body
}

#[actix_web::test]
async fn create_returns_token_and_account() {
    let state = common::state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("alice01", "Alice@Example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["account"]["username"], "alice01");
    assert_eq!(body["account"]["email"], "alice@example.com");
    assert_eq!(body["account"]["phoneNumber"], "5551234");
    assert!(body["account"].get("password").is_none());
    assert!(!body.to_string().contains("lorem ipsum"));
}

#[actix_web::test]
async fn create_rejects_missing_required_fields() {
    let state = common::state().await;
    let app = init_app!(state);

    for field in ["username", "email", "password"] {
        let payload = without(mock_account("bob", "bob@example.com"), field);
        // Same request twice: the outcome must not change.
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/admin/create")
                .set_json(payload.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "missing {field}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "validation_error");
            assert!(body.get("token").is_none());
        }
    }
}

#[actix_web::test]
async fn missing_password_is_400_even_when_identity_collides() {
    let state = common::state().await;
    let app = init_app!(state);

    let seed = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("alice01", "alice@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, seed).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(without(mock_account("alice01", "alice@example.com"), "password"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn conflicting_username_is_409_and_creates_nothing() {
    let state = common::state().await;
    let app = init_app!(state);

    let seed = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("alice01", "alice@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, seed).await.status(), StatusCode::OK);

    let dup = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(json!({
            "username": "alice01",
            "email": "different@example.com",
            "password": "x",
        }))
        .to_request();
    let resp = test::call_service(&app, dup).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "conflict");
    assert!(body.get("token").is_none());

    // The second password was never stored.
    let login = test::TestRequest::get()
        .uri("/api/admin/login")
        .insert_header((AUTHORIZATION, basic("alice01", "x")))
        .to_request();
    assert_eq!(test::call_service(&app, login).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn conflicting_email_is_409() {
    let state = common::state().await;
    let app = init_app!(state);

    let seed = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("alice01", "alice@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, seed).await.status(), StatusCode::OK);

    let dup = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("someone-else", "ALICE@example.com"))
        .to_request();
    let resp = test::call_service(&app, dup).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "conflict: email already exists");
}

#[actix_web::test]
async fn concurrent_creates_with_one_username_yield_one_winner() {
    let state = common::state().await;
    let app = init_app!(state);

    let first = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("racer", "racer1@example.com"))
        .to_request();
    let second = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("racer", "racer2@example.com"))
        .to_request();

    let (a, b) = tokio::join!(test::call_service(&app, first), test::call_service(&app, second));
    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

#[actix_web::test]
async fn malformed_json_is_400() {
    let state = common::state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/create")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

async fn seeded_app_login(header: Option<String>) -> (StatusCode, Value) {
    let state = common::state().await;
    let app = init_app!(state);

    let seed = test::TestRequest::post()
        .uri("/api/admin/create")
        .set_json(mock_account("alice01", "alice@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, seed).await.status(), StatusCode::OK);

    let mut req = test::TestRequest::get().uri("/api/admin/login");
    if let Some(header) = header {
        req = req.insert_header((AUTHORIZATION, header));
    }
    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn login_with_correct_credentials_returns_token() {
    let (status, body) =
        seeded_app_login(Some(basic("alice01", "lorem ipsum dolor sit amet"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["account"]["username"], "alice01");
}

#[actix_web::test]
async fn login_accepts_a_lowercase_basic_scheme() {
    let header = basic("alice01", "lorem ipsum dolor sit amet").replacen("Basic", "basic", 1);
    let (status, body) = seeded_app_login(Some(header)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["username"], "alice01");
}

#[actix_web::test]
async fn login_missing_either_credential_is_400() {
    let (status, _) = seeded_app_login(Some(basic("", "lorem ipsum dolor sit amet"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = seeded_app_login(Some(basic("alice01", ""))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = seeded_app_login(None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn wrong_password_and_unknown_user_are_both_401() {
    let (wrong_status, wrong_body) = seeded_app_login(Some(basic("alice01", "randomPassword"))).await;
    let (unknown_status, unknown_body) = seeded_app_login(Some(basic("nobody", "randomPassword"))).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}
