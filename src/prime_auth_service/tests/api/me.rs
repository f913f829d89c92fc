use chrono::Duration;
use prime_core::Role;
use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn me_returns_principal_from_token() {
    let app = TestApp::new().await;
    let token = app.register("erin", "erin@example.com", "DEVELOPER").await;

    let response = app.get_me(Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "username": "erin", "role": "DEVELOPER" }));
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = TestApp::new().await;

    let response = app.get_me(None).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "MISSING_TOKEN");
}

#[tokio::test]
async fn me_rejects_bad_tokens() {
    let app = TestApp::new().await;
    let token = app.register("frank", "frank@example.com", "CUSTOMER").await;
    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);

    let test_cases = [
        ("garbage", "TOKEN_MALFORMED"),
        ("a.b", "TOKEN_MALFORMED"),
        (tampered.as_str(), "TOKEN_INVALID"),
    ];

    for (token, code) in test_cases {
        let response = app.get_me(Some(token)).await;
        assert_eq!(response.status().as_u16(), 401, "token {token}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], code, "token {token}");
        assert_eq!(body["error"], "Authentication failed");
    }
}

#[tokio::test]
async fn me_rejects_expired_token() {
    let app = TestApp::new().await;
    let expired = app.token_for("grace", Role::Customer, Duration::seconds(-60));

    let response = app.get_me(Some(&expired)).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn scheme_is_case_insensitive() {
    let app = TestApp::new().await;
    let token = app.register("heidi", "heidi@example.com", "CUSTOMER").await;

    let response = app
        .http_client
        .get(format!("{}/auth/me", app.address))
        .header("Authorization", format!("bearer {token}"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}
