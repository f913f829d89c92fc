use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::helpers::{GOOGLE_CLIENT_ID, TestApp};

#[tokio::test]
async fn first_google_sign_in_provisions_a_customer() {
    let app = TestApp::new().await;
    let id_token = app.google_id_token("g-1", "Ivan@Example.com");

    let response = app
        .post_google(&json!({ "externalAssertion": id_token }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["principal"],
        json!({ "username": "ivan@example.com", "role": "CUSTOMER" })
    );

    let me = app.get_me(body["token"].as_str()).await;
    assert_eq!(me.status().as_u16(), 200);
}

#[tokio::test]
async fn repeated_sign_in_resolves_the_same_identity() {
    let app = TestApp::new().await;

    let first: Value = app
        .post_google(&json!({ "externalAssertion": app.google_id_token("g-2", "judy@example.com") }))
        .await
        .json()
        .await
        .unwrap();
    let second: Value = app
        .post_google(&json!({ "credential": app.google_id_token("g-2", "judy@example.com") }))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(first["principal"], second["principal"]);
}

#[tokio::test]
async fn google_sign_in_links_existing_local_account() {
    let app = TestApp::new().await;
    app.register("kim", "kim@example.com", "DEVELOPER").await;

    let response = app
        .post_google(&json!({ "externalAssertion": app.google_id_token("g-3", "kim@example.com") }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["principal"], json!({ "username": "kim", "role": "DEVELOPER" }));

    let password_login = app
        .post_login(&json!({ "identifier": "kim", "password": "correct horse battery" }))
        .await;
    assert_eq!(password_login.status().as_u16(), 200);
}

#[tokio::test]
async fn concurrent_first_sign_ins_create_one_identity() {
    let app = TestApp::new().await;
    let id_token = app.google_id_token("g-race", "race@example.com");

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let client = app.http_client.clone();
            let url = format!("{}/auth/oauth/google", app.address);
            let body = json!({ "externalAssertion": id_token });
            tokio::spawn(async move { client.post(url).json(&body).send().await.unwrap() })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["principal"]["username"], "race@example.com");
    }
}

#[tokio::test]
async fn unverifiable_assertions_are_rejected() {
    let app = TestApp::new().await;
    let exp = (Utc::now() + Duration::minutes(5)).timestamp();

    let wrong_audience = app.google_id_token_with(json!({
        "iss": "https://accounts.google.com",
        "aud": "someone-else",
        "sub": "g-4",
        "email": "x@example.com",
        "exp": exp,
    }));
    let expired = app.google_id_token_with(json!({
        "iss": "https://accounts.google.com",
        "aud": GOOGLE_CLIENT_ID,
        "sub": "g-4",
        "email": "x@example.com",
        "exp": Utc::now().timestamp() - 60,
    }));
    let unverified_email = app.google_id_token_with(json!({
        "iss": "https://accounts.google.com",
        "aud": GOOGLE_CLIENT_ID,
        "sub": "g-4",
        "email": "x@example.com",
        "email_verified": false,
        "exp": exp,
    }));

    for assertion in [wrong_audience, expired, unverified_email, "not-a-jwt".to_owned()] {
        let response = app
            .post_google(&json!({ "externalAssertion": assertion }))
            .await;
        assert_eq!(response.status().as_u16(), 401);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "ASSERTION_UNVERIFIED");
    }
}

#[tokio::test]
async fn missing_assertion_is_a_bad_request() {
    let app = TestApp::new().await;

    for body in [json!({}), json!({ "externalAssertion": "  " })] {
        let response = app.post_google(&body).await;
        assert_eq!(response.status().as_u16(), 400);
    }
}
