use fake::{Fake, faker::internet::en::SafeEmail};
use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn register_returns_201_with_token_and_principal() {
    let app = TestApp::new().await;
    let email: String = SafeEmail().fake();

    let response = app
        .post_register(&json!({
            "username": "alice",
            "email": email,
            "password": "correct horse battery",
            "role": "DEVELOPER",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["principal"], json!({ "username": "alice", "role": "DEVELOPER" }));
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn register_defaults_to_customer_and_email_username() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&json!({
            "email": "Buyer@Example.com",
            "password": "correct horse battery",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["principal"],
        json!({ "username": "buyer@example.com", "role": "CUSTOMER" })
    );
}

#[tokio::test]
async fn register_rejects_admin_role() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "password": "correct horse battery",
            "role": "ADMIN",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn register_rejects_duplicate_username_and_email() {
    let app = TestApp::new().await;
    app.register("alice", "alice@example.com", "CUSTOMER").await;

    let same_username = app
        .post_register(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "correct horse battery",
        }))
        .await;
    assert_eq!(same_username.status().as_u16(), 400);
    let body: Value = same_username.json().await.unwrap();
    assert_eq!(body["code"], "DUPLICATE_IDENTITY");

    let same_email = app
        .post_register(&json!({
            "username": "alice2",
            "email": "ALICE@example.com",
            "password": "correct horse battery",
        }))
        .await;
    assert_eq!(same_email.status().as_u16(), 400);
}

#[tokio::test]
async fn register_returns_400_for_malformed_input() {
    let app = TestApp::new().await;

    let test_cases = [
        json!({ "email": "not-an-email", "password": "correct horse battery" }),
        json!({ "email": "a@example.com", "password": "" }),
        json!({ "email": "a@example.com" }),
        json!({ "username": "has space", "email": "a@example.com", "password": "pw" }),
        json!({ "email": "a@example.com", "password": "pw", "role": "OWNER" }),
    ];

    for body in test_cases.iter() {
        let response = app.post_register(body).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            body
        );
    }
}

#[tokio::test]
async fn register_refuses_another_persons_email_as_username() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&json!({
            "username": "victim@example.com",
            "email": "attacker@example.com",
            "password": "correct horse battery",
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let google = app
        .post_google(&json!({
            "externalAssertion": app.google_id_token("g-victim", "victim@example.com")
        }))
        .await;
    assert_eq!(google.status().as_u16(), 200);
    let body: Value = google.json().await.unwrap();
    assert_eq!(body["principal"]["username"], "victim@example.com");
}
