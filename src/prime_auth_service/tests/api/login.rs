use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn login_with_username_or_email() {
    let app = TestApp::new().await;
    app.register("bob", "bob@example.com", "CUSTOMER").await;

    for identifier in ["bob", "bob@example.com", "BOB@example.com"] {
        let response = app
            .post_login(&json!({
                "identifier": identifier,
                "password": "correct horse battery",
            }))
            .await;

        assert_eq!(response.status().as_u16(), 200, "identifier {identifier}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["principal"], json!({ "username": "bob", "role": "CUSTOMER" }));
    }
}

#[tokio::test]
async fn login_accepts_username_key() {
    let app = TestApp::new().await;
    app.register("carol", "carol@example.com", "DEVELOPER").await;

    let response = app
        .post_login(&json!({
            "username": "carol",
            "password": "correct horse battery",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_identical() {
    let app = TestApp::new().await;
    app.register("dave", "dave@example.com", "CUSTOMER").await;

    let wrong_password = app
        .post_login(&json!({ "identifier": "dave", "password": "nope nope nope" }))
        .await;
    let unknown_user = app
        .post_login(&json!({ "identifier": "nobody", "password": "nope nope nope" }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_user.status().as_u16(), 401);

    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_user: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn oauth_only_identity_cannot_log_in_with_password() {
    let app = TestApp::new().await;
    let id_token = app.google_id_token("g-123", "gina@example.com");
    assert_eq!(
        app.post_google(&json!({ "externalAssertion": id_token }))
            .await
            .status()
            .as_u16(),
        200
    );

    let response = app
        .post_login(&json!({ "identifier": "gina@example.com", "password": "anything" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}
