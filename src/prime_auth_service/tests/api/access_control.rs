use chrono::Duration;
use prime_core::Role;
use serde_json::Value;

use crate::helpers::TestApp;

#[tokio::test]
async fn developer_routes_require_developer_role() {
    let app = TestApp::new().await;
    let developer = app.register("dev", "dev@example.com", "DEVELOPER").await;
    let customer = app.register("cust", "cust@example.com", "CUSTOMER").await;
    let route = "/api/properties/developer/listings";

    let anonymous = app.get(route, None).await;
    assert_eq!(anonymous.status().as_u16(), 401);

    let forbidden = app.get(route, Some(&customer)).await;
    assert_eq!(forbidden.status().as_u16(), 403);
    let body: Value = forbidden.json().await.unwrap();
    assert_eq!(body["code"], "INSUFFICIENT_ROLE");
    assert_eq!(body["error"], "Access denied");

    let allowed = app.get(route, Some(&developer)).await;
    assert_eq!(allowed.status().as_u16(), 200);
    assert_eq!(allowed.text().await.unwrap(), "dev");
}

#[tokio::test]
async fn public_listing_reads_need_no_token() {
    let app = TestApp::new().await;

    let response = app.get("/api/properties/42", None).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let app = TestApp::new().await;
    let admin = app.token_for("root", Role::Admin, Duration::minutes(5));
    let developer = app.token_for("dev", Role::Developer, Duration::minutes(5));

    assert_eq!(app.get("/api/users", Some(&developer)).await.status().as_u16(), 403);
    assert_eq!(app.get("/api/users", Some(&admin)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn method_specific_rules_apply() {
    let app = TestApp::new().await;
    let customer = app.token_for("buyer", Role::Customer, Duration::minutes(5));
    let developer = app.token_for("seller", Role::Developer, Duration::minutes(5));
    let url = format!("{}/api/transactions/create", app.address);

    let as_developer = app
        .http_client
        .post(&url)
        .bearer_auth(&developer)
        .send()
        .await
        .unwrap();
    assert_eq!(as_developer.status().as_u16(), 403);

    let as_customer = app
        .http_client
        .post(&url)
        .bearer_auth(&customer)
        .send()
        .await
        .unwrap();
    assert_eq!(as_customer.status().as_u16(), 200);
}

#[tokio::test]
async fn unknown_routes_require_authentication() {
    let app = TestApp::new().await;
    let token = app.token_for("someone", Role::Customer, Duration::minutes(5));

    assert_eq!(app.get("/api/unknown", None).await.status().as_u16(), 401);
    assert_eq!(app.get("/api/unknown", Some(&token)).await.status().as_u16(), 404);
}
