use std::sync::Arc;

use axum::{Router, routing::get};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use prime_adapters::config::{
    AllowedOrigins, ApplicationSettings, AuthServiceSetting, AuthSettings, GoogleSettings,
    JwtSettings, PasswordSettings, constants,
};
use prime_auth_service::{AuthService, build_app_state};
use prime_axum::{AppState, AuthenticatedPrincipal};
use prime_core::{Principal, Role, RoutePolicy, TokenService, Username};
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const GOOGLE_CLIENT_ID: &str = "prime-client.apps.googleusercontent.com";
const GOOGLE_KID: &str = "test-key";
const GOOGLE_SECRET: &[u8] = b"prime-google-test-signing-key-0123456789ab";
const GOOGLE_SECRET_B64URL: &str = "cHJpbWUtZ29vZ2xlLXRlc3Qtc2lnbmluZy1rZXktMDEyMzQ1Njc4OWFi";
const JWT_SECRET: &str = "integration-test-secret-with-plenty-of-bytes";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub tokens: Arc<dyn TokenService>,
    pub google: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let google = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/certs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keys": [{
                    "kty": "oct",
                    "kid": GOOGLE_KID,
                    "alg": "HS256",
                    "k": GOOGLE_SECRET_B64URL
                }]
            })))
            .mount(&google)
            .await;

        let settings = settings(&google);
        let state = build_app_state(&settings, RoutePolicy::marketplace_default())
            .await
            .expect("Failed to build app state");
        let tokens = state.tokens.clone();

        let listener = TcpListener::bind(constants::test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let service = AuthService::with_routes(state, marketplace_routes());
        tokio::spawn(service.run_standalone(listener, None));

        Self {
            address,
            http_client: reqwest::Client::new(),
            tokens,
            google,
        }
    }

    pub async fn post_register(&self, body: &Value) -> reqwest::Response {
        self.post("/auth/register", body).await
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.post("/auth/login", body).await
    }

    pub async fn post_google(&self, body: &Value) -> reqwest::Response {
        self.post("/auth/oauth/google", body).await
    }

    pub async fn get_me(&self, token: Option<&str>) -> reqwest::Response {
        self.get("/auth/me", token).await
    }

    pub async fn post(&self, route: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, route))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, route: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.http_client.get(format!("{}{}", self.address, route));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// Registers a local account and returns its bearer token.
    pub async fn register(&self, username: &str, email: &str, role: &str) -> String {
        let response = self
            .post_register(&json!({
                "username": username,
                "email": email,
                "password": "correct horse battery",
                "role": role,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_owned()
    }

    /// Mints a token directly; used for roles self-registration cannot grant.
    pub fn token_for(&self, username: &str, role: Role, ttl: Duration) -> String {
        let principal = Principal::new(Username::parse(username).unwrap(), role);
        self.tokens.issue(&principal, ttl).unwrap().token.into_inner()
    }

    pub fn google_id_token(&self, sub: &str, email: &str) -> String {
        self.google_id_token_with(json!({
            "iss": "https://accounts.google.com",
            "aud": GOOGLE_CLIENT_ID,
            "sub": sub,
            "email": email,
            "email_verified": true,
            "name": "Test User",
            "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
        }))
    }

    pub fn google_id_token_with(&self, claims: Value) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(GOOGLE_KID.to_owned());
        encode(&header, &claims, &EncodingKey::from_secret(GOOGLE_SECRET)).unwrap()
    }
}

fn settings(google: &MockServer) -> AuthServiceSetting {
    AuthServiceSetting {
        application: ApplicationSettings {
            address: constants::test::APP_ADDRESS.to_owned(),
        },
        auth: AuthSettings {
            jwt: JwtSettings {
                secret: Secret::from(JWT_SECRET.to_owned()),
                ttl_seconds: 3600,
                clock_skew_seconds: 0,
            },
            allowed_origins: AllowedOrigins::default(),
            password: PasswordSettings {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        },
        google: GoogleSettings {
            client_id: GOOGLE_CLIENT_ID.to_owned(),
            jwks_url: format!("{}/certs", google.uri()),
            algorithms: vec!["HS256".to_owned()],
            ..GoogleSettings::default()
        },
        postgres: None,
    }
}

/// Stand-ins for downstream marketplace routes guarded by the same policy.
fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/properties/developer/listings",
            get(|AuthenticatedPrincipal(principal): AuthenticatedPrincipal| async move {
                principal.subject().as_str().to_owned()
            }),
        )
        .route("/api/properties/{id}", get(|| async { "listing" }))
        .route("/api/users", get(|| async { "users" }))
        .route(
            "/api/transactions/create",
            axum::routing::post(|| async { "created" }),
        )
}
