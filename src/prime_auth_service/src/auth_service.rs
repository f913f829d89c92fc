use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware,
    routing::{get, post},
};
use prime_adapters::config::AllowedOrigins;
use prime_axum::{
    AppState, access_control,
    routes::{health, login, me, oauth_google, register},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// The `/auth` surface plus any routes the host application mounts behind
/// the same access-control gate.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    pub fn new(state: AppState) -> Self {
        Self::with_routes(state, Router::new())
    }

    /// Merge `routes` next to the `/auth` endpoints. Every route, including
    /// the fallback, is classified by the state's route policy before its
    /// handler runs.
    pub fn with_routes(state: AppState, routes: Router<AppState>) -> Self {
        let router = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/auth/oauth/google", post(oauth_google))
            .route("/auth/me", get(me))
            .route("/auth/health", get(health))
            .merge(routes)
            .layer(middleware::from_fn_with_state(
                state.gate.clone(),
                access_control,
            ))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AuthService into a router that can be nested into another
    /// application, with CORS restricted to `allowed_origins` when given.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
