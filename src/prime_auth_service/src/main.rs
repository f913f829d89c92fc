use color_eyre::eyre::Result;
use prime_adapters::config::AuthServiceSetting;
use prime_auth_service::{AuthService, build_app_state, init_tracing};
use prime_core::RoutePolicy;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let config = AuthServiceSetting::load()?;
    let state = build_app_state(&config, RoutePolicy::marketplace_default()).await?;

    let allowed_origins = Some(config.auth.allowed_origins.clone()).filter(|o| !o.is_empty());

    let listener = TcpListener::bind(&config.application.address).await?;
    tracing::info!("Starting prime auth service...");

    AuthService::new(state)
        .run_standalone(listener, allowed_origins)
        .await?;

    Ok(())
}
