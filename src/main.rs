use std::sync::Arc;

use founder_intake::advisor::{AdvisorConfig, openai_advisor};
use founder_intake::catalog::QuestionCatalog;
use founder_intake::clock::SystemClock;
use founder_intake::config::AppConfig;
use founder_intake::flow::FlowDeps;
use founder_intake::profile::ProfileClient;
use founder_intake::routes::{ApiState, api_routes};
use founder_intake::webhook::{HttpForwarder, WebhookProxy};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    let advisor = openai_advisor(&AdvisorConfig {
        api_key: config.openai_api_key.clone(),
        model: config.model.clone(),
    })?;

    let catalog = Arc::new(QuestionCatalog::standard());

    eprintln!("🧭 Founder Intake v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Questions: {}", catalog.len());
    eprintln!("   API: http://{}/api/sessions", config.bind_addr);
    eprintln!("   Webhook proxy: http://{}/api/webhook/onboarding\n", config.bind_addr);

    let deps = FlowDeps {
        catalog,
        advisor,
        forwarder: Arc::new(HttpForwarder::new(config.onboarding_webhook_url.clone())),
        clock: Arc::new(SystemClock),
        timing: config.timing.clone(),
    };
    let state = ApiState::new(
        deps,
        Arc::new(WebhookProxy::new(config.onboarding_webhook_url.clone())),
        Arc::new(ProfileClient::new(config.profile_webhook_url.clone())),
    );

    let app = api_routes(state).layer(CorsLayer::permissive());
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "REST server started");
    axum::serve(listener, app).await?;

    Ok(())
}
