//! roster-mock: local employee endpoint
//!
//! Env: ROSTER_MOCK_PORT, ROSTER_MOCK_KEY_SCHEME, ROSTER_MOCK_TOKEN

use roster_mock::{AppState, Config, router};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_mock=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    let state = AppState::from_config(&config);
    tracing::info!(
        key = state.scheme().await.field_name(),
        auth = config.token.is_some(),
        "Starting roster-mock"
    );

    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("roster-mock listening on http://{addr}/graphql");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
