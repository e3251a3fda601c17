use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use discovery_core::CoreConfig;

/// Main entry point for the discovery document service
///
/// Starts the REST server (default: 0.0.0.0:3000) with Swagger UI at `/swagger-ui`.
///
/// # Environment Variables
/// - `DISCOVERY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `OPENAI_API_KEY`: credential for the AI provider; generation is unavailable without it
/// - `OPENAI_BASE_URL`: chat completion API base (default: "https://api.openai.com/v1")
/// - `OPENAI_MODEL`: model name (default: "gpt-4")
/// - `DISCOVERY_AI_TIMEOUT_SECS`: provider request timeout (default: 120)
/// - `DISCOVERY_MAX_RUN_LENGTH`: body chunk budget in characters (default: 1000)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("discovery_run=info".parse()?)
                .add_directive("discovery_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OPENAI_BASE_URL").ok(),
        std::env::var("OPENAI_MODEL").ok(),
        std::env::var("DISCOVERY_AI_TIMEOUT_SECS").ok(),
        std::env::var("DISCOVERY_MAX_RUN_LENGTH").ok(),
    )?;
    let rest_addr =
        std::env::var("DISCOVERY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!(
        model = cfg.openai_model(),
        api_key_configured = cfg.has_api_key(),
        max_run_length = cfg.max_run_length(),
        "++ Starting discovery REST on {}",
        rest_addr
    );

    let app = api_rest::router(AppState::new(&cfg)?);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
