use lead_reply::config::AppConfig;
use lead_reply::llm::create_provider;
use lead_reply::server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() -> lead_reply::error::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;
    if !config.has_api_key() {
        tracing::warn!("OPENAI_API_KEY is not set; completion requests will fail until it is");
    }

    let llm = create_provider(&config.llm_config())?;
    let app = build_app(llm, config.reply_settings());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.model,
        temperature = config.temperature,
        max_tokens = config.max_tokens,
        "Lead Reply webhook handler starting"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_target()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
