use std::sync::Arc;

use tracing::info;

use db_chat::api::{create_router, AppState};
use db_chat::config::AppConfig;
use db_chat::llm::{GroqClient, LlmClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "db_chat=info,tower_http=info".to_string()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let llm: Arc<dyn LlmClient> = match &config.groq_model {
        Some(model) => Arc::new(GroqClient::with_model(config.groq_api_key.clone(), model)),
        None => Arc::new(GroqClient::new(config.groq_api_key.clone())),
    };
    info!(
        provider = llm.provider_name(),
        model = llm.model_name(),
        "LLM client ready"
    );

    let app = create_router(AppState { llm });

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
