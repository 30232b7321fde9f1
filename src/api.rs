//! HTTP surface
//!
//! Two routes: a liveness check at `/` and `POST /chat`, which takes the
//! question and target-database credentials as query parameters.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::db::ConnectionParams;
use crate::error::ChatError;
use crate::llm::LlmClient;
use crate::orchestrator::{ChatOrchestrator, ChatResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmClient>,
}

/// Query parameters for `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatParams {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL user
    pub user: String,
    /// PostgreSQL password
    pub password: String,
    /// PostgreSQL database
    pub database: String,
    /// User question to generate SQL for
    pub query: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/chat", post(chat_with_db))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Liveness check
async fn read_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "hello": "world" }))
}

/// Answer a natural-language question against the caller's database
async fn chat_with_db(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> Result<Json<ChatResult>, ChatError> {
    info!(host = %params.host, database = %params.database, "chat request");

    let connection = ConnectionParams {
        host: params.host,
        user: params.user,
        password: params.password,
        database: params.database,
    };

    let orchestrator = ChatOrchestrator::new(state.llm.clone());
    let result = orchestrator.answer(&params.query, &connection).await?;
    Ok(Json(result))
}
