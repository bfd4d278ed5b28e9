//! HTTP chat gateway for Vitae.
//!
//! Serves the conversation loop to a website chat widget. The server keeps
//! no conversation state: clients send the visible history and the turn
//! count with every message and get the updated count back.
//!
//! Built on Axum.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use vitae_agent::{ConversationLoop, TurnState};
use vitae_core::message::{Message, Role};
use vitae_core::provider::ToolDefinition;

/// Shown to the visitor when a turn fails; the real error is only logged.
pub const APOLOGY: &str = "Sorry, something went wrong while answering. Please try again.";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: Arc<ConversationLoop>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(agent: Arc<ConversationLoop>) -> Self {
        Self {
            agent,
            started_at: Utc::now(),
        }
    }
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .route("/tools", get(tools_handler))
        .route("/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &vitae_config::GatewayConfig,
    agent: Arc<ConversationLoop>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = build_router(Arc::new(GatewayState::new(agent)));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    persona: String,
    background_loaded: bool,
    uptime_secs: i64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let persona = state.agent.persona();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.agent.model().to_string(),
        persona: persona.name().to_string(),
        background_loaded: persona.has_background(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

async fn tools_handler() -> Json<Vec<ToolDefinition>> {
    Json(vitae_tools::definitions())
}

/// One prior exchange as the chat widget keeps it.
#[derive(Debug, Deserialize)]
struct HistoryEntry {
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    #[serde(default)]
    user_turns: u32,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    user_turns: u32,
}

/// Keep the user/assistant text the widget displays; tool traffic from a
/// previous turn has no call ids here and cannot be replayed. Entries with
/// null or empty content are dropped.
fn history_messages(entries: Vec<HistoryEntry>) -> Vec<Message> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let content = entry.content.filter(|c| !c.is_empty())?;
            match entry.role {
                Role::User => Some(Message::user(content)),
                Role::Assistant => Some(Message::assistant(content)),
                Role::System | Role::Tool => None,
            }
        })
        .collect()
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    if payload.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "message must not be empty" })),
        )
            .into_response();
    }

    let request_id = uuid::Uuid::new_v4();
    info!(
        request_id = %request_id,
        message_len = payload.message.len(),
        history = payload.history.len(),
        user_turns = payload.user_turns,
        "Chat message received"
    );

    let history = history_messages(payload.history);
    let turn = TurnState::new(payload.user_turns);

    match state.agent.respond(&history, &payload.message, turn).await {
        Ok(reply) => Json(ChatResponse {
            response: reply.text,
            user_turns: reply.turn.user_turns,
        })
        .into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Chat turn failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ChatResponse {
                    response: APOLOGY.to_string(),
                    user_turns: turn.advance().user_turns,
                }),
            )
                .into_response()
        }
    }
}
