//! HTTP server setup and configuration.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::handlers;
use super::upstream::ChatClient;
use crate::analyzer::QueryAnalyzer;
use crate::config::Config;
use crate::error::Result;
use crate::router::Selector;

/// Response header: correlation ID (UUID v4).
pub const WILLOW_REQUEST_ID_HEADER: &str = "x-willow-request-id";

/// Per-request correlation ID, available to handlers as an extension.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: QueryAnalyzer,
    pub selector: Arc<Selector>,
    pub chat: Arc<ChatClient>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from configuration: validated catalog plus upstream client.
    pub fn new(config: Config) -> Result<Self> {
        let selector = Selector::new(config.catalog()?);
        let chat = ChatClient::from_config(&config.upstream)?;

        Ok(Self {
            analyzer: QueryAnalyzer::new(),
            selector: Arc::new(selector),
            chat: Arc::new(chat),
            config: Arc::new(config),
        })
    }
}

/// Assign a request ID and echo it back as a response header.
async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.0.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(WILLOW_REQUEST_ID_HEADER), value);
    }
    response
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/estimate", post(handlers::estimate))
        .route("/v1/chat", post(handlers::chat))
        .route("/providers", get(handlers::list_providers))
        .route("/health", get(handlers::health))
        // State and middleware
        .with_state(state)
        .layer(middleware::from_fn(assign_request_id))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let listen_addr = config.server.listen.clone();

    let state = AppState::new(config)?;
    tracing::info!(
        providers = state.selector.catalog().available().count(),
        upstream_model = %state.chat.model(),
        "Catalog loaded"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "Starting willow server");

    axum::serve(listener, app).await?;

    Ok(())
}
