//! REST API server for the browser extension.
//!
//! Provides HTTP endpoints for:
//! - Service health
//! - Meeting briefings by date, by id, and for the next meeting
//! - Keyword search
//! - Free-form questions to the calendar agent

pub mod error;
pub mod routes;

use crate::agent::CalendarAgent;
use crate::briefing::CalendarResearchAgent;
use crate::config::ServerConfig;
use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use error::{ApiError, ApiResult};

/// Shared, immutable handles used by every route.
///
/// Either handle is `None` when it could not be built at startup; routes
/// then answer with "Calendar agent not available".
#[derive(Clone, Default)]
pub struct AppState {
    pub briefing: Option<Arc<CalendarResearchAgent>>,
    pub agent: Option<Arc<CalendarAgent>>,
}

impl AppState {
    pub fn new(
        briefing: Option<Arc<CalendarResearchAgent>>,
        agent: Option<Arc<CalendarAgent>>,
    ) -> Self {
        Self { briefing, agent }
    }

    pub fn briefing_agent(&self) -> ApiResult<Arc<CalendarResearchAgent>> {
        self.briefing.clone().ok_or_else(ApiError::agent_unavailable)
    }
}

/// Build the full router with CORS applied.
///
/// An empty `cors_origins` list allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(routes::health::router(state.clone()))
        .merge(routes::meetings::router(state.clone()))
        .merge(routes::search::router(state.clone()))
        .merge(routes::ask::router(state))
        .layer(ServiceBuilder::new().layer(cors_layer(cors_origins)))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub struct ApiServer {
    host: String,
    port: u16,
    cors_origins: Vec<String>,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            cors_origins: config.cors_origins.clone(),
            state,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = build_router(self.state, &self.cors_origins);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /health          - Service health");
        info!("  GET  /meetings/:date  - Briefings for a date (YYYY-MM-DD)");
        info!("  GET  /meeting/:id     - Briefing for one meeting");
        info!("  GET  /next-meeting    - Briefing for the next meeting");
        info!("  POST /search-meetings - Briefings matching a keyword");
        info!("  POST /ask             - Ask the calendar agent a question");

        axum::serve(listener, app).await?;

        Ok(())
    }
}
