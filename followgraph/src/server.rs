//! HTTP surface for follower-graph crawls.
//!
//! `GET /followers/{username}` runs one bounded crawl per request and
//! returns the graph as a JSON object keyed by login. The handlers are a
//! thin layer over `followgraph_core::crawl`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use followgraph_core::config::{CrawlLimits, ServerConfig};
use followgraph_core::crawl::{CrawlOptions, execute_crawl};
use followgraph_scanner::{CrawlError, FollowerFetcher, FollowerGraph};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn FollowerFetcher>,
    pub limits: CrawlLimits,
    pub workers: usize,
    pub deadline: Option<Duration>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn FollowerFetcher>, config: &ServerConfig) -> Self {
        Self {
            fetcher,
            limits: config.limits,
            workers: config.workers,
            deadline: config.deadline(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Optional per-request limits; never above the configured ones.
#[derive(Debug, Default, Deserialize)]
pub struct FollowersQuery {
    pub max_followers: Option<usize>,
    pub max_depth: Option<usize>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/followers/{username}", get(get_followers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_followers(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<FollowersQuery>,
) -> Result<Json<FollowerGraph>, (StatusCode, Json<ErrorResponse>)> {
    let limits = state.limits.clamp(query.max_followers, query.max_depth);
    let options = CrawlOptions {
        username: username.clone(),
        limits,
        workers: state.workers,
        deadline: state.deadline,
        show_progress_bars: false,
    };

    match execute_crawl(state.fetcher.clone(), options, None).await {
        Ok(graph) => Ok(Json(graph)),
        Err(e) => Err(crawl_error_response(&username, &e)),
    }
}

/// Maps a crawl failure to a status code and a JSON body.
pub fn crawl_error_response(username: &str, err: &CrawlError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        CrawlError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CrawlError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        CrawlError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
    };

    if status == StatusCode::BAD_GATEWAY {
        error!(%username, error = %err, "Follower crawl failed");
    } else {
        warn!(%username, error = %err, "Follower crawl rejected");
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Binds `config.bind_addr()` and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, fetcher: Arc<dyn FollowerFetcher>) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(fetcher, config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}...", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
