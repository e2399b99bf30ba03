// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Driver HTTP server
//!
//! Routes:
//! - `GET /` usage banner
//! - `GET /query?search=` intent retrieval over the home catalog
//! - `POST /events[?branch=]` event ingestion into the process pool
//! - `POST /pool/query` lake query against the process pool
//! - `GET /health`, `GET /metrics`

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use digi_core::application::PoolHandle;
use digi_core::domain::event::records_from_value;
use digi_intent::application::RetrievalService;
use digi_intent::infrastructure::HomeCatalog;

const BANNER: &str = "digi driver\n\
    \n\
    GET  /query?search=<text>   most relevant homes for <text>\n\
    POST /events[?branch=]      append event records to the pool\n\
    POST /pool/query            run a lake query against the pool\n\
    GET  /health\n";

// Application state
pub struct AppState {
    pub pool: PoolHandle,
    pub retrieval: RetrievalService,
    pub catalog: HomeCatalog,
    pub default_branch: String,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Load the catalog and return the best matching home documents.
    pub async fn search(&self, query: &str) -> Result<Vec<Value>> {
        let homes = self
            .catalog
            .load()
            .await
            .context("Failed to load home catalog")?;
        let matched = self.retrieval.search(query, &homes).await?;
        Ok(matched.into_iter().map(|h| h.as_value().clone()).collect())
    }
}

pub fn router(state: AppState, metrics_path: &str) -> Router {
    let metrics_enabled = state.metrics.is_some();

    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/query", get(query_handler))
        .route("/events", post(events_handler))
        .route("/pool/query", post(pool_query_handler))
        .route("/health", get(health_handler));

    if metrics_enabled {
        app = app.route(metrics_path, get(metrics_handler));
    }

    app.layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn run(state: AppState, addr: &str, metrics_path: &str) -> Result<()> {
    let app = router(state, metrics_path);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("digi driver listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("digi driver shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    search: String,
}

#[derive(Debug, Deserialize)]
pub struct BranchParams {
    branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PoolQueryRequest {
    query: String,
}

fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (status, Json(json!({ "error": message.to_string() }))).into_response()
}

async fn index_handler() -> &'static str {
    BANNER
}

async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    debug!("intent query {:?}", params.search);
    match state.search(&params.search).await {
        Ok(homes) => Json(json!({ "homes": homes })).into_response(),
        Err(e) => {
            error!("Intent query {:?} failed: {:#}", params.search, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        }
    }
}

/// Accepts one record or an array of records. Write failures are logged by
/// the pool and never reach the caller.
async fn events_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BranchParams>,
    Json(body): Json<Value>,
) -> Response {
    let Some(records) = records_from_value(body) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "expected an event object or an array of event objects",
        );
    };

    let branch = params
        .branch
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| state.default_branch.clone());
    let count = records.len();
    state.pool.load(records, &branch).await;

    (
        StatusCode::ACCEPTED,
        Json(json!({ "accepted": count, "branch": branch })),
    )
        .into_response()
}

async fn pool_query_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PoolQueryRequest>,
) -> Response {
    match state.pool.query(&request.query).await {
        Ok(records) => Json(json!({ "records": records })).into_response(),
        Err(e) => {
            error!("Pool query {:?} failed: {}", request.query, e);
            error_response(StatusCode::BAD_GATEWAY, e)
        }
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "pool": state.pool.stream(),
        "stats": state.pool.stats(),
    }))
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
