//! REST API Server for the query router
//!
//! Exposes routing and chart-intent decisions via HTTP endpoints
//! Integrates with frontend UI

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::chart::{detect_chart_intent, extract_chart_parameters};
use crate::router::QueryRouter;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub router: Arc<QueryRouter>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Routing Endpoint
/// =============================

async fn route_handler(
    State(state): State<ApiState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received routing request: {}", req.query);

    let decision = state.router.route(&req.query).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "view": decision.view,
            "reason": decision.reason,
            "confidence": decision.confidence(),
            "provenance": decision.provenance,
            "entities": decision.entities,
        }))),
    )
}

/// =============================
/// Chart Intent Endpoint
/// =============================

async fn chart_intent_handler(
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let intent = detect_chart_intent(&req.query);
    let params = extract_chart_parameters(&req.query, None);

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "intent": intent,
            "parameters": params,
        }))),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(router: Arc<QueryRouter>) -> Router {
    let state = ApiState { router };

    Router::new()
        .route("/health", get(health))
        .route("/api/route", post(route_handler))
        .route("/api/chart/intent", post(chart_intent_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    router: Arc<QueryRouter>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let app = create_router(router);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
