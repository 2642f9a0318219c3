// REST endpoints for invoking tools outside of MCP

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use rmcp::model::JsonObject;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::tools::{DispatchError, ToolContext, ToolRegistry};

pub type AppState = Arc<ToolRegistry>;

type ApiError = (StatusCode, Json<Value>);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

async fn list_tools(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let tools = state.list_tools();

    Ok(Json(json!({
        "tools": tools,
        "count": tools.len(),
    })))
}

/// Invoke a tool once. The request body is the argument object; an empty
/// body is treated as `{}`.
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<JsonObject>>,
) -> Result<Json<Value>, ApiError> {
    let args = body.map(|Json(args)| args).unwrap_or_default();

    let result = state
        .dispatch(&name, args, &ToolContext::new())
        .await
        .map_err(|e| match e {
            DispatchError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": e.to_string() })),
            ),
            DispatchError::Validation(ref v) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": e.to_string(), "details": v.to_json() })),
            ),
        })?;

    let body = serde_json::to_value(&result).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to serialize result: {}", e) })),
        )
    })?;

    Ok(Json(body))
}
