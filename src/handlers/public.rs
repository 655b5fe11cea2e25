use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "bloglist-api",
        "version": version,
        "endpoints": {
            "blogs": "/api/blogs[/:id] (GET public, POST/PUT/DELETE require a bearer token)",
            "users": "/api/users (public)",
            "persons": "/api/persons[/:id] (public)",
            "info": "/info (public)",
            "health": "/health (public)",
        }
    }))
}

/// GET /info - phonebook summary page
pub async fn info(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let info = state.persons().info().await?;

    Ok(Html(format!(
        "<p>Phonebook has info for {} people</p>\n<p>{}</p>",
        info.count,
        info.generated_at.to_rfc2822()
    )))
}

/// GET /health - store connectivity probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend_name();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": backend
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed for {} store: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": backend,
                    "store_error": e.to_string()
                })),
            )
        }
    }
}

/// Fallback for every unmatched route
pub async fn unknown_endpoint() -> ApiError {
    ApiError::not_found("unknown endpoint")
}
