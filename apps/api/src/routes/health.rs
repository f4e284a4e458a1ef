use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::openapi;

/// GET /health
/// Returns a simple status object with service and API versions.
pub async fn health_handler() -> Json<Value> {
    let api_version = openapi::document()
        .map(|doc| doc.info.version.as_str())
        .ok();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": api_version,
        "service": "agentco-api"
    }))
}

/// GET /openapi.json
/// Serves the embedded OpenAPI document exactly as compiled in.
pub async fn serve_openapi() -> Result<Response, AppError> {
    let raw = openapi::raw_spec()
        .map_err(|e| anyhow::anyhow!("embedded OpenAPI document is unreadable: {e}"))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], raw).into_response())
}
