use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /
/// Root status endpoint kept for platform health probes.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Journal API is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "journal-api"
    }))
}
