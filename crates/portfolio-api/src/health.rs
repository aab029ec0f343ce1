use axum::Json;
use chrono::Utc;
use serde_json::Value;

use portfolio_types::api::{HealthStatus, ServiceInfo};
use portfolio_types::envelope::Envelope;

use crate::error::ApiError;

/// GET /api/health
pub async fn health() -> Json<Envelope<HealthStatus>> {
    Json(Envelope::ok(
        "Service is healthy",
        HealthStatus {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        },
    ))
}

/// GET /api/
pub async fn index() -> Json<Envelope<ServiceInfo>> {
    Json(Envelope::ok(
        "Portfolio API",
        ServiceInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    ))
}

/// Unknown routes still answer with an envelope.
pub async fn not_found() -> Result<Json<Envelope<Value>>, ApiError> {
    Err(ApiError::NotFound("No such route".into()))
}

/// Known route, wrong method.
pub async fn method_not_allowed() -> Result<Json<Envelope<Value>>, ApiError> {
    Err(ApiError::MethodNotAllowed)
}
