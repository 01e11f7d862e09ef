//! Health check handler

use axum::response::Json;
use serde_json::{json, Value};
use tracing::debug;

use crate::response::{ContractResponse, I18nKey};

/// Liveness probe; the ingress has no dependencies to check
pub async fn healthz() -> Json<ContractResponse<Value>> {
    debug!("Health check requested");
    Json(ContractResponse::ok(I18nKey::INFO_HEALTH_OK, json!({ "status": "ok" })))
}
