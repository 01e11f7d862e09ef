//! Handlers module for the contract ingress
//!
//! The ingress only validates: it never plans or executes queries. Each
//! endpoint answers with the normalized request or the full violation list.

pub mod health;
pub mod requests;

use axum::{
    routing::{get, post},
    Router,
};

pub use health::healthz;
pub use requests::{validate_alerts, validate_index_config, validate_log_query, validate_stats};

/// Router exposing every validation endpoint
pub fn create_router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/logs/query", post(validate_log_query))
        .route("/api/logs/alerts", post(validate_alerts))
        .route("/api/logs/stats", post(validate_stats))
        .route("/api/indices/config", post(validate_index_config))
}
