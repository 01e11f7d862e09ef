//! Validation endpoints
//!
//! Bodies are read as raw bytes and parsed as untyped JSON here, so that
//! malformed JSON and contract violations get distinct responses. Body
//! rejections (size limit included) are answered in the same envelope.

use axum::{body::Bytes, extract::rejection::BytesRejection, response::Json};
use serde_json::Value;

use crate::error_handling::{ContractError, ContractResult};
use crate::models::{AlertsQueryRequest, IndexDiscoveryConfig, LogQueryRequest, StatsRequest};
use crate::response::{ContractResponse, I18nKey};
use crate::validation::{
    AlertsQueryValidator, IndexDiscoveryConfigValidator, LogQueryValidator, RequestValidator,
    StatsQueryValidator,
};

type Accepted<T> = Json<ContractResponse<T>>;

fn parse_body(body: &Bytes) -> ContractResult<Value> {
    Ok(serde_json::from_slice(body)?)
}

type RawBody = Result<Bytes, BytesRejection>;

fn run<V: RequestValidator>(validator: V, i18n_key: &str, body: RawBody) -> ContractResult<Accepted<V::Request>> {
    let raw = parse_body(&body?)?;
    let request = validator.validate(&raw)?;
    Ok(Json(ContractResponse::ok(i18n_key, request)))
}

/// `POST /api/logs/query`
pub async fn validate_log_query(body: RawBody) -> Result<Accepted<LogQueryRequest>, ContractError> {
    run(LogQueryValidator, I18nKey::INFO_QUERY_OK, body)
}

/// `POST /api/logs/alerts`
pub async fn validate_alerts(body: RawBody) -> Result<Accepted<AlertsQueryRequest>, ContractError> {
    run(AlertsQueryValidator, I18nKey::INFO_ALERTS_OK, body)
}

/// `POST /api/logs/stats`
pub async fn validate_stats(body: RawBody) -> Result<Accepted<StatsRequest>, ContractError> {
    run(StatsQueryValidator, I18nKey::INFO_STATS_OK, body)
}

/// `POST /api/indices/config`
pub async fn validate_index_config(body: RawBody) -> Result<Accepted<IndexDiscoveryConfig>, ContractError> {
    run(IndexDiscoveryConfigValidator, I18nKey::INFO_INDICES_CONFIG_OK, body)
}
