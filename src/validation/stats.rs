//! Statistics request validation

use serde_json::Value;
use tracing::debug;

use super::primitives::required_time_range;
use super::reader::ObjectReader;
use super::RequestValidator;
use crate::error_handling::ValidationErrors;
use crate::models::{GroupBy, StatsRequest};

/// Validator for `POST /api/logs/stats`; no optional fields, no cross-field rule
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsQueryValidator;

impl StatsQueryValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestValidator for StatsQueryValidator {
    type Request = StatsRequest;

    fn operation(&self) -> &'static str {
        "logs.stats"
    }

    fn check(&self, raw: &Value, errors: &mut ValidationErrors) -> Option<StatsRequest> {
        let reader = ObjectReader::root(raw, errors)?;

        let tenant_id = reader.required_string("tenant_id", errors);
        let time_range = required_time_range(&reader, errors);
        let group_by = reader.required_enum::<GroupBy>("group_by", errors);

        Some(StatsRequest {
            tenant_id: tenant_id?,
            time_range: time_range?,
            group_by: group_by?,
        })
    }

    fn on_accepted(&self, request: &StatsRequest) {
        debug!(
            "Stats query validated for tenant: {} (group_by: {})",
            request.tenant_id, request.group_by
        );
    }
}
