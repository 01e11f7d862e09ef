//! Alert search request validation

use serde_json::Value;
use tracing::debug;

use super::primitives::required_time_range;
use super::reader::{enum_value, Field, ObjectReader};
use super::RequestValidator;
use crate::error_handling::{FieldPath, ValidationErrors};
use crate::models::{AlertRuleRef, AlertsQueryRequest, Severity};

/// Validator for `POST /api/logs/alerts`
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertsQueryValidator;

impl AlertsQueryValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestValidator for AlertsQueryValidator {
    type Request = AlertsQueryRequest;

    fn operation(&self) -> &'static str {
        "logs.alerts"
    }

    fn check(&self, raw: &Value, errors: &mut ValidationErrors) -> Option<AlertsQueryRequest> {
        let reader = ObjectReader::root(raw, errors)?;

        let tenant_id = reader.required_string("tenant_id", errors);
        let time_range = required_time_range(&reader, errors);
        let severity = read_severity(&reader, errors);
        let rules = read_rules(&reader, errors);
        if severity.is_invalid() || rules.is_invalid() {
            return None;
        }

        Some(AlertsQueryRequest {
            tenant_id: tenant_id?,
            time_range: time_range?,
            severity: severity.into_option(),
            rules: rules.into_option(),
        })
    }

    fn on_accepted(&self, request: &AlertsQueryRequest) {
        debug!(
            "Alerts query validated for tenant: {} ({} severities, {} rules)",
            request.tenant_id,
            request.severity.as_ref().map_or(0, Vec::len),
            request.rules.as_ref().map_or(0, Vec::len)
        );
    }
}

/// Any invalid element rejects the whole list; each offending index is reported
fn read_severity(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Field<Vec<Severity>> {
    let path = reader.path("severity");
    reader.optional_array("severity", errors).and_then(|items| {
        let parsed: Vec<Option<Severity>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| enum_value::<Severity>(item, path.index(index), errors))
            .collect();
        parsed.into_iter().collect()
    })
}

fn read_rules(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Field<Vec<AlertRuleRef>> {
    let path = reader.path("rules");
    reader.optional_array("rules", errors).and_then(|items| {
        let parsed: Vec<Option<AlertRuleRef>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| read_rule(item, path.index(index), errors))
            .collect();
        parsed.into_iter().collect()
    })
}

fn read_rule(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<AlertRuleRef> {
    let rule = ObjectReader::open(value, path, errors)?;
    let id = rule.required_string("id", errors);
    let severity = rule.optional_string("severity", errors);
    if severity.is_invalid() {
        return None;
    }

    Some(AlertRuleRef {
        id: id?,
        severity: severity.into_option(),
    })
}
