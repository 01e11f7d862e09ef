//! Request validation
//!
//! One stateless validator per operation. Every validator runs a structural
//! pass (per-field shape, range and enum checks plus defaulting) followed by a
//! semantic pass (cross-field rules), and reports all violations at once.

pub mod alerts;
pub mod index_discovery;
pub mod log_query;
pub mod primitives;
pub mod reader;
pub mod stats;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error_handling::{ContractError, ContractResult, ValidationErrors};

pub use alerts::AlertsQueryValidator;
pub use index_discovery::IndexDiscoveryConfigValidator;
pub use log_query::LogQueryValidator;
pub use primitives::{validate_pagination, validate_sort, validate_time_range};
pub use stats::StatsQueryValidator;

/// Turns an untyped payload into a normalized request or a complete error list
pub trait RequestValidator: Send + Sync {
    type Request: Serialize;

    /// Name used in logs
    fn operation(&self) -> &'static str;

    /// Run every check, recording violations in `errors`.
    ///
    /// Returns `None` when a required part could not be read; any `Some`
    /// returned alongside a non-empty `errors` is discarded.
    fn check(&self, raw: &Value, errors: &mut ValidationErrors) -> Option<Self::Request>;

    fn on_accepted(&self, _request: &Self::Request) {}

    fn validate(&self, raw: &Value) -> Result<Self::Request, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let request = self.check(raw, &mut errors);
        match request {
            Some(request) if errors.is_empty() => {
                self.on_accepted(&request);
                Ok(request)
            }
            _ => {
                debug_assert!(!errors.is_empty(), "rejected request must carry violations");
                debug!(
                    "{} request rejected with {} violation(s)",
                    self.operation(),
                    errors.len()
                );
                Err(errors)
            }
        }
    }
}

/// Operations exposed by the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LogQuery,
    Alerts,
    Stats,
    IndexConfig,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::LogQuery,
        Operation::Alerts,
        Operation::Stats,
        Operation::IndexConfig,
    ];

    /// Name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogQuery => "logs",
            Self::Alerts => "alerts",
            Self::Stats => "stats",
            Self::IndexConfig => "index-config",
        }
    }

    /// Validate `raw` and return the normalized request as JSON
    pub fn validate(&self, raw: &Value) -> ContractResult<Value> {
        match self {
            Self::LogQuery => normalized(&LogQueryValidator, raw),
            Self::Alerts => normalized(&AlertsQueryValidator, raw),
            Self::Stats => normalized(&StatsQueryValidator, raw),
            Self::IndexConfig => normalized(&IndexDiscoveryConfigValidator, raw),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ContractError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == name)
            .ok_or_else(|| ContractError::UnknownOperation(name.to_string()))
    }
}

fn normalized<V: RequestValidator>(validator: &V, raw: &Value) -> ContractResult<Value> {
    let request = validator.validate(raw)?;
    Ok(serde_json::to_value(request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_names_round_trip() {
        for operation in Operation::ALL {
            assert_eq!(operation.as_str().parse::<Operation>().unwrap(), operation);
        }
        assert!(matches!(
            "metrics".parse::<Operation>(),
            Err(ContractError::UnknownOperation(name)) if name == "metrics"
        ));
    }

    #[test]
    fn test_operation_validate_returns_normalized_json() {
        let raw = json!({
            "tenant_id": "acme",
            "time_range": { "start": "now-1d", "end": "now" },
            "group_by": "host",
            "ignored": true
        });

        let normalized = Operation::Stats.validate(&raw).unwrap();
        assert_eq!(normalized, json!({
            "tenant_id": "acme",
            "time_range": { "start": "now-1d", "end": "now" },
            "group_by": "host"
        }));
    }

    #[test]
    fn test_operation_validate_wraps_errors() {
        let result = Operation::Alerts.validate(&json!([]));
        match result {
            Err(ContractError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
