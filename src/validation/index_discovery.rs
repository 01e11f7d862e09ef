//! Index discovery settings update validation

use serde_json::Value;
use tracing::debug;

use super::reader::{compile_pattern, Field, ObjectReader};
use super::RequestValidator;
use crate::error_handling::ValidationErrors;
use crate::models::{IndexDiscoveryConfig, DISCOVERY_INTERVAL_MAX, DISCOVERY_INTERVAL_MIN};

/// Validator for `POST /api/indices/config`; every field is optional
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexDiscoveryConfigValidator;

impl IndexDiscoveryConfigValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestValidator for IndexDiscoveryConfigValidator {
    type Request = IndexDiscoveryConfig;

    fn operation(&self) -> &'static str {
        "indices.config"
    }

    fn check(&self, raw: &Value, errors: &mut ValidationErrors) -> Option<IndexDiscoveryConfig> {
        let reader = ObjectReader::root(raw, errors)?;

        let enabled = reader.optional_bool("enabled", errors);
        let interval_seconds = reader.optional_bounded_integer(
            "interval_seconds",
            DISCOVERY_INTERVAL_MIN,
            DISCOVERY_INTERVAL_MAX,
            errors,
        );
        let include_patterns = read_patterns(&reader, "include_patterns", errors);
        let exclude_patterns = read_patterns(&reader, "exclude_patterns", errors);

        Some(IndexDiscoveryConfig {
            enabled: enabled.into_option(),
            interval_seconds: interval_seconds.into_option(),
            include_patterns: include_patterns.into_option(),
            exclude_patterns: exclude_patterns.into_option(),
        })
    }

    fn on_accepted(&self, request: &IndexDiscoveryConfig) {
        if request.is_noop() {
            debug!("Index discovery update validated with no changes");
        } else {
            debug!("Index discovery update validated: {:?}", request);
        }
    }
}

/// Every pattern must compile; each failing element is reported
fn read_patterns(
    reader: &ObjectReader<'_>,
    key: &'static str,
    errors: &mut ValidationErrors,
) -> Field<Vec<String>> {
    let path = reader.path(key);
    reader.optional_string_list(key, errors).and_then(|patterns| {
        let mut valid = true;
        for (index, pattern) in patterns.iter().enumerate() {
            if compile_pattern(pattern, path.index(index), errors).is_none() {
                valid = false;
            }
        }
        valid.then_some(patterns)
    })
}
