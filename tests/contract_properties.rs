//! Contract Property Tests
//!
//! Exercises the public validators the way a caller would: defaulting,
//! error aggregation, closed sets and re-validation of normalized output.

use serde::Serialize;
use serde_json::{json, Value};

use log_query_contract::validation::{validate_pagination, validate_sort, validate_time_range};
use log_query_contract::{
    AlertsQueryValidator, ContractError, ErrorKind, GroupBy, IndexDiscoveryConfigValidator,
    LogQueryValidator, Operation, QueryMode, RequestValidator, SortField, SortOrder,
    StatsQueryValidator,
};

fn log_query() -> Value {
    json!({
        "tenant_id": "acme",
        "pagination": { "page": 3, "page_size": 25 },
        "time_range": { "start": "2024-03-01T00:00:00Z", "end": "2024-03-02T00:00:00Z" }
    })
}

fn assert_revalidates<V>(validator: V, raw: Value)
where
    V: RequestValidator,
    V::Request: Serialize + PartialEq + std::fmt::Debug,
{
    let first = validator.validate(&raw).expect("payload should be valid");
    let normalized = serde_json::to_value(&first).unwrap();
    let second = validator
        .validate(&normalized)
        .expect("normalized output should be valid");
    assert_eq!(first, second);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_are_inclusive() {
        for (page, page_size) in [(1u32, 1u32), (100_000, 200), (42, 50)] {
            let pagination =
                validate_pagination(&json!({ "page": page, "page_size": page_size })).unwrap();
            assert_eq!(pagination.page, page);
            assert_eq!(pagination.page_size, page_size);
        }

        for raw in [
            json!({ "page": 0, "page_size": 10 }),
            json!({ "page": 100_001, "page_size": 10 }),
        ] {
            let errors = validate_pagination(&raw).unwrap_err();
            assert!(errors.contains(ErrorKind::OutOfRange, "pagination.page"));
        }

        let errors = validate_pagination(&json!({ "page": 1, "page_size": 201 })).unwrap_err();
        assert!(errors.contains(ErrorKind::OutOfRange, "pagination.page_size"));
    }

    #[test]
    fn test_pagination_type_errors() {
        let errors = validate_pagination(&json!({ "page": "1", "page_size": 2.5 })).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(ErrorKind::TypeMismatch, "pagination.page"));
        assert!(errors.contains(ErrorKind::TypeMismatch, "pagination.page_size"));

        let errors = validate_pagination(&json!({})).unwrap_err();
        assert!(errors.contains(ErrorKind::MissingField, "pagination.page"));
        assert!(errors.contains(ErrorKind::MissingField, "pagination.page_size"));
    }

    #[test]
    fn test_time_range_requires_both_ends() {
        let errors = validate_time_range(&json!({ "start": "now-1h", "end": "" })).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::MissingField, "time_range.end"));

        // opaque: kept exactly as supplied
        let range = validate_time_range(&json!({ "start": " now-1h ", "end": "now" })).unwrap();
        assert_eq!(range.start, " now-1h ");
    }

    #[test]
    fn test_whitespace_strings_are_non_empty() {
        let request = StatsQueryValidator::new()
            .validate(&json!({
                "tenant_id": " ",
                "time_range": { "start": " ", "end": "now" },
                "group_by": "host"
            }))
            .unwrap();

        assert_eq!(request.tenant_id, " ");
        assert_eq!(request.time_range.start, " ");

        let errors = StatsQueryValidator::new()
            .validate(&json!({
                "tenant_id": "",
                "time_range": { "start": "", "end": "now" },
                "group_by": "host"
            }))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(ErrorKind::MissingField, "tenant_id"));
        assert!(errors.contains(ErrorKind::MissingField, "time_range.start"));
    }

    #[test]
    fn test_out_of_range_quotes_supplied_number() {
        let errors =
            validate_pagination(&json!({ "page": u64::MAX, "page_size": 10 })).unwrap_err();
        let error = errors.at("pagination.page").unwrap();

        assert_eq!(error.error_kind, ErrorKind::OutOfRange);
        assert_eq!(
            error.message,
            "must be between 1 and 100000 (inclusive), got 18446744073709551615"
        );
    }

    #[test]
    fn test_sort_defaults_field_by_field() {
        let sort = validate_sort(None).unwrap();
        assert_eq!((sort.field, sort.order), (SortField::Timestamp, SortOrder::Desc));

        let sort = validate_sort(Some(&json!({ "order": "asc" }))).unwrap();
        assert_eq!((sort.field, sort.order), (SortField::Timestamp, SortOrder::Asc));

        let sort = validate_sort(Some(&json!({ "field": "_score" }))).unwrap();
        assert_eq!((sort.field, sort.order), (SortField::Score, SortOrder::Desc));

        let errors = validate_sort(Some(&json!({ "field": "Timestamp" }))).unwrap_err();
        assert!(errors.contains(ErrorKind::InvalidEnum, "sort.field"));
    }

    #[test]
    fn test_every_violation_is_reported_once() {
        let errors = LogQueryValidator::new()
            .validate(&json!({
                "pagination": { "page": 0, "page_size": 500 },
                "time_range": { "start": "", "end": 7 },
                "sort": { "order": "sideways" }
            }))
            .unwrap_err();

        let reported: Vec<(String, ErrorKind)> = errors
            .iter()
            .map(|error| (error.field_path.to_string(), error.error_kind))
            .collect();
        assert_eq!(
            reported,
            vec![
                ("tenant_id".to_string(), ErrorKind::MissingField),
                ("pagination.page".to_string(), ErrorKind::OutOfRange),
                ("pagination.page_size".to_string(), ErrorKind::OutOfRange),
                ("time_range.start".to_string(), ErrorKind::MissingField),
                ("time_range.end".to_string(), ErrorKind::TypeMismatch),
                ("sort.order".to_string(), ErrorKind::InvalidEnum),
            ]
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let raw = json!({ "tenant_id": 1, "mode": "cursor", "severity": ["bad"] });
        let validator = LogQueryValidator::new();
        assert_eq!(validator.validate(&raw), validator.validate(&raw));
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let mut raw = log_query();
        raw["filters"] = Value::Null;
        raw["sort"] = Value::Null;
        raw["mode"] = Value::Null;

        let request = LogQueryValidator::new().validate(&raw).unwrap();
        assert_eq!(request.mode, QueryMode::Page);
        assert!(request.filters.is_unfiltered());

        raw["tenant_id"] = Value::Null;
        let errors = LogQueryValidator::new().validate(&raw).unwrap_err();
        assert!(errors.contains(ErrorKind::MissingField, "tenant_id"));
    }

    #[test]
    fn test_page_mode_ignores_cursor() {
        let mut raw = log_query();
        raw["cursor_after"] = json!([]);

        let request = LogQueryValidator::new().validate(&raw).unwrap();
        assert_eq!(request.offset(), Some(50));
        assert_eq!(request.search_after(), None);

        raw["cursor_after"] = json!(["2024-01-01T00:00:00Z", 42]);
        let request = LogQueryValidator::new().validate(&raw).unwrap();
        assert_eq!(request.mode, QueryMode::Page);
        assert_eq!(request.search_after(), None);
        assert_eq!(request.offset(), Some(50));
    }

    #[test]
    fn test_normalized_requests_revalidate_unchanged() {
        let mut cursor_query = log_query();
        cursor_query["mode"] = json!("cursor");
        cursor_query["cursor_after"] = json!([1_709_251_200_000_i64, "doc-17"]);
        cursor_query["filters"] = json!({ "level": ["error"], "keyword": "timeout" });
        cursor_query["index_keyword"] = json!("^kst-logs-.*");
        cursor_query["use_regex"] = json!(true);

        assert_revalidates(LogQueryValidator::new(), log_query());
        assert_revalidates(LogQueryValidator::new(), cursor_query);
        assert_revalidates(
            AlertsQueryValidator::new(),
            json!({
                "tenant_id": "acme",
                "time_range": { "start": "now-1d", "end": "now" },
                "severity": ["medium", "high"],
                "rules": [{ "id": "r-1" }, { "id": "r-2", "severity": "warn" }]
            }),
        );
        assert_revalidates(
            StatsQueryValidator::new(),
            json!({
                "tenant_id": "acme",
                "time_range": { "start": "now-1d", "end": "now" },
                "group_by": "service"
            }),
        );
        assert_revalidates(
            IndexDiscoveryConfigValidator::new(),
            json!({ "enabled": true, "interval_seconds": 300, "include_patterns": ["^logs-"] }),
        );
    }

    #[test]
    fn test_closed_sets_are_case_sensitive() {
        let errors = StatsQueryValidator::new()
            .validate(&json!({
                "tenant_id": "acme",
                "time_range": { "start": "a", "end": "b" },
                "group_by": "Host"
            }))
            .unwrap_err();
        let error = errors.at("group_by").unwrap();
        assert_eq!(error.error_kind, ErrorKind::InvalidEnum);
        assert_eq!(error.message, "'Host' is not one of: service, level, host");

        let request = StatsQueryValidator::new()
            .validate(&json!({
                "tenant_id": "acme",
                "time_range": { "start": "a", "end": "b" },
                "group_by": "level"
            }))
            .unwrap();
        assert_eq!(request.group_by, GroupBy::Level);
    }

    #[test]
    fn test_operation_dispatch() {
        let operation: Operation = "logs".parse().unwrap();
        let normalized = operation.validate(&log_query()).unwrap();

        assert_eq!(normalized["mode"], "page");
        assert_eq!(normalized["sort"], json!({ "field": "timestamp", "order": "desc" }));
        assert_eq!(normalized["use_regex"], false);

        match Operation::Stats.validate(&json!({})) {
            Err(ContractError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }
}
