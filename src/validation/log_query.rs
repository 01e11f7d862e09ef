//! Log search request validation
//!
//! Page and cursor retrieval share one request shape. The structural pass
//! checks and defaults every field; the semantic pass then enforces that a
//! cursor-mode request actually carries a cursor.

use serde_json::Value;
use tracing::debug;

use super::primitives::{optional_sort, read_pagination, required_time_range};
use super::reader::{compile_pattern, non_empty_string, Field, ObjectReader};
use super::RequestValidator;
use crate::error_handling::{FieldError, FieldPath, ValidationErrors};
use crate::models::{CursorValue, LogQueryFilters, LogQueryRequest, QueryMode};

/// Validator for `POST /api/logs/query`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogQueryValidator;

impl LogQueryValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestValidator for LogQueryValidator {
    type Request = LogQueryRequest;

    fn operation(&self) -> &'static str {
        "logs.query"
    }

    fn check(&self, raw: &Value, errors: &mut ValidationErrors) -> Option<LogQueryRequest> {
        let reader = ObjectReader::root(raw, errors)?;

        // Structural pass
        let tenant_id = reader.required_string("tenant_id", errors);
        let pagination = reader
            .required("pagination", errors)
            .and_then(|value| read_pagination(value, reader.path("pagination"), errors));
        let time_range = required_time_range(&reader, errors);
        let filters = read_filters(&reader, errors);
        let sort = optional_sort(&reader, errors);
        let mode = reader.optional_enum::<QueryMode>("mode", errors);
        let cursor_after = read_cursor(&reader, errors);
        let index_keyword = reader.optional_string("index_keyword", errors);
        let use_regex = reader.optional_bool("use_regex", errors);
        let override_indexes = read_override_indexes(&reader, errors);

        if let (Field::Present(keyword), Field::Present(true)) = (&index_keyword, &use_regex) {
            compile_pattern(keyword, reader.path("index_keyword"), errors);
        }

        // Semantic pass; an unrecognised mode has already been reported
        let mode = match mode {
            Field::Invalid => None,
            Field::Absent => Some(QueryMode::Page),
            Field::Present(mode) => Some(mode),
        };
        if mode == Some(QueryMode::Cursor) {
            check_cursor_present(&cursor_after, reader.path("cursor_after"), errors);
        }

        Some(LogQueryRequest {
            tenant_id: tenant_id?,
            pagination: pagination?,
            time_range: time_range?,
            filters: filters?,
            sort: sort?,
            mode: mode?,
            cursor_after: cursor_after.into_option(),
            index_keyword: index_keyword.into_option(),
            use_regex: use_regex.or_default(),
            override_indexes: override_indexes.into_option(),
        })
    }

    fn on_accepted(&self, request: &LogQueryRequest) {
        debug!(
            "Log query validated for tenant: {} (mode: {}, page: {}, page_size: {})",
            request.tenant_id, request.mode, request.pagination.page, request.pagination.page_size
        );
    }
}

/// Omitted filters mean "no filter"; each member keeps its own absence
fn read_filters(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<LogQueryFilters> {
    let filters = match reader.optional_object("filters", errors) {
        Field::Absent => return Some(LogQueryFilters::default()),
        Field::Invalid => return None,
        Field::Present(filters) => filters,
    };
    let level = filters.optional_string_list("level", errors);
    let service = filters.optional_string_list("service", errors);
    let keyword = filters.optional_string("keyword", errors);
    if level.is_invalid() || service.is_invalid() || keyword.is_invalid() {
        return None;
    }

    Some(LogQueryFilters {
        level: level.into_option(),
        service: service.into_option(),
        keyword: keyword.into_option(),
    })
}

/// Shape check applies in every mode; only cursor mode requires a value
fn read_cursor(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Field<Vec<CursorValue>> {
    let path = reader.path("cursor_after");
    reader.optional_array("cursor_after", errors).and_then(|items| {
        let mut cursor = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(text) => cursor.push(CursorValue::Text(text.clone())),
                Value::Number(number) => cursor.push(CursorValue::Number(number.clone())),
                other => {
                    errors.push(FieldError::type_mismatch(path.index(index), "string or number", other));
                    valid = false;
                }
            }
        }
        valid.then_some(cursor)
    })
}

fn check_cursor_present(cursor_after: &Field<Vec<CursorValue>>, path: FieldPath, errors: &mut ValidationErrors) {
    let missing = match cursor_after {
        Field::Absent => true,
        Field::Present(cursor) => cursor.is_empty(),
        // malformed cursor already reported as a type mismatch
        Field::Invalid => false,
    };
    if missing {
        errors.push(FieldError::cross_field(
            path,
            "mode 'cursor' requires a non-empty cursor_after",
        ));
    }
}

fn read_override_indexes(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Field<Vec<String>> {
    let path = reader.path("override_indexes");
    reader.optional_array("override_indexes", errors).and_then(|items| {
        let mut indexes = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            match non_empty_string(item, path.index(index), errors) {
                Some(name) => indexes.push(name),
                None => valid = false,
            }
        }
        valid.then_some(indexes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::models::{SortField, SortOrder};
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "tenant_id": "acme",
            "pagination": { "page": 1, "page_size": 50 },
            "time_range": { "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z" }
        })
    }

    #[test]
    fn test_minimal_request_gets_every_default() {
        let request = LogQueryValidator::new().validate(&minimal()).unwrap();

        assert_eq!(request.tenant_id, "acme");
        assert_eq!(request.mode, QueryMode::Page);
        assert_eq!(request.sort.field, SortField::Timestamp);
        assert_eq!(request.sort.order, SortOrder::Desc);
        assert!(request.filters.is_unfiltered());
        assert_eq!(request.cursor_after, None);
        assert!(!request.use_regex);
    }

    #[test]
    fn test_cursor_mode_without_cursor_is_cross_field_violation() {
        let mut payload = minimal();
        payload["mode"] = json!("cursor");

        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::CrossFieldViolation, "cursor_after"));

        payload["cursor_after"] = json!([]);
        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        assert!(errors.contains(ErrorKind::CrossFieldViolation, "cursor_after"));
    }

    #[test]
    fn test_cursor_mode_with_cursor_succeeds() {
        let mut payload = minimal();
        payload["mode"] = json!("cursor");
        payload["cursor_after"] = json!(["2024-01-01T00:00:00Z", 42]);

        let request = LogQueryValidator::new().validate(&payload).unwrap();
        assert_eq!(
            request.search_after(),
            Some(&[CursorValue::from("2024-01-01T00:00:00Z"), CursorValue::from(42)][..])
        );
    }

    #[test]
    fn test_malformed_cursor_is_type_mismatch_not_cross_field() {
        let mut payload = minimal();
        payload["mode"] = json!("cursor");
        payload["cursor_after"] = json!(["ok", { "nested": true }]);

        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::TypeMismatch, "cursor_after[1]"));
    }

    #[test]
    fn test_unknown_mode_skips_cursor_check() {
        let mut payload = minimal();
        payload["mode"] = json!("scroll");

        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::InvalidEnum, "mode"));
    }

    #[test]
    fn test_structural_and_semantic_errors_are_aggregated() {
        let payload = json!({
            "tenant_id": "",
            "pagination": { "page": 0, "page_size": 10 },
            "filters": { "level": "error" },
            "sort": { "field": "level" },
            "mode": "cursor"
        });

        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        let paths: Vec<String> = errors.iter().map(|error| error.field_path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "tenant_id",
                "pagination.page",
                "time_range",
                "filters.level",
                "sort.field",
                "cursor_after",
            ]
        );
    }

    #[test]
    fn test_regex_index_keyword_must_compile() {
        let mut payload = minimal();
        payload["index_keyword"] = json!("kst-logs-(");
        payload["use_regex"] = json!(true);

        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        assert!(errors.contains(ErrorKind::InvalidPattern, "index_keyword"));

        // the same keyword is a plain substring when regex matching is off
        payload["use_regex"] = json!(false);
        let request = LogQueryValidator::new().validate(&payload).unwrap();
        assert_eq!(request.index_keyword.as_deref(), Some("kst-logs-("));
    }

    #[test]
    fn test_override_indexes_reject_empty_names() {
        let mut payload = minimal();
        payload["override_indexes"] = json!(["logs-2024.01", ""]);

        let errors = LogQueryValidator::new().validate(&payload).unwrap_err();
        assert!(errors.contains(ErrorKind::MissingField, "override_indexes[1]"));
    }
}
