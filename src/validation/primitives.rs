//! Primitive validators shared by the request validators
//!
//! Each `read_*` function validates one nested value at a given path and
//! records violations; the `validate_*` wrappers expose the same checks as
//! standalone calls returning a `Result`.

use serde_json::Value;

use super::reader::ObjectReader;
use crate::error_handling::{FieldPath, ValidationErrors};
use crate::models::{
    Pagination, SortField, SortOrder, SortSpec, TimeRange, PAGE_MAX, PAGE_MIN, PAGE_SIZE_MAX,
    PAGE_SIZE_MIN,
};

/// Both members mandatory, both bounds inclusive, no clamping
pub fn read_pagination(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<Pagination> {
    let reader = ObjectReader::open(value, path, errors)?;
    let page = reader.bounded_integer("page", PAGE_MIN, PAGE_MAX, errors);
    let page_size = reader.bounded_integer("page_size", PAGE_SIZE_MIN, PAGE_SIZE_MAX, errors);

    Some(Pagination {
        page: page?,
        page_size: page_size?,
    })
}

/// Non-empty opaque timestamps, stored exactly as supplied; ordering is not checked
pub fn read_time_range(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<TimeRange> {
    let reader = ObjectReader::open(value, path, errors)?;
    let start = reader.required_string("start", errors);
    let end = reader.required_string("end", errors);

    Some(TimeRange {
        start: start?,
        end: end?,
    })
}

/// Absent object or absent member falls back to `{timestamp, desc}` member by member
pub fn read_sort(value: Option<&Value>, path: FieldPath, errors: &mut ValidationErrors) -> Option<SortSpec> {
    let Some(value) = value else {
        return Some(SortSpec::default());
    };
    let reader = ObjectReader::open(value, path, errors)?;
    let field = reader.optional_enum::<SortField>("field", errors);
    let order = reader.optional_enum::<SortOrder>("order", errors);
    if field.is_invalid() || order.is_invalid() {
        return None;
    }

    Some(SortSpec {
        field: field.or_default(),
        order: order.or_default(),
    })
}

fn finish<T>(value: Option<T>, errors: ValidationErrors) -> Result<T, ValidationErrors> {
    match value {
        Some(value) if errors.is_empty() => Ok(value),
        _ => Err(errors),
    }
}

pub fn validate_pagination(raw: &Value) -> Result<Pagination, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let pagination = read_pagination(raw, FieldPath::root().key("pagination"), &mut errors);
    finish(pagination, errors)
}

pub fn validate_time_range(raw: &Value) -> Result<TimeRange, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let time_range = read_time_range(raw, FieldPath::root().key("time_range"), &mut errors);
    finish(time_range, errors)
}

/// `None` stands for an omitted sort object
pub fn validate_sort(raw: Option<&Value>) -> Result<SortSpec, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let sort = read_sort(raw, FieldPath::root().key("sort"), &mut errors);
    finish(sort, errors)
}

/// Shared by every validator that takes a time range
pub(crate) fn required_time_range(
    reader: &ObjectReader<'_>,
    errors: &mut ValidationErrors,
) -> Option<TimeRange> {
    let value = reader.required("time_range", errors)?;
    read_time_range(value, reader.path("time_range"), errors)
}

pub(crate) fn optional_sort(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<SortSpec> {
    read_sort(reader.optional("sort"), reader.path("sort"), errors)
}
