//! Field readers over an untyped JSON payload
//!
//! Each reader checks one field and records any violation in the shared
//! `ValidationErrors`, so sibling fields are always checked even when an
//! earlier one failed. Explicit `null` is treated as absent.

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use crate::error_handling::{FieldError, FieldPath, ValidationErrors};
use crate::models::ClosedSet;

/// Outcome of reading an optional field
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Present(T),
    /// Present but rejected; the violation is already recorded
    Invalid,
}

impl<T> Field<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Invalid => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Present(value) => Field::Present(f(value)),
            Field::Invalid => Field::Invalid,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Option<U>>(self, f: F) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Present(value) => f(value).map_or(Field::Invalid, Field::Present),
            Field::Invalid => Field::Invalid,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Field::Invalid)
    }
}

impl<T: Default> Field<T> {
    /// Default for an absent field; the caller's error list already covers `Invalid`
    pub fn or_default(self) -> T {
        match self {
            Field::Present(value) => value,
            Field::Absent | Field::Invalid => T::default(),
        }
    }
}

/// Read access to one JSON object at a known path
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> ObjectReader<'a> {
    /// Reader for `value`, recording a type mismatch if it is not an object
    pub fn open(value: &'a Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self { map, path }),
            other => {
                errors.push(FieldError::type_mismatch(path, "object", other));
                None
            }
        }
    }

    /// Reader for the request payload itself
    pub fn root(value: &'a Value, errors: &mut ValidationErrors) -> Option<Self> {
        Self::open(value, FieldPath::root(), errors)
    }

    pub fn path(&self, key: &'static str) -> FieldPath {
        self.path.key(key)
    }

    fn member(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub fn optional(&self, key: &'static str) -> Option<&'a Value> {
        self.member(key)
    }

    pub fn required(&self, key: &'static str, errors: &mut ValidationErrors) -> Option<&'a Value> {
        let value = self.member(key);
        if value.is_none() {
            errors.push(FieldError::missing(self.path(key)));
        }
        value
    }

    pub fn required_object(&self, key: &'static str, errors: &mut ValidationErrors) -> Option<ObjectReader<'a>> {
        let value = self.required(key, errors)?;
        Self::open(value, self.path(key), errors)
    }

    pub fn optional_object(&self, key: &'static str, errors: &mut ValidationErrors) -> Field<ObjectReader<'a>> {
        match self.member(key) {
            None => Field::Absent,
            Some(value) => Self::open(value, self.path(key), errors).map_or(Field::Invalid, Field::Present),
        }
    }

    /// Required string of non-zero length; content is kept as supplied
    pub fn required_string(&self, key: &'static str, errors: &mut ValidationErrors) -> Option<String> {
        let value = self.required(key, errors)?;
        non_empty_string(value, self.path(key), errors)
    }

    pub fn optional_string(&self, key: &'static str, errors: &mut ValidationErrors) -> Field<String> {
        match self.member(key) {
            None => Field::Absent,
            Some(Value::String(text)) => Field::Present(text.clone()),
            Some(other) => {
                errors.push(FieldError::type_mismatch(self.path(key), "string", other));
                Field::Invalid
            }
        }
    }

    pub fn optional_bool(&self, key: &'static str, errors: &mut ValidationErrors) -> Field<bool> {
        match self.member(key) {
            None => Field::Absent,
            Some(Value::Bool(flag)) => Field::Present(*flag),
            Some(other) => {
                errors.push(FieldError::type_mismatch(self.path(key), "boolean", other));
                Field::Invalid
            }
        }
    }

    pub fn optional_array(&self, key: &'static str, errors: &mut ValidationErrors) -> Field<&'a Vec<Value>> {
        match self.member(key) {
            None => Field::Absent,
            Some(Value::Array(items)) => Field::Present(items),
            Some(other) => {
                errors.push(FieldError::type_mismatch(self.path(key), "array", other));
                Field::Invalid
            }
        }
    }

    /// Optional array whose elements must all be strings
    pub fn optional_string_list(&self, key: &'static str, errors: &mut ValidationErrors) -> Field<Vec<String>> {
        let path = self.path(key);
        self.optional_array(key, errors)
            .and_then(|items| string_elements(items, &path, errors))
    }

    pub fn required_enum<T: ClosedSet>(&self, key: &'static str, errors: &mut ValidationErrors) -> Option<T> {
        let value = self.required(key, errors)?;
        enum_value(value, self.path(key), errors)
    }

    pub fn optional_enum<T: ClosedSet>(&self, key: &'static str, errors: &mut ValidationErrors) -> Field<T> {
        match self.member(key) {
            None => Field::Absent,
            Some(value) => enum_value(value, self.path(key), errors).map_or(Field::Invalid, Field::Present),
        }
    }

    /// Required integer within `[min, max]`; out-of-range values are rejected, never clamped
    pub fn bounded_integer(&self, key: &'static str, min: i64, max: i64, errors: &mut ValidationErrors) -> Option<u32> {
        let value = self.required(key, errors)?;
        bounded_integer(value, self.path(key), min, max, errors)
    }

    pub fn optional_bounded_integer(
        &self,
        key: &'static str,
        min: i64,
        max: i64,
        errors: &mut ValidationErrors,
    ) -> Field<u32> {
        match self.member(key) {
            None => Field::Absent,
            Some(value) => bounded_integer(value, self.path(key), min, max, errors)
                .map_or(Field::Invalid, Field::Present),
        }
    }
}

pub fn non_empty_string(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<String> {
    match value {
        Value::String(text) if text.is_empty() => {
            errors.push(FieldError::empty(path));
            None
        }
        Value::String(text) => Some(text.clone()),
        other => {
            errors.push(FieldError::type_mismatch(path, "string", other));
            None
        }
    }
}

/// Every element checked; one bad element rejects the list but each is reported
pub fn string_elements(items: &[Value], path: &FieldPath, errors: &mut ValidationErrors) -> Option<Vec<String>> {
    let mut strings = Vec::with_capacity(items.len());
    let mut valid = true;
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(text) => strings.push(text.clone()),
            other => {
                errors.push(FieldError::type_mismatch(path.index(index), "string", other));
                valid = false;
            }
        }
    }
    valid.then_some(strings)
}

pub fn enum_value<T: ClosedSet>(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<T> {
    match value {
        Value::String(text) => {
            let parsed = T::parse(text);
            if parsed.is_none() {
                errors.push(FieldError::invalid_enum(path, text, T::ALLOWED));
            }
            parsed
        }
        other => {
            errors.push(FieldError::type_mismatch(path, "string", other));
            None
        }
    }
}

/// Integral value of a JSON number. `3.0` counts as an integer, `3.5` does not;
/// magnitudes beyond `i64` saturate so they still fail the range check.
fn integral(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(signed) = number.as_i64() {
        return Some(signed);
    }
    if number.as_u64().is_some() {
        return Some(i64::MAX);
    }
    number
        .as_f64()
        .filter(|float| float.is_finite() && float.fract() == 0.0)
        .map(|float| float as i64)
}

/// Range violations quote the number as supplied, not its saturated reading
pub fn bounded_integer(value: &Value, path: FieldPath, min: i64, max: i64, errors: &mut ValidationErrors) -> Option<u32> {
    let Some(number) = integral(value) else {
        errors.push(FieldError::type_mismatch(path, "integer", value));
        return None;
    };
    if number < min || number > max {
        errors.push(FieldError::out_of_range(path, value, min, max));
        return None;
    }
    match u32::try_from(number) {
        Ok(bounded) => Some(bounded),
        Err(_) => {
            errors.push(FieldError::out_of_range(path, value, min, max));
            None
        }
    }
}

/// Compile `pattern` the way index matching uses it (case-insensitive)
pub fn compile_pattern(pattern: &str, path: FieldPath, errors: &mut ValidationErrors) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            errors.push(FieldError::invalid_pattern(path, &err));
            None
        }
    }
}
