//! Error handling for the request contract
//! Field-level violations are collected as data; everything else is a `ContractError`

use std::fmt;

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::response::{ContractResponse, I18nKey, ResponseCode};

/// Classification of a single field violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field absent (or an empty required string)
    MissingField,
    /// Value present but of the wrong shape or type
    TypeMismatch,
    /// Numeric bound violated
    OutOfRange,
    /// Value outside a closed set
    InvalidEnum,
    /// Fields are individually valid but inconsistent with each other
    CrossFieldViolation,
    /// String that must compile as a regular expression does not
    InvalidPattern,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::TypeMismatch => "type_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnum => "invalid_enum",
            Self::CrossFieldViolation => "cross_field_violation",
            Self::InvalidPattern => "invalid_pattern",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

/// Location of a value inside the request payload, e.g. `rules[0].id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Path of the payload itself
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, name: &'static str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if position == 0 => f.write_str(name)?,
                PathSegment::Key(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// One violation, addressable by field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field_path: FieldPath,
    pub error_kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new<S: Into<String>>(field_path: FieldPath, error_kind: ErrorKind, message: S) -> Self {
        Self {
            field_path,
            error_kind,
            message: message.into(),
        }
    }

    pub fn missing(field_path: FieldPath) -> Self {
        Self::new(field_path, ErrorKind::MissingField, "required field is missing")
    }

    pub fn empty(field_path: FieldPath) -> Self {
        Self::new(field_path, ErrorKind::MissingField, "must not be empty")
    }

    pub fn type_mismatch(field_path: FieldPath, expected: &str, found: &serde_json::Value) -> Self {
        let message = format!("expected {}, found {}", expected, json_type_name(found));
        Self::new(field_path, ErrorKind::TypeMismatch, message)
    }

    pub fn out_of_range<V: fmt::Display>(field_path: FieldPath, value: V, min: i64, max: i64) -> Self {
        let message = format!("must be between {} and {} (inclusive), got {}", min, max, value);
        Self::new(field_path, ErrorKind::OutOfRange, message)
    }

    pub fn invalid_enum(field_path: FieldPath, value: &str, allowed: &[&str]) -> Self {
        let message = format!("'{}' is not one of: {}", value, allowed.join(", "));
        Self::new(field_path, ErrorKind::InvalidEnum, message)
    }

    pub fn cross_field<S: Into<String>>(field_path: FieldPath, message: S) -> Self {
        Self::new(field_path, ErrorKind::CrossFieldViolation, message)
    }

    pub fn invalid_pattern(field_path: FieldPath, reason: &regex::Error) -> Self {
        // syntax errors span several lines; the last one names the problem
        let rendered = reason.to_string();
        let summary = rendered.lines().last().unwrap_or_default().trim();
        let message = format!("not a valid regular expression: {}", summary);
        Self::new(field_path, ErrorKind::InvalidPattern, message)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.field_path, self.error_kind, self.message)
    }
}

/// Name of a JSON value's type as reported in type mismatch messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Every violation found while validating one request.
///
/// Returned from a validator only when non-empty. Entries keep the order in
/// which the checks ran, which follows the field order of the request shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// First violation reported at `path`, if any
    pub fn at(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field_path == path)
    }

    pub fn contains(&self, kind: ErrorKind, path: &str) -> bool {
        self.errors
            .iter()
            .any(|error| error.error_kind == kind && error.field_path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, error) in self.errors.iter().enumerate() {
            if position > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        info!(
            "Request {} rejected with {} violation(s)",
            request_id,
            self.len()
        );

        let body = ContractResponse::new(
            ResponseCode::BadInput,
            I18nKey::ERROR_INVALID_PARAM,
            json!({ "errors": self, "request_id": request_id }),
        );
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Failures outside field validation: unreadable input, malformed JSON, bad configuration
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Request failed validation:\n{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Body could not be read, e.g. it exceeds the configured size limit
    #[error("Unreadable request body: {message}")]
    Body { status: StatusCode, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl ContractError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn io<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn response_code(&self) -> ResponseCode {
        match self {
            Self::Validation(_) | Self::Json(_) | Self::Body { .. } | Self::UnknownOperation(_) => {
                ResponseCode::BadInput
            }
            Self::Io { .. } | Self::Configuration { .. } => ResponseCode::InternalError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::Body { status, .. } => *status,
            Self::UnknownOperation(_) => StatusCode::NOT_FOUND,
            Self::Io { .. } | Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContractError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.response_code();
        match self {
            Self::Validation(errors) => errors.into_response(),
            Self::Json(err) => {
                info!("Client error: malformed JSON body: {}", err);
                let body = ContractResponse::new(
                    code,
                    I18nKey::ERROR_BAD_INPUT,
                    json!({ "message": err.to_string() }),
                );
                (status, Json(body)).into_response()
            }
            Self::Body { message, .. } => {
                info!("Client error: unreadable body ({}): {}", status, message);
                let body = ContractResponse::new(code, I18nKey::ERROR_BAD_INPUT, json!({ "message": message }));
                (status, Json(body)).into_response()
            }
            other => {
                error!("Internal error: {}", other);
                let body = ContractResponse::new(code, I18nKey::ERROR_INTERNAL, json!({}));
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<BytesRejection> for ContractError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Result type alias for contract operations
pub type ContractResult<T> = std::result::Result<T, ContractError>;
