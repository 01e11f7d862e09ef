//! Log Query Contract Library
//!
//! This library validates, normalizes and defaults incoming requests for the
//! multi-tenant log analytics query service before they reach a query
//! planner. Validation is pure and synchronous: every call is independent
//! and safe to run concurrently.
//!
//! # Modules
//!
//! - `models`: Normalized, strongly-typed request objects
//! - `validation`: Per-operation validators and the shared primitives
//! - `error_handling`: Field-addressable violations and the crate error type
//! - `response`: `{code, i18n_key, data}` response envelope
//! - `config`: Ingress service configuration
//! - `handlers`: axum ingress exposing the validators over HTTP

pub mod config;
pub mod error_handling;
pub mod handlers;
pub mod models;
pub mod response;
pub mod validation;

// Re-export the main types for convenience
pub use error_handling::{
    ContractError, ContractResult, ErrorKind, FieldError, FieldPath, ValidationErrors,
};
pub use models::{
    AlertRuleRef, AlertsQueryRequest, CursorValue, GroupBy, IndexDiscoveryConfig,
    LogQueryFilters, LogQueryRequest, Pagination, QueryMode, Severity, SortField, SortOrder,
    SortSpec, StatsRequest, TimeRange,
};
pub use response::{ContractResponse, I18nKey, ResponseCode};
pub use validation::{
    AlertsQueryValidator, IndexDiscoveryConfigValidator, LogQueryValidator, Operation,
    RequestValidator, StatsQueryValidator,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        fn assert_thread_safe<T: Send + Sync>() {}
        assert_thread_safe::<LogQueryValidator>();
        assert_thread_safe::<AlertsQueryValidator>();
        assert_thread_safe::<StatsQueryValidator>();
        assert_thread_safe::<ValidationErrors>();

        assert_eq!(Operation::ALL.len(), 4);
    }
}
