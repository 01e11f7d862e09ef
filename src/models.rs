//! Normalized Request Models
//!
//! Typed, fully-defaulted request objects produced by the validators. Every
//! closed-set field is an enum, so a value outside the set cannot exist once a
//! request has been validated. Optional filters stay `Option` so that "no
//! filter" and "filter matching nothing" remain distinguishable downstream.
//!
//! All types serialize back to the wire shape they were read from, which is
//! what makes re-validating a normalized request a no-op.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive bounds of `pagination.page`
pub const PAGE_MIN: i64 = 1;
pub const PAGE_MAX: i64 = 100_000;

/// Inclusive bounds of `pagination.page_size`
pub const PAGE_SIZE_MIN: i64 = 1;
pub const PAGE_SIZE_MAX: i64 = 200;

/// Inclusive bounds of `interval_seconds` for index discovery
pub const DISCOVERY_INTERVAL_MIN: i64 = 5;
pub const DISCOVERY_INTERVAL_MAX: i64 = 3600;

/// Enumeration whose wire values form a closed set of strings
pub trait ClosedSet: Sized + Copy + 'static {
    /// Accepted wire values, in declaration order
    const ALLOWED: &'static [&'static str];

    /// Exact, case-sensitive match against `ALLOWED`
    fn parse(value: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl ClosedSet for $name {
            const ALLOWED: &'static [&'static str] = &[$($wire),+];

            fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Page-based position; both fields are mandatory, bounds are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Number of hits skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Opaque timestamps; format and ordering are left to the execution engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Log filters. `None` means the filter is not applied at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQueryFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl LogQueryFilters {
    pub fn is_unfiltered(&self) -> bool {
        self.level.is_none() && self.service.is_none() && self.keyword.is_none()
    }
}

closed_set! {
    /// Field a log search is ordered by
    pub enum SortField {
        Timestamp => "timestamp",
        /// Relevance score of a keyword match
        Score => "_score",
    }
}

impl Default for SortField {
    fn default() -> Self {
        SortField::Timestamp
    }
}

closed_set! {
    pub enum SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

/// Sort specification, defaults to newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub field: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

closed_set! {
    /// Retrieval strategy of a log search
    pub enum QueryMode {
        /// Offset pagination driven by `pagination.page`
        Page => "page",
        /// `search_after` style iteration driven by `cursor_after`
        Cursor => "cursor",
    }
}

impl Default for QueryMode {
    fn default() -> Self {
        QueryMode::Page
    }
}

/// One element of an opaque cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CursorValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for CursorValue {
    fn from(value: &str) -> Self {
        CursorValue::Text(value.to_string())
    }
}

impl From<i64> for CursorValue {
    fn from(value: i64) -> Self {
        CursorValue::Number(value.into())
    }
}

/// Validated log search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQueryRequest {
    pub tenant_id: String,
    pub pagination: Pagination,
    pub time_range: TimeRange,
    #[serde(default)]
    pub filters: LogQueryFilters,
    #[serde(default)]
    pub sort: SortSpec,
    #[serde(default)]
    pub mode: QueryMode,
    /// Carried as supplied; only meaningful in cursor mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_after: Option<Vec<CursorValue>>,

    // Dynamic index selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_keyword: Option<String>,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_indexes: Option<Vec<String>>,
}

impl LogQueryRequest {
    pub fn is_cursor_mode(&self) -> bool {
        self.mode == QueryMode::Cursor
    }

    /// Cursor to continue after; `None` in page mode even if one was supplied
    pub fn search_after(&self) -> Option<&[CursorValue]> {
        match self.mode {
            QueryMode::Cursor => self.cursor_after.as_deref(),
            QueryMode::Page => None,
        }
    }

    /// Hit offset for page mode; cursor mode never skips by offset
    pub fn offset(&self) -> Option<u64> {
        match self.mode {
            QueryMode::Page => Some(self.pagination.offset()),
            QueryMode::Cursor => None,
        }
    }
}

closed_set! {
    pub enum Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

/// Reference to an alert rule; the rule's own severity is free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRuleRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// Validated alert search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsQueryRequest {
    pub tenant_id: String,
    pub time_range: TimeRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Vec<Severity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<AlertRuleRef>>,
}

closed_set! {
    /// Aggregation dimension of a stats request
    pub enum GroupBy {
        Service => "service",
        Level => "level",
        Host => "host",
    }
}

/// Validated statistics request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRequest {
    pub tenant_id: String,
    pub time_range: TimeRange,
    pub group_by: GroupBy,
}

/// Partial update of the index discovery settings; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDiscoveryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_patterns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_patterns: Option<Vec<String>>,
}

impl IndexDiscoveryConfig {
    pub fn is_noop(&self) -> bool {
        self.enabled.is_none()
            && self.interval_seconds.is_none()
            && self.include_patterns.is_none()
            && self.exclude_patterns.is_none()
    }
}
