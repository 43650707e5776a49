//! Advanced listing input and its normalisation rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::FieldPath;

/// Smallest offset; negative offsets are raised to it.
pub const OFFSET_MIN: i64 = 0;

/// Default and lower bound of the page size.
pub const LIMIT_MIN: i64 = 20;

/// Upper bound of the page size; larger requests are truncated to it.
pub const LIMIT_MAX: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Case-insensitive `ASC`/`DESC`; anything else is `DESC`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()) {
            Some(s) if s == "ASC" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Resolved ordering of a composed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: FieldPath,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    /// Newest members first.
    fn default() -> Self {
        Self {
            field: FieldPath::MemberCreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// Raw advanced listing request.
///
/// Nothing here is validated: unknown filter keys, invalid directions and
/// out-of-range paging values are resolved by the composer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberQuery {
    pub filters: BTreeMap<String, Value>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl MemberQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a flat parameter map into filters and paging controls.
    ///
    /// Paging values that are not integers (or integer strings) count as
    /// absent.
    pub fn from_params<I>(params: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut query = MemberQuery::new();
        for (key, value) in params {
            match key.as_str() {
                "order_by" => query.order_by = value.as_str().map(str::to_string),
                "direction" => query.direction = value.as_str().map(str::to_string),
                "limit" => query.limit = integer(&value),
                "offset" => query.offset = integer(&value),
                _ => {
                    query.filters.insert(key, value);
                }
            }
        }
        query
    }

    pub fn filter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.filters.insert(key.into(), value);
        self
    }

    pub fn order_by(mut self, key: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order_by = Some(key.into());
        self.direction = Some(direction.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(OFFSET_MIN).max(OFFSET_MIN)
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(LIMIT_MIN).clamp(LIMIT_MIN, LIMIT_MAX)
    }

    pub fn effective_direction(&self) -> SortDirection {
        SortDirection::parse_or_default(self.direction.as_deref())
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
