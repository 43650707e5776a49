//! Filter kinds and the predicates they produce.
//!
//! A [`FilterKind`] turns the raw (JSON) value supplied for a filter key
//! into a typed [`Predicate`] over a [`FieldPath`]. Raw values are coerced
//! to the field's type here; values that cannot be coerced are rejected
//! with a validation error naming the filter key.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use super::{FieldPath, FieldType};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Typed value a predicate compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Timestamp(Timestamp),
    Date(NaiveDate),
}

impl Operand {
    /// Coerces a raw filter value to `field_type`.
    pub fn coerce(field_type: FieldType, key: &str, raw: &Value) -> Result<Self, ValidationError> {
        let coerced = match field_type {
            FieldType::Integer => match raw {
                Value::Number(n) => n.as_i64().map(Operand::Integer),
                Value::String(s) => s.trim().parse().ok().map(Operand::Integer),
                _ => None,
            },
            FieldType::Text => match raw {
                Value::String(s) => Some(Operand::Text(s.clone())),
                Value::Number(n) => Some(Operand::Text(n.to_string())),
                _ => None,
            },
            FieldType::Boolean => match raw {
                Value::Bool(b) => Some(Operand::Boolean(*b)),
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Some(Operand::Boolean(false)),
                    Some(1) => Some(Operand::Boolean(true)),
                    _ => None,
                },
                Value::String(s) => match s.trim() {
                    "true" | "1" => Some(Operand::Boolean(true)),
                    "false" | "0" => Some(Operand::Boolean(false)),
                    _ => None,
                },
                _ => None,
            },
            FieldType::Timestamp => raw.as_str().and_then(parse_timestamp).map(Operand::Timestamp),
            FieldType::Date => raw.as_str().and_then(parse_date).map(Operand::Date),
        };

        coerced.ok_or_else(|| {
            ValidationError::invalid_format(key, format!("expected {}", describe(field_type)))
        })
    }

    /// Orders two operands of the same type; mixed types are unordered.
    pub fn compare(&self, other: &Operand) -> Option<Ordering> {
        match (self, other) {
            (Operand::Integer(a), Operand::Integer(b)) => Some(a.cmp(b)),
            (Operand::Text(a), Operand::Text(b)) => Some(a.cmp(b)),
            (Operand::Boolean(a), Operand::Boolean(b)) => Some(a.cmp(b)),
            (Operand::Timestamp(a), Operand::Timestamp(b)) => Some(a.cmp(b)),
            (Operand::Date(a), Operand::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn describe(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Integer => "an integer",
        FieldType::Text => "text",
        FieldType::Boolean => "a boolean",
        FieldType::Timestamp => "an RFC 3339 timestamp or YYYY-MM-DD date",
        FieldType::Date => "a YYYY-MM-DD date",
    }
}

fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }
    let midnight = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)?;
    Some(Timestamp::from_datetime(Utc.from_utc_datetime(&midnight)))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}

/// Comparison applied to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Exact match.
    Equals(Operand),
    /// `from <= field <= to`; at least one bound is present.
    Between {
        from: Option<Operand>,
        to: Option<Operand>,
    },
    /// Case-sensitive substring containment.
    Contains(String),
    /// Field is one of the listed values. An empty set matches nothing.
    OneOf(Vec<Operand>),
}

/// A condition bound to a field of the listing join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: FieldPath,
    pub condition: Condition,
}

impl Predicate {
    pub fn new(field: FieldPath, condition: Condition) -> Self {
        Self { field, condition }
    }

    /// Evaluates against a field value. NULL never matches.
    pub fn matches(&self, value: Option<&Operand>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match &self.condition {
            Condition::Equals(expected) => value == expected,
            Condition::Between { from, to } => {
                let above = from.as_ref().map_or(true, |from| {
                    matches!(value.compare(from), Some(Ordering::Greater | Ordering::Equal))
                });
                let below = to.as_ref().map_or(true, |to| {
                    matches!(value.compare(to), Some(Ordering::Less | Ordering::Equal))
                });
                above && below
            }
            Condition::Contains(needle) => match value {
                Operand::Text(text) => text.contains(needle.as_str()),
                _ => false,
            },
            Condition::OneOf(options) => options.iter().any(|option| option == value),
        }
    }
}

/// How a filter key turns its raw value into a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Equality,
    Range,
    TextMatch,
    EnumeratedSet,
}

impl FilterKind {
    /// Whether this kind can be applied to fields of `field_type`.
    pub fn supports(&self, field_type: FieldType) -> bool {
        match self {
            FilterKind::Equality | FilterKind::EnumeratedSet => true,
            FilterKind::Range => field_type.is_ordered(),
            FilterKind::TextMatch => field_type == FieldType::Text,
        }
    }

    /// Builds the predicate for `raw`.
    ///
    /// Returns `Ok(None)` when the value places no constraint: a JSON null,
    /// or a range with neither bound.
    pub fn apply(
        &self,
        key: &str,
        field: FieldPath,
        raw: &Value,
    ) -> Result<Option<Predicate>, ValidationError> {
        if raw.is_null() {
            return Ok(None);
        }
        let field_type = field.field_type();

        let condition = match self {
            FilterKind::Equality => Condition::Equals(Operand::coerce(field_type, key, raw)?),
            FilterKind::Range => {
                let Value::Object(bounds) = raw else {
                    return Err(ValidationError::invalid_format(
                        key,
                        "expected an object with 'from' and/or 'to'",
                    ));
                };
                let bound = |name: &str| -> Result<Option<Operand>, ValidationError> {
                    match bounds.get(name) {
                        None | Some(Value::Null) => Ok(None),
                        Some(value) => Operand::coerce(field_type, key, value).map(Some),
                    }
                };
                let (from, to) = (bound("from")?, bound("to")?);
                if from.is_none() && to.is_none() {
                    return Ok(None);
                }
                Condition::Between { from, to }
            }
            FilterKind::TextMatch => match Operand::coerce(FieldType::Text, key, raw)? {
                Operand::Text(needle) => Condition::Contains(needle),
                _ => return Err(ValidationError::invalid_format(key, "expected text")),
            },
            FilterKind::EnumeratedSet => {
                let options = match raw {
                    Value::Array(values) => values
                        .iter()
                        .filter(|v| !v.is_null())
                        .map(|v| Operand::coerce(field_type, key, v))
                        .collect::<Result<Vec<_>, _>>()?,
                    scalar => vec![Operand::coerce(field_type, key, scalar)?],
                };
                Condition::OneOf(options)
            }
        };

        Ok(Some(Predicate::new(field, condition)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_coerces_numeric_strings() {
        let p = FilterKind::Equality
            .apply("plan_id", FieldPath::PlanId, &json!("42"))
            .unwrap()
            .unwrap();
        assert_eq!(p.condition, Condition::Equals(Operand::Integer(42)));
    }

    #[test]
    fn equality_rejects_non_numeric_value_for_integer_field() {
        let err = FilterKind::Equality
            .apply("plan_id", FieldPath::PlanId, &json!("gold"))
            .unwrap_err();
        assert_eq!(err.field(), "plan_id");
    }

    #[test]
    fn null_value_places_no_constraint() {
        for kind in [
            FilterKind::Equality,
            FilterKind::Range,
            FilterKind::TextMatch,
            FilterKind::EnumeratedSet,
        ] {
            assert_eq!(kind.apply("k", FieldPath::MemberCustomerId, &Value::Null).unwrap(), None);
        }
    }

    #[test]
    fn range_with_one_bound() {
        let p = FilterKind::Range
            .apply("customer_id", FieldPath::MemberCustomerId, &json!({"from": 10}))
            .unwrap()
            .unwrap();
        assert!(p.matches(Some(&Operand::Integer(10))));
        assert!(p.matches(Some(&Operand::Integer(5000))));
        assert!(!p.matches(Some(&Operand::Integer(9))));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let p = FilterKind::Range
            .apply("customer_id", FieldPath::MemberCustomerId, &json!({"from": 1, "to": 3}))
            .unwrap()
            .unwrap();
        assert!(p.matches(Some(&Operand::Integer(1))));
        assert!(p.matches(Some(&Operand::Integer(3))));
        assert!(!p.matches(Some(&Operand::Integer(4))));
    }

    #[test]
    fn range_without_bounds_is_skipped() {
        let p = FilterKind::Range
            .apply("customer_id", FieldPath::MemberCustomerId, &json!({"from": null}))
            .unwrap();
        assert_eq!(p, None);
    }

    #[test]
    fn range_requires_object() {
        assert!(FilterKind::Range
            .apply("customer_id", FieldPath::MemberCustomerId, &json!(5))
            .is_err());
    }

    #[test]
    fn text_match_is_case_sensitive_containment() {
        let p = FilterKind::TextMatch
            .apply("fullname", FieldPath::MemberFullName, &json!("n Sm"))
            .unwrap()
            .unwrap();
        assert!(p.matches(Some(&Operand::Text("John Smith".into()))));
        assert!(!p.matches(Some(&Operand::Text("john smith".into()))));
    }

    #[test]
    fn null_field_never_matches() {
        let p = Predicate::new(FieldPath::PlanId, Condition::Equals(Operand::Integer(1)));
        assert!(!p.matches(None));
    }

    #[test]
    fn enumerated_set_accepts_scalar_and_array() {
        let single = FilterKind::EnumeratedSet
            .apply("relationship", FieldPath::MemberRelationship, &json!("child"))
            .unwrap()
            .unwrap();
        assert!(single.matches(Some(&Operand::Text("child".into()))));

        let many = FilterKind::EnumeratedSet
            .apply("relationship", FieldPath::MemberRelationship, &json!(["self", "spouse"]))
            .unwrap()
            .unwrap();
        assert!(many.matches(Some(&Operand::Text("spouse".into()))));
        assert!(!many.matches(Some(&Operand::Text("child".into()))));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let p = FilterKind::EnumeratedSet
            .apply("relationship", FieldPath::MemberRelationship, &json!([]))
            .unwrap()
            .unwrap();
        assert!(!p.matches(Some(&Operand::Text("self".into()))));
    }

    #[test]
    fn timestamp_accepts_plain_dates() {
        let op = Operand::coerce(FieldType::Timestamp, "created_at", &json!("2024-01-31")).unwrap();
        let Operand::Timestamp(ts) = op else {
            panic!("expected timestamp");
        };
        assert_eq!(ts.format_date(), "2024-01-31");
    }

    #[test]
    fn kind_support_by_field_type() {
        assert!(!FilterKind::TextMatch.supports(FieldType::Integer));
        assert!(!FilterKind::Range.supports(FieldType::Boolean));
        assert!(FilterKind::Equality.supports(FieldType::Boolean));
    }
}
