//! Query composer - resolves a raw listing request against the registry.
//!
//! The output is storage-neutral: a conjunction of predicates, one
//! ordering and clamped paging. Adapters render it (SQL) or evaluate it
//! (in memory) over the same join:
//!
//! ```text
//! member ─► member group ─► company
//!              │
//!              └─(left)─► active subscription ─(left)─► plan
//! ```
//!
//! The active subscription in this bulk path is the one with the highest
//! id among the group's subscriptions whose window contains `now`. This
//! intentionally differs from [`MembershipGraph::active_subscription`],
//! which only ever looks at the last subscription.
//!
//! [`MembershipGraph::active_subscription`]: crate::domain::membership::MembershipGraph::active_subscription

use std::sync::Arc;

use super::{FieldPath, FilterRegistry, MemberQuery, Predicate, SortOrder};
use crate::domain::foundation::ValidationError;

/// Storage-neutral listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedQuery {
    /// Conjunction; empty means every row.
    pub predicates: Vec<Predicate>,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
    /// Filter keys the registry did not know.
    pub ignored_filters: Vec<String>,
}

impl ComposedQuery {
    /// Secondary ordering, ascending, that makes pages deterministic.
    pub const TIE_BREAKER: FieldPath = FieldPath::MemberId;
}

/// Builds [`ComposedQuery`] values from raw requests.
#[derive(Debug, Clone)]
pub struct QueryComposer {
    registry: Arc<FilterRegistry>,
}

impl QueryComposer {
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Resolves filters, ordering and paging.
    ///
    /// Unknown filter keys are skipped and unknown or non-sortable order
    /// keys fall back to the default ordering. Only a malformed value for a
    /// known filter key is an error.
    pub fn compose(&self, query: &MemberQuery) -> Result<ComposedQuery, ValidationError> {
        let mut predicates = Vec::new();
        let mut ignored_filters = Vec::new();

        for (key, raw) in &query.filters {
            match self.registry.rule_for(key) {
                Some(rule) => {
                    if let Some(predicate) = rule.kind.apply(key, rule.field, raw)? {
                        predicates.push(predicate);
                    }
                }
                None => ignored_filters.push(key.clone()),
            }
        }

        let order = query
            .order_by
            .as_deref()
            .and_then(|key| self.registry.sort_field_for(key))
            .map(|field| SortOrder {
                field,
                direction: query.effective_direction(),
            })
            .unwrap_or_default();

        Ok(ComposedQuery {
            predicates,
            order,
            limit: query.effective_limit(),
            offset: query.effective_offset(),
            ignored_filters,
        })
    }
}

impl Default for QueryComposer {
    fn default() -> Self {
        Self::new(Arc::new(FilterRegistry::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{Condition, FilterKind, Operand, SortDirection};
    use serde_json::json;

    fn composer() -> QueryComposer {
        QueryComposer::default()
    }

    #[test]
    fn empty_query_uses_defaults() {
        let composed = composer().compose(&MemberQuery::new()).unwrap();
        assert!(composed.predicates.is_empty());
        assert_eq!(composed.order, SortOrder::default());
        assert_eq!(composed.limit, 20);
        assert_eq!(composed.offset, 0);
    }

    #[test]
    fn unknown_filter_key_is_ignored() {
        let with = composer()
            .compose(&MemberQuery::new().filter("plan_id", json!(1)).filter("unknown_key", json!("x")))
            .unwrap();
        let without = composer()
            .compose(&MemberQuery::new().filter("plan_id", json!(1)))
            .unwrap();

        assert_eq!(with.predicates, without.predicates);
        assert_eq!(with.ignored_filters, vec!["unknown_key".to_string()]);
    }

    #[test]
    fn known_filters_become_predicates_on_resolved_fields() {
        let composed = composer()
            .compose(
                &MemberQuery::new()
                    .filter("member_id", json!("ext-9"))
                    .filter("customer_id", json!({"from": 1, "to": 9})),
            )
            .unwrap();

        assert_eq!(composed.predicates.len(), 2);
        assert!(composed.predicates.contains(&Predicate::new(
            FieldPath::GroupExternalId,
            Condition::Equals(Operand::Text("ext-9".into()))
        )));
        assert!(composed
            .predicates
            .iter()
            .any(|p| p.field == FieldPath::MemberCustomerId));
    }

    #[test]
    fn sortable_key_uses_requested_direction() {
        let composed = composer()
            .compose(&MemberQuery::new().order_by("fullname", "asc"))
            .unwrap();
        assert_eq!(
            composed.order,
            SortOrder {
                field: FieldPath::MemberFullName,
                direction: SortDirection::Asc
            }
        );
    }

    #[test]
    fn sortable_key_without_direction_sorts_descending() {
        let mut query = MemberQuery::new();
        query.order_by = Some("email".into());
        let composed = composer().compose(&query).unwrap();
        assert_eq!(composed.order.direction, SortDirection::Desc);
    }

    #[test]
    fn non_sortable_order_key_falls_back_to_created_at_desc() {
        let registry = FilterRegistry::empty()
            .with_filter("email", FilterKind::TextMatch, FieldPath::GroupEmail);
        let composer = QueryComposer::new(Arc::new(registry));

        let composed = composer
            .compose(&MemberQuery::new().order_by("email", "ASC"))
            .unwrap();

        assert_eq!(composed.order, SortOrder::default());
    }

    #[test]
    fn malformed_value_for_known_key_is_rejected() {
        let err = composer()
            .compose(&MemberQuery::new().filter("plan_id", json!("gold")))
            .unwrap_err();
        assert_eq!(err.field(), "plan_id");
    }

    #[test]
    fn paging_is_clamped() {
        let composed = composer()
            .compose(&MemberQuery::new().limit(1000).offset(-5))
            .unwrap();
        assert_eq!(composed.limit, 500);
        assert_eq!(composed.offset, 0);
    }
}
