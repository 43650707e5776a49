//! Filter registry - allow-list of filter and sort keys.
//!
//! Maps the external keys callers use to the field paths and filter kinds
//! the composer applies. Filtering and sorting are separate tables: a key
//! may be filterable without being sortable and vice versa.
//!
//! Registries are plain configuration. They deserialize from documents of
//! the form:
//!
//! ```yaml
//! filters:
//!   plan_id: { kind: equality, field: plan.id }
//!   fullname: { kind: text_match, field: member.full_name }
//! sorts:
//!   fullname: member.full_name
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{FieldPath, FilterKind};
use crate::domain::foundation::ValidationError;

/// How one filter key is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterRule {
    pub kind: FilterKind,
    pub field: FieldPath,
}

/// Allow-list of filterable and sortable keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterRegistry {
    #[serde(default)]
    filters: BTreeMap<String, FilterRule>,
    #[serde(default)]
    sorts: BTreeMap<String, FieldPath>,
}

static DEFAULT_REGISTRY: Lazy<FilterRegistry> = Lazy::new(|| {
    FilterRegistry::empty()
        .with_filter("plan_id", FilterKind::Equality, FieldPath::PlanId)
        .with_filter("company_id", FilterKind::Equality, FieldPath::CompanyId)
        .with_filter("customer_id", FilterKind::Range, FieldPath::MemberCustomerId)
        .with_filter("fullname", FilterKind::TextMatch, FieldPath::MemberFullName)
        .with_filter("email", FilterKind::TextMatch, FieldPath::GroupEmail)
        .with_filter("member_id", FilterKind::Equality, FieldPath::GroupExternalId)
        .with_filter("relationship", FilterKind::EnumeratedSet, FieldPath::MemberRelationship)
        .with_sort("id", FieldPath::MemberId)
        .with_sort("customer_id", FieldPath::MemberCustomerId)
        .with_sort("fullname", FieldPath::MemberFullName)
        .with_sort("email", FieldPath::GroupEmail)
        .with_sort("member_id", FieldPath::GroupExternalId)
        .with_sort("company", FieldPath::CompanyTitle)
        .with_sort("plan", FieldPath::PlanTitle)
        .with_sort("birthday", FieldPath::MemberBirthday)
        .with_sort("created_at", FieldPath::MemberCreatedAt)
});

impl FilterRegistry {
    /// Registry that knows no keys.
    pub fn empty() -> Self {
        Self {
            filters: BTreeMap::new(),
            sorts: BTreeMap::new(),
        }
    }

    /// Built-in registry for the advanced member listing.
    pub fn default_registry() -> &'static FilterRegistry {
        &DEFAULT_REGISTRY
    }

    pub fn with_filter(mut self, key: impl Into<String>, kind: FilterKind, field: FieldPath) -> Self {
        self.filters.insert(key.into(), FilterRule { kind, field });
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, field: FieldPath) -> Self {
        self.sorts.insert(key.into(), field);
        self
    }

    pub fn filter_kind_for(&self, key: &str) -> Option<FilterKind> {
        self.filters.get(key).map(|rule| rule.kind)
    }

    pub fn query_field_for(&self, key: &str) -> Option<FieldPath> {
        self.filters.get(key).map(|rule| rule.field)
    }

    pub fn rule_for(&self, key: &str) -> Option<FilterRule> {
        self.filters.get(key).copied()
    }

    pub fn is_sortable(&self, key: &str) -> bool {
        self.sorts.contains_key(key)
    }

    pub fn sort_field_for(&self, key: &str) -> Option<FieldPath> {
        self.sorts.get(key).copied()
    }

    pub fn filter_keys(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn sort_keys(&self) -> impl Iterator<Item = &str> {
        self.sorts.keys().map(String::as_str)
    }

    /// Checks that every filter kind suits the type of its field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (key, rule) in &self.filters {
            if !rule.kind.supports(rule.field.field_type()) {
                return Err(ValidationError::invalid_format(
                    key.as_str(),
                    format!("filter kind {:?} cannot be applied to {}", rule.kind, rule.field),
                ));
            }
        }
        for (key, field) in &self.sorts {
            if !field.field_type().is_ordered() {
                return Err(ValidationError::invalid_format(
                    key.as_str(),
                    format!("{} cannot be sorted", field),
                ));
            }
        }
        Ok(())
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        DEFAULT_REGISTRY.clone()
    }
}
