//! Queryable field paths of the member listing join.
//!
//! The listing joins member → member group → company, plus the group's
//! active subscription and its plan. Every filter and sort key resolves
//! to one of these paths; nothing outside this set can be queried.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Value type stored behind a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Text,
    Boolean,
    Timestamp,
    Date,
}

impl FieldType {
    /// Whether values of this type have a meaningful order.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, FieldType::Boolean)
    }
}

/// Closed set of fields reachable from the listing join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldPath {
    #[serde(rename = "member.id")]
    MemberId,
    #[serde(rename = "member.customer_id")]
    MemberCustomerId,
    #[serde(rename = "member.full_name")]
    MemberFullName,
    #[serde(rename = "member.firstname")]
    MemberFirstname,
    #[serde(rename = "member.lastname")]
    MemberLastname,
    #[serde(rename = "member.relationship")]
    MemberRelationship,
    #[serde(rename = "member.birthday")]
    MemberBirthday,
    #[serde(rename = "member.active")]
    MemberActive,
    #[serde(rename = "member.created_at")]
    MemberCreatedAt,
    #[serde(rename = "group.external_id")]
    GroupExternalId,
    #[serde(rename = "group.email")]
    GroupEmail,
    #[serde(rename = "group.active")]
    GroupActive,
    #[serde(rename = "company.id")]
    CompanyId,
    #[serde(rename = "company.title")]
    CompanyTitle,
    #[serde(rename = "subscription.started_at")]
    SubscriptionStartedAt,
    #[serde(rename = "subscription.ended_at")]
    SubscriptionEndedAt,
    #[serde(rename = "plan.id")]
    PlanId,
    #[serde(rename = "plan.title")]
    PlanTitle,
}

impl FieldPath {
    pub const ALL: [FieldPath; 18] = [
        FieldPath::MemberId,
        FieldPath::MemberCustomerId,
        FieldPath::MemberFullName,
        FieldPath::MemberFirstname,
        FieldPath::MemberLastname,
        FieldPath::MemberRelationship,
        FieldPath::MemberBirthday,
        FieldPath::MemberActive,
        FieldPath::MemberCreatedAt,
        FieldPath::GroupExternalId,
        FieldPath::GroupEmail,
        FieldPath::GroupActive,
        FieldPath::CompanyId,
        FieldPath::CompanyTitle,
        FieldPath::SubscriptionStartedAt,
        FieldPath::SubscriptionEndedAt,
        FieldPath::PlanId,
        FieldPath::PlanTitle,
    ];

    /// Dotted name used in registry documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::MemberId => "member.id",
            FieldPath::MemberCustomerId => "member.customer_id",
            FieldPath::MemberFullName => "member.full_name",
            FieldPath::MemberFirstname => "member.firstname",
            FieldPath::MemberLastname => "member.lastname",
            FieldPath::MemberRelationship => "member.relationship",
            FieldPath::MemberBirthday => "member.birthday",
            FieldPath::MemberActive => "member.active",
            FieldPath::MemberCreatedAt => "member.created_at",
            FieldPath::GroupExternalId => "group.external_id",
            FieldPath::GroupEmail => "group.email",
            FieldPath::GroupActive => "group.active",
            FieldPath::CompanyId => "company.id",
            FieldPath::CompanyTitle => "company.title",
            FieldPath::SubscriptionStartedAt => "subscription.started_at",
            FieldPath::SubscriptionEndedAt => "subscription.ended_at",
            FieldPath::PlanId => "plan.id",
            FieldPath::PlanTitle => "plan.title",
        }
    }

    /// SQL expression over the listing aliases `m`, `g`, `c`, `s`, `p`.
    pub fn sql(&self) -> &'static str {
        match self {
            FieldPath::MemberId => "m.id",
            FieldPath::MemberCustomerId => "m.customer_id",
            FieldPath::MemberFullName => "(m.firstname || ' ' || m.lastname)",
            FieldPath::MemberFirstname => "m.firstname",
            FieldPath::MemberLastname => "m.lastname",
            FieldPath::MemberRelationship => "m.relationship",
            FieldPath::MemberBirthday => "m.birthday",
            FieldPath::MemberActive => "m.active",
            FieldPath::MemberCreatedAt => "m.created_at",
            FieldPath::GroupExternalId => "g.external_id",
            FieldPath::GroupEmail => "g.email",
            FieldPath::GroupActive => "g.active",
            FieldPath::CompanyId => "c.id",
            FieldPath::CompanyTitle => "c.title",
            FieldPath::SubscriptionStartedAt => "s.started_at",
            FieldPath::SubscriptionEndedAt => "s.ended_at",
            FieldPath::PlanId => "p.id",
            FieldPath::PlanTitle => "p.title",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldPath::MemberId
            | FieldPath::MemberCustomerId
            | FieldPath::CompanyId
            | FieldPath::PlanId => FieldType::Integer,
            FieldPath::MemberFullName
            | FieldPath::MemberFirstname
            | FieldPath::MemberLastname
            | FieldPath::MemberRelationship
            | FieldPath::GroupExternalId
            | FieldPath::GroupEmail
            | FieldPath::CompanyTitle
            | FieldPath::PlanTitle => FieldType::Text,
            FieldPath::MemberActive | FieldPath::GroupActive => FieldType::Boolean,
            FieldPath::MemberCreatedAt
            | FieldPath::SubscriptionStartedAt
            | FieldPath::SubscriptionEndedAt => FieldType::Timestamp,
            FieldPath::MemberBirthday => FieldType::Date,
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::ALL
            .iter()
            .copied()
            .find(|path| path.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("field", format!("unknown field path '{}'", s))
            })
    }
}
