//! Evaluates a [`ComposedQuery`] against an in-memory graph.
//!
//! Mirrors the SQL rendering: inner joins to group and company, the
//! highest-id subscription in force per group, NULL never matching a
//! predicate, and NULL sorting after every value in ascending order.

use std::cmp::Ordering;

use crate::domain::foundation::Timestamp;
use crate::domain::listing::{
    ComposedQuery, FieldPath, MemberSearchResult, MemberSummary, Operand, SortDirection,
};
use crate::domain::membership::{
    Company, Member, MemberGroup, MemberGroupSubscription, MembershipGraph, Plan,
};

/// One row of the listing join.
struct JoinedRow<'a> {
    member: &'a Member,
    group: &'a MemberGroup,
    company: &'a Company,
    subscription: Option<&'a MemberGroupSubscription>,
    plan: Option<&'a Plan>,
}

impl JoinedRow<'_> {
    fn value_of(&self, field: FieldPath) -> Option<Operand> {
        let member = self.member;
        let group = self.group;
        match field {
            FieldPath::MemberId => Some(Operand::Integer(member.id().value())),
            FieldPath::MemberCustomerId => member.customer_id().map(Operand::Integer),
            FieldPath::MemberFullName => Some(Operand::Text(member.full_name())),
            FieldPath::MemberFirstname => Some(Operand::Text(member.firstname().to_string())),
            FieldPath::MemberLastname => Some(Operand::Text(member.lastname().to_string())),
            FieldPath::MemberRelationship => {
                Some(Operand::Text(member.relationship().as_str().to_string()))
            }
            FieldPath::MemberBirthday => Some(Operand::Date(member.birthday())),
            FieldPath::MemberActive => Some(Operand::Boolean(member.is_active())),
            FieldPath::MemberCreatedAt => Some(Operand::Timestamp(member.created_at())),
            FieldPath::GroupExternalId => Some(Operand::Text(group.external_id().to_string())),
            FieldPath::GroupEmail => Some(Operand::Text(group.email().to_string())),
            FieldPath::GroupActive => Some(Operand::Boolean(group.is_active())),
            FieldPath::CompanyId => Some(Operand::Integer(self.company.id.value())),
            FieldPath::CompanyTitle => Some(Operand::Text(self.company.title.clone())),
            FieldPath::SubscriptionStartedAt => self
                .subscription
                .map(|s| Operand::Timestamp(s.started_at())),
            FieldPath::SubscriptionEndedAt => self
                .subscription
                .and_then(|s| s.ended_at())
                .map(Operand::Timestamp),
            FieldPath::PlanId => self.plan.map(|p| Operand::Integer(p.id.value())),
            FieldPath::PlanTitle => self.plan.map(|p| Operand::Text(p.title.clone())),
        }
    }

    fn to_summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.member.id(),
            customer_id: self.member.customer_id(),
            external_id: self.group.external_id().to_string(),
            full_name: self.member.full_name(),
            email: self.group.email().to_string(),
            company_title: self.company.title.clone(),
            plan_title: self.plan.map(|p| p.title.clone()),
            created_at: self.member.created_at(),
            relationship: self.member.relationship(),
            birthday: self.member.birthday(),
            active: self.member.is_active(),
        }
    }
}

/// Highest-id subscription of the group whose window contains `now`.
fn subscription_in_force<'a>(
    graph: &'a MembershipGraph,
    group: &MemberGroup,
    now: &Timestamp,
) -> Option<&'a MemberGroupSubscription> {
    graph
        .subscriptions_of(group.id())
        .filter(|s| s.is_active_at(now))
        .max_by_key(|s| s.id())
}

fn joined_rows<'a>(graph: &'a MembershipGraph, now: &Timestamp) -> Vec<JoinedRow<'a>> {
    graph
        .members()
        .filter_map(|member| {
            let group = graph.group_of(member)?;
            let company = graph.company(group.company_id())?;
            let subscription = subscription_in_force(graph, group, now);
            let plan = subscription.and_then(|s| graph.plan(s.plan_id()));
            Some(JoinedRow {
                member,
                group,
                company,
                subscription,
                plan,
            })
        })
        .collect()
}

/// NULL compares greater than any value.
fn compare_nullable(a: Option<&Operand>, b: Option<&Operand>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

pub(super) fn evaluate(
    graph: &MembershipGraph,
    query: &ComposedQuery,
    now: &Timestamp,
) -> MemberSearchResult {
    let mut rows: Vec<(JoinedRow<'_>, Option<Operand>)> = joined_rows(graph, now)
        .into_iter()
        .filter(|row| {
            query
                .predicates
                .iter()
                .all(|p| p.matches(row.value_of(p.field).as_ref()))
        })
        .map(|row| {
            let key = row.value_of(query.order.field);
            (row, key)
        })
        .collect();

    let total_count = rows.len() as u64;

    rows.sort_by(|(a, a_key), (b, b_key)| {
        let primary = compare_nullable(a_key.as_ref(), b_key.as_ref());
        let primary = match query.order.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.member.id().cmp(&b.member.id()))
    });

    let offset = usize::try_from(query.offset).unwrap_or(0);
    let limit = usize::try_from(query.limit).unwrap_or(0);

    MemberSearchResult {
        rows: rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(row, _)| row.to_summary())
            .collect(),
        total_count,
    }
}
