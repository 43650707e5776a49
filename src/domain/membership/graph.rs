//! Membership graph - arena of entities keyed by id.
//!
//! Member groups, members, subscriptions and usage rows reference each
//! other in both directions. The graph owns every entity; relations are
//! stored as ids and resolved here, so no entity ever owns another.
//!
//! Persistence adapters hydrate a graph with `insert_*`; domain code grows
//! it with the validating `create_*`/`add_*` operations which assign ids
//! from per-kind sequences.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{
    Company, EntityKind, Member, MemberGroup, MemberGroupSubscription, MembershipError,
    NewMember, OrderLine, Plan, SubscriptionUsage,
};
use crate::domain::foundation::{
    CompanyId, MemberGroupId, MemberId, PlanId, SubscriptionId, Timestamp, UsageId,
};

#[derive(Debug, Clone, Default)]
struct Sequences {
    company: i64,
    plan: i64,
    group: i64,
    member: i64,
    subscription: i64,
    usage: i64,
}

fn advance(counter: &mut i64, seen: i64) {
    if seen > *counter {
        *counter = seen;
    }
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Arena holding a consistent slice of the membership object graph.
#[derive(Debug, Clone, Default)]
pub struct MembershipGraph {
    companies: BTreeMap<CompanyId, Company>,
    plans: BTreeMap<PlanId, Plan>,
    pub(super) groups: BTreeMap<MemberGroupId, MemberGroup>,
    pub(super) members: BTreeMap<MemberId, Member>,
    subscriptions: BTreeMap<SubscriptionId, MemberGroupSubscription>,
    usages: BTreeMap<UsageId, SubscriptionUsage>,
    sequences: Sequences,
}

impl MembershipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ────────────────────────────────────────────────────────────────
    // Hydration
    // ────────────────────────────────────────────────────────────────

    pub fn insert_company(&mut self, company: Company) {
        advance(&mut self.sequences.company, company.id.value());
        self.companies.insert(company.id, company);
    }

    pub fn insert_plan(&mut self, plan: Plan) {
        advance(&mut self.sequences.plan, plan.id.value());
        self.plans.insert(plan.id, plan);
    }

    pub fn insert_group(&mut self, group: MemberGroup) {
        advance(&mut self.sequences.group, group.id.value());
        self.groups.insert(group.id, group);
    }

    /// Stores a member and links it into its group, if the group is loaded.
    pub fn insert_member(&mut self, member: Member) {
        advance(&mut self.sequences.member, member.id.value());
        if let Some(group) = self.groups.get_mut(&member.group_id) {
            if !group.member_ids.contains(&member.id) {
                group.member_ids.push(member.id);
            }
        }
        self.members.insert(member.id, member);
    }

    /// Stores a subscription and appends it to its group's ordered history.
    ///
    /// Callers hydrating from storage must insert in `created_at` order.
    pub fn insert_subscription(&mut self, subscription: MemberGroupSubscription) {
        advance(&mut self.sequences.subscription, subscription.id.value());
        if let Some(group) = self.groups.get_mut(&subscription.group_id) {
            if !group.subscription_ids.contains(&subscription.id) {
                group.subscription_ids.push(subscription.id);
            }
        }
        self.subscriptions.insert(subscription.id, subscription);
    }

    pub fn insert_usage(&mut self, usage: SubscriptionUsage) {
        advance(&mut self.sequences.usage, usage.id.value());
        self.usages.insert(usage.id, usage);
    }

    // ────────────────────────────────────────────────────────────────
    // Creation
    // ────────────────────────────────────────────────────────────────

    pub fn add_company(&mut self, title: impl Into<String>) -> CompanyId {
        let id = CompanyId::new(next(&mut self.sequences.company));
        self.companies.insert(id, Company::new(id, title));
        id
    }

    pub fn add_plan(&mut self, title: impl Into<String>) -> PlanId {
        let id = PlanId::new(next(&mut self.sequences.plan));
        self.plans.insert(id, Plan::new(id, title));
        id
    }

    /// Creates a member group and runs the activation cascade on it.
    ///
    /// A fresh group has no primary member yet, so it stays inactive until
    /// it is activated again after members are enrolled.
    pub fn create_group(
        &mut self,
        company_id: CompanyId,
        external_id: impl Into<String>,
        email: impl Into<String>,
        now: Timestamp,
    ) -> Result<MemberGroupId, MembershipError> {
        self.require_company(company_id)?;
        let id = MemberGroupId::new(self.sequences.group + 1);
        let group = MemberGroup::create(id, company_id, external_id, email, now)?;
        self.sequences.group = id.value();
        self.groups.insert(id, group);
        self.activate(id, &now)?;
        Ok(id)
    }

    /// Enrolls a new, inactive member into `group_id`.
    pub fn add_member(
        &mut self,
        group_id: MemberGroupId,
        data: NewMember,
        now: Timestamp,
    ) -> Result<MemberId, MembershipError> {
        self.require_group(group_id)?;
        let id = MemberId::new(self.sequences.member + 1);
        let member = Member::create(id, group_id, data, now)?;
        self.insert_member(member);
        Ok(id)
    }

    /// Appends a subscription to the group's history.
    pub fn add_subscription(
        &mut self,
        group_id: MemberGroupId,
        plan_id: PlanId,
        started_at: Timestamp,
        ended_at: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<SubscriptionId, MembershipError> {
        self.require_group(group_id)?;
        self.require_plan(plan_id)?;
        check_window(&started_at, ended_at.as_ref())?;

        let id = SubscriptionId::new(next(&mut self.sequences.subscription));
        self.insert_subscription(MemberGroupSubscription::new(
            id, group_id, plan_id, started_at, ended_at, now,
        ));
        Ok(id)
    }

    /// Books an order line against a subscription for one member.
    pub fn record_usage(
        &mut self,
        member_id: MemberId,
        subscription_id: SubscriptionId,
        order: OrderLine,
        now: Timestamp,
    ) -> Result<UsageId, MembershipError> {
        let member_group = self.require_member(member_id)?.group_id;
        let subscription_group = self.require_subscription(subscription_id)?.group_id;
        if member_group != subscription_group {
            return Err(MembershipError::validation(
                "subscription_id",
                "subscription belongs to another member group",
            ));
        }

        let id = UsageId::new(self.sequences.usage + 1);
        let usage = SubscriptionUsage::new(id, member_id, subscription_id, order, now)?;
        self.insert_usage(usage);
        Ok(id)
    }

    // ────────────────────────────────────────────────────────────────
    // Lookups
    // ────────────────────────────────────────────────────────────────

    pub fn company(&self, id: CompanyId) -> Option<&Company> {
        self.companies.get(&id)
    }

    pub fn plan(&self, id: PlanId) -> Option<&Plan> {
        self.plans.get(&id)
    }

    pub fn group(&self, id: MemberGroupId) -> Option<&MemberGroup> {
        self.groups.get(&id)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn subscription(&self, id: SubscriptionId) -> Option<&MemberGroupSubscription> {
        self.subscriptions.get(&id)
    }

    pub fn usage(&self, id: UsageId) -> Option<&SubscriptionUsage> {
        self.usages.get(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &MemberGroup> {
        self.groups.values()
    }

    /// All members, ordered by id.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &MemberGroupSubscription> {
        self.subscriptions.values()
    }

    pub fn usages(&self) -> impl Iterator<Item = &SubscriptionUsage> {
        self.usages.values()
    }

    /// The group a member belongs to.
    pub fn group_of(&self, member: &Member) -> Option<&MemberGroup> {
        self.groups.get(&member.group_id)
    }

    /// Members of a group, in enrollment order.
    pub fn members_of(&self, group_id: MemberGroupId) -> impl Iterator<Item = &Member> {
        self.groups
            .get(&group_id)
            .map(|g| g.member_ids.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.members.get(id))
    }

    /// Subscriptions of a group, oldest first.
    pub fn subscriptions_of(
        &self,
        group_id: MemberGroupId,
    ) -> impl Iterator<Item = &MemberGroupSubscription> {
        self.groups
            .get(&group_id)
            .map(|g| g.subscription_ids.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.subscriptions.get(id))
    }

    /// The chronologically last subscription, regardless of its window.
    pub fn last_subscription(&self, group_id: MemberGroupId) -> Option<&MemberGroupSubscription> {
        self.groups
            .get(&group_id)?
            .last_subscription_id()
            .and_then(|id| self.subscriptions.get(&id))
    }

    /// Usage rows booked by `member_id` under `subscription_id`.
    pub fn member_usages(
        &self,
        subscription_id: SubscriptionId,
        member_id: MemberId,
    ) -> impl Iterator<Item = &SubscriptionUsage> {
        self.usages
            .values()
            .filter(move |u| u.subscription_id == subscription_id && u.member_id == member_id)
    }

    pub fn primary_member(&self, group_id: MemberGroupId) -> Option<&Member> {
        self.members_of(group_id).find(|m| m.is_primary())
    }

    pub fn active_primary_member(&self, group_id: MemberGroupId) -> Option<&Member> {
        self.members_of(group_id)
            .find(|m| m.is_primary() && m.is_active())
    }

    /// The active spouse, if any.
    pub fn spouse(&self, group_id: MemberGroupId) -> Option<&Member> {
        self.members_of(group_id)
            .find(|m| m.is_spouse() && m.is_active())
    }

    /// Active members other than the primary member.
    pub fn dependents(&self, group_id: MemberGroupId) -> Vec<&Member> {
        self.members_of(group_id)
            .filter(|m| !m.is_primary() && m.is_active())
            .collect()
    }

    pub fn adult_children(&self, group_id: MemberGroupId, now: &Timestamp) -> Vec<&Member> {
        self.members_of(group_id)
            .filter(|m| m.is_adult_child(now) && m.is_active())
            .collect()
    }

    pub fn minor_children(&self, group_id: MemberGroupId, now: &Timestamp) -> Vec<&Member> {
        self.members_of(group_id)
            .filter(|m| m.is_minor_child(now) && m.is_active())
            .collect()
    }

    pub fn has_active_member(&self, group_id: MemberGroupId) -> bool {
        self.members_of(group_id).any(|m| m.is_active())
    }

    /// Active member with exactly these names and calendar birthday.
    pub fn find_member(
        &self,
        group_id: MemberGroupId,
        firstname: &str,
        lastname: &str,
        birthday: NaiveDate,
    ) -> Option<&Member> {
        self.members_of(group_id).find(|m| {
            m.is_active()
                && m.firstname == firstname
                && m.lastname == lastname
                && m.birthday == birthday
        })
    }

    // ────────────────────────────────────────────────────────────────
    // Mutations of the mutable fields
    // ────────────────────────────────────────────────────────────────

    pub fn update_group_email(
        &mut self,
        group_id: MemberGroupId,
        email: impl Into<String>,
    ) -> Result<(), MembershipError> {
        self.group_mut(group_id)?.update_email(email)?;
        Ok(())
    }

    pub fn assign_customer_id(
        &mut self,
        member_id: MemberId,
        customer_id: i64,
        now: &Timestamp,
    ) -> Result<(), MembershipError> {
        self.member_mut(member_id)?
            .assign_customer_id(customer_id, now)?;
        Ok(())
    }

    pub fn end_subscription(
        &mut self,
        subscription_id: SubscriptionId,
        ended_at: Option<Timestamp>,
    ) -> Result<(), MembershipError> {
        let subscription = self.subscription_mut(subscription_id)?;
        check_window(&subscription.started_at, ended_at.as_ref())?;
        subscription.end(ended_at);
        Ok(())
    }

    pub fn mark_subscription_notified(
        &mut self,
        subscription_id: SubscriptionId,
        at: Timestamp,
    ) -> Result<(), MembershipError> {
        self.subscription_mut(subscription_id)?.mark_notified(at);
        Ok(())
    }

    /// Removes a member from its group.
    ///
    /// Usage rows are order history and are never deleted with their
    /// member: a member with recorded usage is rejected.
    pub fn remove_member(&mut self, member_id: MemberId) -> Result<Member, MembershipError> {
        self.require_member(member_id)?;
        if self.usages.values().any(|u| u.member_id == member_id) {
            return Err(MembershipError::validation(
                "member_id",
                "member has recorded subscription usage",
            ));
        }

        let member = self
            .members
            .remove(&member_id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Member, member_id))?;
        if let Some(group) = self.groups.get_mut(&member.group_id) {
            group.member_ids.retain(|id| *id != member_id);
        }
        Ok(member)
    }

    /// Copies the mutable fields of a group, its members and its
    /// subscriptions from `source` into this graph.
    pub fn copy_mutable_state(
        &mut self,
        source: &MembershipGraph,
        group_id: MemberGroupId,
    ) -> Result<(), MembershipError> {
        let group = source.require_group(group_id)?;
        let target = self.group_mut(group_id)?;
        target.email = group.email.clone();
        target.active = group.active;

        for member in source.members_of(group_id) {
            if let Some(target) = self.members.get_mut(&member.id) {
                target.active = member.active;
                target.customer_id = member.customer_id;
            }
        }
        for subscription in source.subscriptions_of(group_id) {
            if let Some(target) = self.subscriptions.get_mut(&subscription.id) {
                target.ended_at = subscription.ended_at;
                target.notified_at = subscription.notified_at;
            }
        }
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────
    // Required lookups
    // ────────────────────────────────────────────────────────────────

    pub fn require_company(&self, id: CompanyId) -> Result<&Company, MembershipError> {
        self.company(id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Company, id))
    }

    pub fn require_plan(&self, id: PlanId) -> Result<&Plan, MembershipError> {
        self.plan(id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Plan, id))
    }

    pub fn require_group(&self, id: MemberGroupId) -> Result<&MemberGroup, MembershipError> {
        self.group(id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::MemberGroup, id))
    }

    pub fn require_member(&self, id: MemberId) -> Result<&Member, MembershipError> {
        self.member(id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Member, id))
    }

    pub fn require_subscription(
        &self,
        id: SubscriptionId,
    ) -> Result<&MemberGroupSubscription, MembershipError> {
        self.subscription(id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Subscription, id))
    }

    pub(super) fn group_mut(
        &mut self,
        id: MemberGroupId,
    ) -> Result<&mut MemberGroup, MembershipError> {
        self.groups
            .get_mut(&id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::MemberGroup, id))
    }

    fn member_mut(&mut self, id: MemberId) -> Result<&mut Member, MembershipError> {
        self.members
            .get_mut(&id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Member, id))
    }

    fn subscription_mut(
        &mut self,
        id: SubscriptionId,
    ) -> Result<&mut MemberGroupSubscription, MembershipError> {
        self.subscriptions
            .get_mut(&id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Subscription, id))
    }
}

/// A subscription window may be empty but never inverted.
fn check_window(
    started_at: &Timestamp,
    ended_at: Option<&Timestamp>,
) -> Result<(), MembershipError> {
    match ended_at {
        Some(ended) if ended.is_before(started_at) => Err(MembershipError::validation(
            "ended_at",
            "must not be before started_at",
        )),
        _ => Ok(()),
    }
}
