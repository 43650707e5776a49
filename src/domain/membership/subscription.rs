//! Member group subscriptions and their usage rows.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    MemberGroupId, MemberId, PlanId, SubscriptionId, Timestamp, UsageId, ValidationError,
};

/// Time-bounded enrollment of a member group in a plan.
///
/// # Invariants
///
/// - `plan_id`, `started_at` and `created_at` never change
/// - the subscription is in force while `started_at <= now < ended_at`
///   (an absent `ended_at` means open-ended)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGroupSubscription {
    pub(crate) id: SubscriptionId,
    pub(crate) group_id: MemberGroupId,
    pub(crate) plan_id: PlanId,
    pub(crate) started_at: Timestamp,
    pub(crate) ended_at: Option<Timestamp>,
    pub(crate) notified_at: Option<Timestamp>,
    pub(crate) created_at: Timestamp,
}

impl MemberGroupSubscription {
    pub fn new(
        id: SubscriptionId,
        group_id: MemberGroupId,
        plan_id: PlanId,
        started_at: Timestamp,
        ended_at: Option<Timestamp>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            group_id,
            plan_id,
            started_at,
            ended_at,
            notified_at: None,
            created_at,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn group_id(&self) -> MemberGroupId {
        self.group_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    pub fn notified_at(&self) -> Option<Timestamp> {
        self.notified_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// True when `now` falls inside the subscription window.
    pub fn is_active_at(&self, now: &Timestamp) -> bool {
        self.started_at <= *now && self.ended_at.map_or(true, |ended| ended > *now)
    }

    /// Sets or clears the end of the subscription window.
    ///
    /// The arena checks the window before calling this.
    pub(crate) fn end(&mut self, ended_at: Option<Timestamp>) {
        self.ended_at = ended_at;
    }

    /// Records when the group was last notified about this subscription.
    pub fn mark_notified(&mut self, at: Timestamp) {
        self.notified_at = Some(at);
    }
}

/// Immutable record of plan consumption (positive qty) or credit
/// (negative qty) by one member under one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUsage {
    pub(crate) id: UsageId,
    pub(crate) member_id: MemberId,
    pub(crate) subscription_id: SubscriptionId,
    pub(crate) order_id: i64,
    pub(crate) order_item_id: i64,
    pub(crate) qty: i64,
    pub(crate) created_at: Timestamp,
}

impl SubscriptionUsage {
    pub fn new(
        id: UsageId,
        member_id: MemberId,
        subscription_id: SubscriptionId,
        order: OrderLine,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        order.validate()?;
        Ok(Self {
            id,
            member_id,
            subscription_id,
            order_id: order.order_id,
            order_item_id: order.order_item_id,
            qty: order.qty,
            created_at,
        })
    }

    pub fn id(&self) -> UsageId {
        self.id
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    pub fn order_item_id(&self) -> i64 {
        self.order_item_id
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Order line a usage row is booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub order_id: i64,
    pub order_item_id: i64,
    pub qty: i64,
}

impl OrderLine {
    pub fn new(order_id: i64, order_item_id: i64, qty: i64) -> Self {
        Self {
            order_id,
            order_item_id,
            qty,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.order_id <= 0 {
            return Err(ValidationError::out_of_range("order_id", 1, i64::MAX, self.order_id));
        }
        if self.order_item_id <= 0 {
            return Err(ValidationError::out_of_range(
                "order_item_id",
                1,
                i64::MAX,
                self.order_item_id,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(started_at: Timestamp, ended_at: Option<Timestamp>) -> MemberGroupSubscription {
        MemberGroupSubscription::new(
            SubscriptionId::new(1),
            MemberGroupId::new(1),
            PlanId::new(1),
            started_at,
            ended_at,
            Timestamp::now(),
        )
    }

    #[test]
    fn open_ended_subscription_started_in_past_is_active() {
        let now = Timestamp::now();
        assert!(subscription(now.minus_days(10), None).is_active_at(&now));
    }

    #[test]
    fn window_start_is_inclusive() {
        let now = Timestamp::now();
        assert!(subscription(now, None).is_active_at(&now));
    }

    #[test]
    fn window_end_is_exclusive() {
        let now = Timestamp::now();
        assert!(!subscription(now.minus_days(10), Some(now)).is_active_at(&now));
    }

    #[test]
    fn future_subscription_is_not_active() {
        let now = Timestamp::now();
        assert!(!subscription(now.add_days(1), None).is_active_at(&now));
    }

    #[test]
    fn ending_a_subscription_closes_the_window() {
        let now = Timestamp::now();
        let mut sub = subscription(now.minus_days(30), None);
        sub.end(Some(now.minus_days(1)));
        assert!(!sub.is_active_at(&now));

        sub.end(None);
        assert!(sub.is_active_at(&now));
    }

    #[test]
    fn mark_notified_records_instant() {
        let now = Timestamp::now();
        let mut sub = subscription(now, None);
        sub.mark_notified(now);
        assert_eq!(sub.notified_at(), Some(now));
    }

    #[test]
    fn usage_accepts_negative_qty_as_credit() {
        let usage = SubscriptionUsage::new(
            UsageId::new(1),
            MemberId::new(1),
            SubscriptionId::new(1),
            OrderLine::new(10, 11, -2),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(usage.qty(), -2);
    }

    #[test]
    fn usage_requires_positive_order_references() {
        let result = SubscriptionUsage::new(
            UsageId::new(1),
            MemberId::new(1),
            SubscriptionId::new(1),
            OrderLine::new(0, 11, 1),
            Timestamp::now(),
        );
        assert!(result.is_err());
    }
}
