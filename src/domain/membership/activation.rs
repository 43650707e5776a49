//! Activation state machine over a member group and its members.
//!
//! Activation is a one-shot cascade: the outcome is computed when the
//! transition runs and stored on the entities. Nothing re-derives the
//! flags on read, so removing the primary member later leaves an active
//! group active.
//!
//! ```text
//!            activate (has primary)
//!   INACTIVE ───────────────────────► ACTIVE
//!      ▲                                 │
//!      └──────────── deactivate ─────────┘
//! ```

use super::{EntityKind, MemberGroupSubscription, MembershipError, MembershipGraph};
use crate::domain::foundation::{MemberGroupId, MemberId, Timestamp};

/// Result of an activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The group was activated; `skipped` members were past the child age limit.
    Activated { activated: usize, skipped: usize },
    /// The group has no primary member and was left untouched.
    NoPrimaryMember,
}

impl ActivationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, ActivationOutcome::Activated { .. })
    }
}

impl MembershipGraph {
    /// Activates the group and every current member, if a primary member exists.
    pub fn activate(
        &mut self,
        group_id: MemberGroupId,
        now: &Timestamp,
    ) -> Result<ActivationOutcome, MembershipError> {
        let member_ids = self.require_group(group_id)?.member_ids.clone();
        if self.primary_member(group_id).is_none() {
            return Ok(ActivationOutcome::NoPrimaryMember);
        }

        self.group_mut(group_id)?.active = true;

        let (mut activated, mut skipped) = (0, 0);
        for id in member_ids {
            if let Some(member) = self.members.get_mut(&id) {
                if member.activate(now) {
                    activated += 1;
                } else {
                    skipped += 1;
                }
            }
        }

        Ok(ActivationOutcome::Activated { activated, skipped })
    }

    /// Deactivates the group and every current member.
    pub fn deactivate(&mut self, group_id: MemberGroupId) -> Result<(), MembershipError> {
        let member_ids = self.require_group(group_id)?.member_ids.clone();
        self.group_mut(group_id)?.active = false;
        for id in member_ids {
            if let Some(member) = self.members.get_mut(&id) {
                member.deactivate();
            }
        }
        Ok(())
    }

    /// The group's last subscription, if it is in force at `now`.
    ///
    /// Earlier subscriptions are never consulted, even when one of them
    /// would qualify on its own.
    pub fn active_subscription(
        &self,
        group_id: MemberGroupId,
        now: &Timestamp,
    ) -> Option<&MemberGroupSubscription> {
        self.last_subscription(group_id)
            .filter(|subscription| subscription.is_active_at(now))
    }

    /// Quantity the member consumed under the group's active subscription.
    ///
    /// `None` when there is no active subscription; `Some(0)` when there is
    /// one but the member has no usage rows under it.
    pub fn used_plan_qty(
        &self,
        member_id: MemberId,
        now: &Timestamp,
    ) -> Result<Option<i64>, MembershipError> {
        let member = self
            .member(member_id)
            .ok_or_else(|| MembershipError::not_found(EntityKind::Member, member_id))?;

        let qty = self
            .active_subscription(member.group_id(), now)
            .map(|subscription| {
                self.member_usages(subscription.id(), member_id)
                    .map(|usage| usage.qty())
                    .sum()
            });
        Ok(qty)
    }
}
