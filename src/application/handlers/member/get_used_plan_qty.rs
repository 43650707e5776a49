//! GetUsedPlanQtyHandler - Query handler for a member's consumption under
//! the group's active subscription.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::membership::{EntityKind, MembershipError};
use crate::ports::MemberGroupRepository;

#[derive(Debug, Clone, Copy)]
pub struct GetUsedPlanQtyQuery {
    pub member_id: MemberId,
}

/// `None` when the group has no active subscription; `Some(0)` when it has
/// one but the member consumed nothing under it.
pub type GetUsedPlanQtyResult = Option<i64>;

pub struct GetUsedPlanQtyHandler {
    repository: Arc<dyn MemberGroupRepository>,
}

impl GetUsedPlanQtyHandler {
    pub fn new(repository: Arc<dyn MemberGroupRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetUsedPlanQtyQuery,
    ) -> Result<GetUsedPlanQtyResult, MembershipError> {
        let graph = self
            .repository
            .find_by_member_id(query.member_id)
            .await?
            .ok_or_else(|| {
                warn!(member_id = %query.member_id, "Member not found");
                MembershipError::not_found(EntityKind::Member, query.member_id)
            })?;

        graph.used_plan_qty(query.member_id, &Timestamp::now())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{family, MockMemberGroupRepository};
    use super::*;
    use crate::domain::membership::OrderLine;

    #[tokio::test]
    async fn sums_usage_under_active_subscription() {
        let mut family = family();
        let now = Timestamp::now();
        family
            .graph
            .record_usage(family.primary, family.subscription, OrderLine::new(1, 1, 2), now)
            .unwrap();
        family
            .graph
            .record_usage(family.primary, family.subscription, OrderLine::new(2, 5, 3), now)
            .unwrap();
        family
            .graph
            .record_usage(family.spouse, family.subscription, OrderLine::new(3, 9, 4), now)
            .unwrap();
        let repo = Arc::new(MockMemberGroupRepository::with_graph(family.graph));

        let qty = GetUsedPlanQtyHandler::new(repo)
            .handle(GetUsedPlanQtyQuery {
                member_id: family.primary,
            })
            .await
            .unwrap();

        assert_eq!(qty, Some(5));
    }

    #[tokio::test]
    async fn zero_usage_is_zero_not_unknown() {
        let family = family();
        let repo = Arc::new(MockMemberGroupRepository::with_graph(family.graph));

        let qty = GetUsedPlanQtyHandler::new(repo)
            .handle(GetUsedPlanQtyQuery {
                member_id: family.spouse,
            })
            .await
            .unwrap();

        assert_eq!(qty, Some(0));
    }

    #[tokio::test]
    async fn ended_subscription_is_unknown() {
        let mut family = family();
        family
            .graph
            .end_subscription(family.subscription, Some(Timestamp::now().minus_days(1)))
            .unwrap();
        let repo = Arc::new(MockMemberGroupRepository::with_graph(family.graph));

        let qty = GetUsedPlanQtyHandler::new(repo)
            .handle(GetUsedPlanQtyQuery {
                member_id: family.primary,
            })
            .await
            .unwrap();

        assert_eq!(qty, None);
    }

    #[tokio::test]
    async fn missing_member_is_not_found() {
        let repo = Arc::new(MockMemberGroupRepository::new());
        let err = GetUsedPlanQtyHandler::new(repo)
            .handle(GetUsedPlanQtyQuery {
                member_id: MemberId::new(3),
            })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::not_found(EntityKind::Member, 3));
    }
}
