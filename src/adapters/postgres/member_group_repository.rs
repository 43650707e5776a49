//! PostgreSQL implementation of MemberGroupRepository.
//!
//! Loads a member group with its company, members, subscriptions (and
//! their plans) and usage rows into a `MembershipGraph`, and writes back
//! the mutable fields in a single transaction.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{db_error, GroupRow, MemberRow, SubscriptionRow, UsageRow};
use crate::domain::foundation::{DomainError, ErrorCode, MemberGroupId, MemberId};
use crate::domain::membership::{Member, MembershipGraph, SubscriptionUsage};
use crate::ports::MemberGroupRepository;

/// Postgres SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL implementation of the MemberGroupRepository port.
pub struct PostgresMemberGroupRepository {
    pool: PgPool,
}

impl PostgresMemberGroupRepository {
    /// Creates a new PostgresMemberGroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn group_not_found(id: MemberGroupId) -> DomainError {
    DomainError::new(ErrorCode::MemberGroupNotFound, "Member group not found")
        .with_detail("lookup_key", id.to_string())
}

fn member_not_found(id: MemberId) -> DomainError {
    DomainError::new(ErrorCode::MemberNotFound, "Member not found")
        .with_detail("lookup_key", id.to_string())
}

#[async_trait]
impl MemberGroupRepository for PostgresMemberGroupRepository {
    async fn find_by_id(&self, id: MemberGroupId) -> Result<Option<MembershipGraph>, DomainError> {
        let group: Option<GroupRow> = sqlx::query_as(
            r#"
            SELECT g.id, g.company_id, c.title AS company_title, g.external_id, g.email,
                   g.active, g.created_at
            FROM member_groups g
            JOIN companies c ON c.id = g.company_id
            WHERE g.id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find member group"))?;

        let Some(group) = group else {
            return Ok(None);
        };

        let members: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT id, group_id, relationship, firstname, lastname, birthday, active,
                   customer_id, created_at
            FROM members
            WHERE group_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load group members"))?;

        let subscriptions: Vec<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.group_id, s.plan_id, p.title AS plan_title, s.started_at,
                   s.ended_at, s.notified_at, s.created_at
            FROM member_group_subscriptions s
            JOIN plans p ON p.id = s.plan_id
            WHERE s.group_id = $1
            ORDER BY s.created_at ASC, s.id ASC
            "#,
        )
        .bind(id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load group subscriptions"))?;

        let usages: Vec<UsageRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.member_id, u.subscription_id, u.order_id, u.order_item_id,
                   u.qty, u.created_at
            FROM member_group_subscription_usages u
            JOIN member_group_subscriptions s ON s.id = u.subscription_id
            WHERE s.group_id = $1
            ORDER BY u.id ASC
            "#,
        )
        .bind(id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load subscription usage"))?;

        let mut graph = MembershipGraph::new();
        let (company, group) = group.into_parts();
        graph.insert_company(company);
        graph.insert_group(group);
        for row in members {
            graph.insert_member(Member::try_from(row)?);
        }
        for row in subscriptions {
            let (plan, subscription) = row.into_parts();
            graph.insert_plan(plan);
            graph.insert_subscription(subscription);
        }
        for row in usages {
            graph.insert_usage(SubscriptionUsage::from(row));
        }

        Ok(Some(graph))
    }

    async fn find_by_member_id(
        &self,
        member_id: MemberId,
    ) -> Result<Option<MembershipGraph>, DomainError> {
        let group_id: Option<i64> = sqlx::query_scalar("SELECT group_id FROM members WHERE id = $1")
            .bind(member_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find member"))?;

        match group_id {
            Some(group_id) => self.find_by_id(MemberGroupId::new(group_id)).await,
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        graph: &MembershipGraph,
        group_id: MemberGroupId,
    ) -> Result<(), DomainError> {
        let group = graph.group(group_id).ok_or_else(|| group_not_found(group_id))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let result = sqlx::query("UPDATE member_groups SET email = $2, active = $3 WHERE id = $1")
            .bind(group_id.value())
            .bind(group.email())
            .bind(group.is_active())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to update member group"))?;

        if result.rows_affected() == 0 {
            return Err(group_not_found(group_id));
        }

        for member in graph.members_of(group_id) {
            sqlx::query("UPDATE members SET active = $2, customer_id = $3 WHERE id = $1")
                .bind(member.id().value())
                .bind(member.is_active())
                .bind(member.customer_id())
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to update member"))?;
        }

        for subscription in graph.subscriptions_of(group_id) {
            sqlx::query(
                "UPDATE member_group_subscriptions SET ended_at = $2, notified_at = $3 WHERE id = $1",
            )
            .bind(subscription.id().value())
            .bind(subscription.ended_at().map(|t| *t.as_datetime()))
            .bind(subscription.notified_at().map(|t| *t.as_datetime()))
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to update subscription"))?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit member group update"))?;

        Ok(())
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                        return DomainError::validation(
                            "member_id",
                            "Member has recorded subscription usage",
                        )
                        .with_detail("constraint", "member has recorded subscription usage");
                    }
                }
                DomainError::database("Failed to delete member", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(member_not_found(member_id));
        }

        Ok(())
    }
}
