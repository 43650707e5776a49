//! Row types shared by the PostgreSQL member adapters.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::foundation::{
    CompanyId, DomainError, ErrorCode, MemberGroupId, MemberId, PlanId, SubscriptionId, Timestamp,
    UsageId,
};
use crate::domain::listing::{MemberEntry, MemberSummary};
use crate::domain::membership::{
    Company, Member, MemberGroup, MemberGroupSubscription, Plan, Relationship, SubscriptionUsage,
};

/// Columns of a member joined with its group and the group's last
/// subscription. Pair with [`ENTRY_SELECT`].
pub(super) const ENTRY_SELECT: &str = r#"
    SELECT m.id, m.group_id, m.relationship, m.firstname, m.lastname, m.birthday,
           m.active, m.customer_id, m.created_at,
           g.company_id, g.external_id, g.email, g.active AS group_active,
           g.created_at AS group_created_at,
           s.id AS subscription_id, s.plan_id, s.started_at, s.ended_at, s.notified_at,
           s.created_at AS subscription_created_at
    FROM members m
    JOIN member_groups g ON g.id = m.group_id
    LEFT JOIN LATERAL (
        SELECT s0.*
        FROM member_group_subscriptions s0
        WHERE s0.group_id = g.id
        ORDER BY s0.created_at DESC, s0.id DESC
        LIMIT 1
    ) s ON TRUE
"#;

/// Wraps a sqlx failure with context.
pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::database(context, e)
}

pub(super) fn parse_relationship(s: &str) -> Result<Relationship, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid relationship value: {}", s),
        )
    })
}

fn ts(dt: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct EntryRow {
    id: i64,
    group_id: i64,
    relationship: String,
    firstname: String,
    lastname: String,
    birthday: NaiveDate,
    active: bool,
    customer_id: Option<i64>,
    created_at: DateTime<Utc>,
    company_id: i64,
    external_id: String,
    email: String,
    group_active: bool,
    group_created_at: DateTime<Utc>,
    subscription_id: Option<i64>,
    plan_id: Option<i64>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    notified_at: Option<DateTime<Utc>>,
    subscription_created_at: Option<DateTime<Utc>>,
}

impl TryFrom<EntryRow> for MemberEntry {
    type Error = DomainError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let group_id = MemberGroupId::new(row.group_id);

        let last_subscription = match (
            row.subscription_id,
            row.plan_id,
            row.started_at,
            row.subscription_created_at,
        ) {
            (Some(id), Some(plan_id), Some(started_at), Some(created_at)) => {
                Some(MemberGroupSubscription {
                    id: SubscriptionId::new(id),
                    group_id,
                    plan_id: PlanId::new(plan_id),
                    started_at: ts(started_at),
                    ended_at: row.ended_at.map(ts),
                    notified_at: row.notified_at.map(ts),
                    created_at: ts(created_at),
                })
            }
            _ => None,
        };

        Ok(MemberEntry {
            member: Member {
                id: MemberId::new(row.id),
                group_id,
                relationship: parse_relationship(&row.relationship)?,
                firstname: row.firstname,
                lastname: row.lastname,
                birthday: row.birthday,
                active: row.active,
                customer_id: row.customer_id,
                created_at: ts(row.created_at),
            },
            group: MemberGroup {
                id: group_id,
                company_id: CompanyId::new(row.company_id),
                external_id: row.external_id,
                email: row.email,
                active: row.group_active,
                created_at: ts(row.group_created_at),
                subscription_ids: last_subscription.iter().map(|s| s.id).collect(),
                member_ids: vec![MemberId::new(row.id)],
            },
            last_subscription,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SummaryRow {
    id: i64,
    customer_id: Option<i64>,
    external_id: String,
    full_name: String,
    email: String,
    company_title: String,
    plan_title: Option<String>,
    created_at: DateTime<Utc>,
    relationship: String,
    birthday: NaiveDate,
    active: bool,
}

impl TryFrom<SummaryRow> for MemberSummary {
    type Error = DomainError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(MemberSummary {
            id: MemberId::new(row.id),
            customer_id: row.customer_id,
            external_id: row.external_id,
            full_name: row.full_name,
            email: row.email,
            company_title: row.company_title,
            plan_title: row.plan_title,
            created_at: ts(row.created_at),
            relationship: parse_relationship(&row.relationship)?,
            birthday: row.birthday,
            active: row.active,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct GroupRow {
    pub id: i64,
    pub company_id: i64,
    pub company_title: String,
    pub external_id: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl GroupRow {
    pub fn into_parts(self) -> (Company, MemberGroup) {
        let company = Company::new(CompanyId::new(self.company_id), self.company_title);
        let group = MemberGroup {
            id: MemberGroupId::new(self.id),
            company_id: company.id,
            external_id: self.external_id,
            email: self.email,
            active: self.active,
            created_at: ts(self.created_at),
            subscription_ids: Vec::new(),
            member_ids: Vec::new(),
        };
        (company, group)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberRow {
    id: i64,
    group_id: i64,
    relationship: String,
    firstname: String,
    lastname: String,
    birthday: NaiveDate,
    active: bool,
    customer_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: MemberId::new(row.id),
            group_id: MemberGroupId::new(row.group_id),
            relationship: parse_relationship(&row.relationship)?,
            firstname: row.firstname,
            lastname: row.lastname,
            birthday: row.birthday,
            active: row.active,
            customer_id: row.customer_id,
            created_at: ts(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SubscriptionRow {
    id: i64,
    group_id: i64,
    plan_id: i64,
    plan_title: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    notified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl SubscriptionRow {
    pub fn into_parts(self) -> (Plan, MemberGroupSubscription) {
        let plan = Plan::new(PlanId::new(self.plan_id), self.plan_title);
        let subscription = MemberGroupSubscription {
            id: SubscriptionId::new(self.id),
            group_id: MemberGroupId::new(self.group_id),
            plan_id: plan.id,
            started_at: ts(self.started_at),
            ended_at: self.ended_at.map(ts),
            notified_at: self.notified_at.map(ts),
            created_at: ts(self.created_at),
        };
        (plan, subscription)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UsageRow {
    id: i64,
    member_id: i64,
    subscription_id: i64,
    order_id: i64,
    order_item_id: i64,
    qty: i64,
    created_at: DateTime<Utc>,
}

impl From<UsageRow> for SubscriptionUsage {
    fn from(row: UsageRow) -> Self {
        SubscriptionUsage {
            id: UsageId::new(row.id),
            member_id: MemberId::new(row.member_id),
            subscription_id: SubscriptionId::new(row.subscription_id),
            order_id: row.order_id,
            order_item_id: row.order_item_id,
            qty: row.qty,
            created_at: ts(row.created_at),
        }
    }
}
