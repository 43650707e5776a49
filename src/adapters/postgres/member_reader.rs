//! PostgreSQL implementation of MemberReader.
//!
//! Point lookups use static SQL. The composed search is rendered with
//! `sqlx::QueryBuilder`: every filter value and the `now` instant are
//! bound parameters, only field expressions from the closed
//! [`FieldPath`] set are written into the SQL text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::rows::{db_error, EntryRow, SummaryRow, ENTRY_SELECT};
use crate::domain::foundation::{CompanyId, DomainError, MemberId, Timestamp};
use crate::domain::listing::{
    ComposedQuery, Condition, MemberEntry, MemberSearchResult, MemberSummary, Operand, Paginated,
    Predicate,
};
use crate::ports::{EmailAndName, MemberReader};

const SUMMARY_COLUMNS: &str = r#"
    SELECT m.id, m.customer_id, g.external_id,
           (m.firstname || ' ' || m.lastname) AS full_name,
           g.email, c.title AS company_title, p.title AS plan_title,
           m.created_at, m.relationship, m.birthday, m.active
"#;

/// PostgreSQL implementation of the MemberReader port.
pub struct PostgresMemberReader {
    pool: PgPool,
}

impl PostgresMemberReader {
    /// Creates a new PostgresMemberReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_entry(
        &self,
        mut query: QueryBuilder<'_, Postgres>,
        context: &'static str,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let row: Option<EntryRow> = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(context))?;

        row.map(MemberEntry::try_from).transpose()
    }
}

/// Appends the listing join path.
///
/// The subscription joined per group is the highest id among those whose
/// window contains `now`; groups without one get NULL subscription and
/// plan columns.
fn push_join_path(query: &mut QueryBuilder<'_, Postgres>, now: DateTime<Utc>) {
    query.push(
        r#"
    FROM members m
    JOIN member_groups g ON g.id = m.group_id
    JOIN companies c ON c.id = g.company_id
    LEFT JOIN member_group_subscriptions s ON s.id = (
        SELECT MAX(s2.id)
        FROM member_group_subscriptions s2
        WHERE s2.group_id = g.id
          AND s2.started_at <= "#,
    );
    query.push_bind(now);
    query.push(" AND (s2.ended_at IS NULL OR s2.ended_at > ");
    query.push_bind(now);
    query.push("))\n    LEFT JOIN plans p ON p.id = s.plan_id");
}

fn push_operand(query: &mut QueryBuilder<'_, Postgres>, operand: &Operand) {
    match operand {
        Operand::Integer(value) => query.push_bind(*value),
        Operand::Text(value) => query.push_bind(value.clone()),
        Operand::Boolean(value) => query.push_bind(*value),
        Operand::Timestamp(value) => query.push_bind(*value.as_datetime()),
        Operand::Date(value) => query.push_bind(*value),
    };
}

fn push_predicate(query: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    let expr = predicate.field.sql();
    match &predicate.condition {
        Condition::Equals(value) => {
            query.push(expr).push(" = ");
            push_operand(query, value);
        }
        Condition::Between { from, to } => {
            query.push("(");
            if let Some(from) = from {
                query.push(expr).push(" >= ");
                push_operand(query, from);
            }
            if from.is_some() && to.is_some() {
                query.push(" AND ");
            }
            if let Some(to) = to {
                query.push(expr).push(" <= ");
                push_operand(query, to);
            }
            query.push(")");
        }
        Condition::Contains(needle) => {
            query.push("strpos(").push(expr).push(", ");
            query.push_bind(needle.clone());
            query.push(") > 0");
        }
        Condition::OneOf(options) if options.is_empty() => {
            query.push("FALSE");
        }
        Condition::OneOf(options) => {
            query.push(expr).push(" IN (");
            for (i, option) in options.iter().enumerate() {
                if i > 0 {
                    query.push(", ");
                }
                push_operand(query, option);
            }
            query.push(")");
        }
    }
}

fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        query.push(if i == 0 { "\n    WHERE " } else { " AND " });
        push_predicate(query, predicate);
    }
}

/// Row query: join path, predicates, ordering and paging.
pub(super) fn search_query(composed: &ComposedQuery, now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(SUMMARY_COLUMNS);
    push_join_path(&mut query, now);
    push_predicates(&mut query, &composed.predicates);

    query
        .push("\n    ORDER BY ")
        .push(composed.order.field.sql())
        .push(" ")
        .push(composed.order.direction.as_sql());
    if composed.order.field != ComposedQuery::TIE_BREAKER {
        query
            .push(", ")
            .push(ComposedQuery::TIE_BREAKER.sql())
            .push(" ASC");
    }

    query.push("\n    LIMIT ");
    query.push_bind(composed.limit);
    query.push(" OFFSET ");
    query.push_bind(composed.offset);
    query
}

/// Count query: identical join path and predicates, no ordering or paging.
pub(super) fn count_query(composed: &ComposedQuery, now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(m.id)");
    push_join_path(&mut query, now);
    push_predicates(&mut query, &composed.predicates);
    query
}

#[async_trait]
impl MemberReader for PostgresMemberReader {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<MemberEntry>, DomainError> {
        let mut query = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE m.id = ").push_bind(id.value());
        self.fetch_entry(query, "Failed to find member").await
    }

    async fn find_by_name(
        &self,
        firstname: &str,
        lastname: &str,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let mut query = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE m.firstname = ").push_bind(firstname.to_string());
        query.push(" AND m.lastname = ").push_bind(lastname.to_string());
        query.push(" ORDER BY m.id ASC LIMIT 1");
        self.fetch_entry(query, "Failed to find member by name").await
    }

    async fn find_group_members(
        &self,
        company_id: CompanyId,
        external_id: &str,
    ) -> Result<Vec<MemberEntry>, DomainError> {
        let mut query = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE g.company_id = ").push_bind(company_id.value());
        query.push(" AND g.external_id = ").push_bind(external_id.to_string());
        query.push(" AND m.active AND g.active ORDER BY m.id ASC");

        let rows: Vec<EntryRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to find member group"))?;

        rows.into_iter().map(MemberEntry::try_from).collect()
    }

    async fn find_by_email_and_name(
        &self,
        criteria: &EmailAndName,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let mut query = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE g.email = ").push_bind(criteria.email.clone());
        query.push(" AND m.firstname = ").push_bind(criteria.firstname.clone());
        query.push(" AND m.lastname = ").push_bind(criteria.lastname.clone());
        query.push(" AND m.birthday = ").push_bind(criteria.birthday);
        query.push(" AND m.active ORDER BY m.id ASC LIMIT 1");
        self.fetch_entry(query, "Failed to find member by email and name")
            .await
    }

    async fn find_active_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let mut query = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE m.customer_id = ").push_bind(customer_id);
        query.push(" AND m.active ORDER BY m.id ASC LIMIT 1");
        self.fetch_entry(query, "Failed to find member by customer")
            .await
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
        offset: i64,
        limit: i64,
    ) -> Result<Paginated<MemberEntry>, DomainError> {
        let mut query = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE g.company_id = ").push_bind(company_id.value());
        query.push(" AND m.active AND g.active ORDER BY m.id ASC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let rows: Vec<EntryRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list company members"))?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(m.id)
            FROM members m
            JOIN member_groups g ON g.id = m.group_id
            WHERE g.company_id = $1 AND m.active AND g.active
            "#,
        )
        .bind(company_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count company members"))?;

        Ok(Paginated {
            items: rows
                .into_iter()
                .map(MemberEntry::try_from)
                .collect::<Result<_, _>>()?,
            total: total.max(0) as u64,
        })
    }

    async fn search(
        &self,
        query: &ComposedQuery,
        now: &Timestamp,
    ) -> Result<MemberSearchResult, DomainError> {
        let now = *now.as_datetime();

        let rows: Vec<SummaryRow> = search_query(query, now)
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to search members"))?;

        let total: i64 = count_query(query, now)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count members"))?;

        Ok(MemberSearchResult {
            rows: rows
                .into_iter()
                .map(MemberSummary::try_from)
                .collect::<Result<_, _>>()?,
            total_count: total.max(0) as u64,
        })
    }
}
