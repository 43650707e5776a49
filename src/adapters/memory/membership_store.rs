//! In-memory membership store for tests and local runs.
//!
//! Holds one [`MembershipGraph`] behind an async `RwLock` and serves both
//! member ports from it. Reads hand out clones, so callers never observe
//! a half-applied update.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::search;
use crate::domain::foundation::{
    CompanyId, DomainError, ErrorCode, MemberGroupId, MemberId, SubscriptionId, Timestamp,
};
use crate::domain::listing::{ComposedQuery, MemberEntry, MemberSearchResult, Paginated};
use crate::domain::membership::{Member, MembershipGraph};
use crate::ports::{EmailAndName, MemberGroupRepository, MemberReader};

/// Shared in-memory backing for [`MemberReader`] and [`MemberGroupRepository`].
#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    graph: RwLock<MembershipGraph>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing graph.
    pub fn from_graph(graph: MembershipGraph) -> Self {
        Self {
            graph: RwLock::new(graph),
        }
    }

    /// Copy of the whole graph.
    pub async fn snapshot(&self) -> MembershipGraph {
        self.graph.read().await.clone()
    }

    /// Runs `f` against the stored graph; used to seed fixtures.
    pub async fn modify<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut MembershipGraph) -> R,
    {
        let mut graph = self.graph.write().await;
        f(&mut graph)
    }
}

/// The group of `group_id` with everything hanging off it.
fn group_slice(graph: &MembershipGraph, group_id: MemberGroupId) -> Option<MembershipGraph> {
    let group = graph.group(group_id)?;
    let mut slice = MembershipGraph::new();

    if let Some(company) = graph.company(group.company_id()) {
        slice.insert_company(company.clone());
    }

    let mut bare = group.clone();
    bare.member_ids.clear();
    bare.subscription_ids.clear();
    slice.insert_group(bare);

    for member in graph.members_of(group_id) {
        slice.insert_member(member.clone());
    }

    let mut subscription_ids: Vec<SubscriptionId> = Vec::new();
    for subscription in graph.subscriptions_of(group_id) {
        if let Some(plan) = graph.plan(subscription.plan_id()) {
            slice.insert_plan(plan.clone());
        }
        subscription_ids.push(subscription.id());
        slice.insert_subscription(subscription.clone());
    }

    for usage in graph
        .usages()
        .filter(|u| subscription_ids.contains(&u.subscription_id()))
    {
        slice.insert_usage(usage.clone());
    }

    Some(slice)
}

fn entries<'a, I>(graph: &MembershipGraph, members: I) -> Vec<MemberEntry>
where
    I: Iterator<Item = &'a Member>,
{
    members
        .filter_map(|member| MemberEntry::from_graph(graph, member.id()))
        .collect()
}

/// Member with an active group; inactive groups are invisible to lookups
/// that require an active member.
fn is_listed(graph: &MembershipGraph, member: &Member) -> bool {
    member.is_active() && graph.group_of(member).map_or(false, |g| g.is_active())
}

#[async_trait]
impl MemberReader for InMemoryMembershipStore {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<MemberEntry>, DomainError> {
        let graph = self.graph.read().await;
        Ok(MemberEntry::from_graph(&graph, id))
    }

    async fn find_by_name(
        &self,
        firstname: &str,
        lastname: &str,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let graph = self.graph.read().await;
        let found = graph
            .members()
            .find(|m| m.firstname() == firstname && m.lastname() == lastname)
            .map(|m| m.id());
        Ok(found.and_then(|id| MemberEntry::from_graph(&graph, id)))
    }

    async fn find_group_members(
        &self,
        company_id: CompanyId,
        external_id: &str,
    ) -> Result<Vec<MemberEntry>, DomainError> {
        let graph = self.graph.read().await;
        let members = graph.members().filter(|m| {
            is_listed(&graph, m)
                && graph.group_of(m).map_or(false, |g| {
                    g.company_id() == company_id && g.external_id() == external_id
                })
        });
        Ok(entries(&graph, members))
    }

    async fn find_by_email_and_name(
        &self,
        criteria: &EmailAndName,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let graph = self.graph.read().await;
        let found = graph
            .members()
            .find(|m| {
                m.is_active()
                    && m.firstname() == criteria.firstname
                    && m.lastname() == criteria.lastname
                    && m.birthday() == criteria.birthday
                    && graph
                        .group_of(m)
                        .map_or(false, |g| g.email() == criteria.email)
            })
            .map(|m| m.id());
        Ok(found.and_then(|id| MemberEntry::from_graph(&graph, id)))
    }

    async fn find_active_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Option<MemberEntry>, DomainError> {
        let graph = self.graph.read().await;
        let found = graph
            .members()
            .find(|m| m.is_active() && m.customer_id() == Some(customer_id))
            .map(|m| m.id());
        Ok(found.and_then(|id| MemberEntry::from_graph(&graph, id)))
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
        offset: i64,
        limit: i64,
    ) -> Result<Paginated<MemberEntry>, DomainError> {
        let graph = self.graph.read().await;
        let matching: Vec<&Member> = graph
            .members()
            .filter(|m| {
                is_listed(&graph, m)
                    && graph
                        .group_of(m)
                        .map_or(false, |g| g.company_id() == company_id)
            })
            .collect();

        let total = matching.len() as u64;
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        let items = entries(
            &graph,
            matching.into_iter().skip(offset).take(limit),
        );

        Ok(Paginated { items, total })
    }

    async fn search(
        &self,
        query: &ComposedQuery,
        now: &Timestamp,
    ) -> Result<MemberSearchResult, DomainError> {
        let graph = self.graph.read().await;
        Ok(search::evaluate(&graph, query, now))
    }
}

#[async_trait]
impl MemberGroupRepository for InMemoryMembershipStore {
    async fn find_by_id(&self, id: MemberGroupId) -> Result<Option<MembershipGraph>, DomainError> {
        let graph = self.graph.read().await;
        Ok(group_slice(&graph, id))
    }

    async fn find_by_member_id(
        &self,
        member_id: MemberId,
    ) -> Result<Option<MembershipGraph>, DomainError> {
        let graph = self.graph.read().await;
        Ok(graph
            .member(member_id)
            .and_then(|m| group_slice(&graph, m.group_id())))
    }

    async fn update(
        &self,
        source: &MembershipGraph,
        group_id: MemberGroupId,
    ) -> Result<(), DomainError> {
        let mut graph = self.graph.write().await;
        if graph.group(group_id).is_none() {
            return Err(
                DomainError::new(ErrorCode::MemberGroupNotFound, "Member group not found")
                    .with_detail("lookup_key", group_id.to_string()),
            );
        }
        graph.copy_mutable_state(source, group_id)?;
        Ok(())
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<(), DomainError> {
        let mut graph = self.graph.write().await;
        graph.remove_member(member_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::{EntityKind, MembershipError, NewMember, OrderLine, Relationship};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn now() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap())
    }

    fn birthday(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 10).unwrap()
    }

    struct Fixture {
        store: InMemoryMembershipStore,
        company: CompanyId,
        group: MemberGroupId,
        primary: MemberId,
        spouse: MemberId,
        subscription: SubscriptionId,
    }

    fn fixture() -> Fixture {
        let mut graph = MembershipGraph::new();
        let company = graph.add_company("Acme");
        let plan = graph.add_plan("Gold");
        let group = graph
            .create_group(company, "ext-1", "family@example.com", now())
            .unwrap();
        let primary = graph
            .add_member(
                group,
                NewMember::new(Relationship::Primary, "John", "Smith", birthday(1980)),
                now(),
            )
            .unwrap();
        let spouse = graph
            .add_member(
                group,
                NewMember::new(Relationship::Spouse, "Jane", "Smith", birthday(1982)),
                now(),
            )
            .unwrap();
        let subscription = graph
            .add_subscription(group, plan, now().minus_days(1), None, now())
            .unwrap();
        graph.activate(group, &now()).unwrap();

        Fixture {
            store: InMemoryMembershipStore::from_graph(graph),
            company,
            group,
            primary,
            spouse,
            subscription,
        }
    }

    #[tokio::test]
    async fn group_slice_round_trips_through_update() {
        let f = fixture();
        let mut slice = MemberGroupRepository::find_by_id(&f.store, f.group)
            .await
            .unwrap()
            .unwrap();
        slice.deactivate(f.group).unwrap();
        f.store.update(&slice, f.group).await.unwrap();

        let stored = f.store.snapshot().await;
        assert!(!stored.group(f.group).unwrap().is_active());
        assert!(!stored.member(f.primary).unwrap().is_active());
    }

    #[tokio::test]
    async fn find_by_member_id_loads_the_members_group() {
        let f = fixture();
        let slice = f.store.find_by_member_id(f.spouse).await.unwrap().unwrap();
        assert_eq!(slice.members_of(f.group).count(), 2);
        assert!(slice.last_subscription(f.group).is_some());
    }

    #[tokio::test]
    async fn update_of_unknown_group_is_not_found() {
        let f = fixture();
        let err = f
            .store
            .update(&MembershipGraph::new(), MemberGroupId::new(99))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberGroupNotFound);
    }

    #[tokio::test]
    async fn delete_member_with_usage_is_rejected() {
        let f = fixture();
        f.store
            .modify(|g| g.record_usage(f.spouse, f.subscription, OrderLine::new(1, 1, 2), now()))
            .await
            .unwrap();

        let err: MembershipError = f.store.delete_member(f.spouse).await.unwrap_err().into();
        assert!(matches!(err, MembershipError::ValidationFailed { ref field, .. } if field == "member_id"));
        assert!(f.store.snapshot().await.member(f.spouse).is_some());
    }

    #[tokio::test]
    async fn delete_unknown_member_is_not_found() {
        let f = fixture();
        let err: MembershipError = f
            .store
            .delete_member(MemberId::new(404))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err, MembershipError::not_found(EntityKind::Member, 404));
    }

    #[tokio::test]
    async fn list_by_company_counts_all_active_members() {
        let f = fixture();
        let page = f.store.list_by_company(f.company, 1, 10).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].member.id(), f.spouse);
    }

    #[tokio::test]
    async fn find_by_email_and_name_matches_group_email() {
        let f = fixture();
        let criteria = EmailAndName {
            email: "family@example.com".to_string(),
            firstname: "Jane".to_string(),
            lastname: "Smith".to_string(),
            birthday: birthday(1982),
        };
        let found = f.store.find_by_email_and_name(&criteria).await.unwrap();
        assert_eq!(found.map(|e| e.member.id()), Some(f.spouse));

        let wrong = EmailAndName {
            email: "other@example.com".to_string(),
            ..criteria
        };
        assert!(f.store.find_by_email_and_name(&wrong).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_group_members_skips_inactive_groups() {
        let f = fixture();
        assert_eq!(
            f.store.find_group_members(f.company, "ext-1").await.unwrap().len(),
            2
        );
        f.store.modify(|g| g.deactivate(f.group)).await.unwrap();
        assert!(f
            .store
            .find_group_members(f.company, "ext-1")
            .await
            .unwrap()
            .is_empty());
    }
}
