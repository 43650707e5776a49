//! Mock ports and fixtures shared by the member handler tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

use crate::domain::foundation::{
    CompanyId, DomainError, ErrorCode, MemberGroupId, MemberId, SubscriptionId, Timestamp,
};
use crate::domain::listing::{ComposedQuery, MemberEntry, MemberSearchResult, Paginated};
use crate::domain::membership::{MembershipGraph, NewMember, Relationship};
use crate::ports::{EmailAndName, MemberGroupRepository, MemberReader};

// ════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════

pub struct Family {
    pub graph: MembershipGraph,
    pub company: CompanyId,
    pub group: MemberGroupId,
    pub primary: MemberId,
    pub spouse: MemberId,
    pub subscription: SubscriptionId,
}

/// Active Smith family of Acme with a Gold plan in force since yesterday.
pub fn family() -> Family {
    let now = Timestamp::now();
    let mut graph = MembershipGraph::new();
    let company = graph.add_company("Acme");
    let plan = graph.add_plan("Gold");
    let group = graph
        .create_group(company, "ext-1", "family@example.com", now)
        .unwrap();
    let primary = graph
        .add_member(
            group,
            NewMember::new(
                Relationship::Primary,
                "John",
                "Smith",
                NaiveDate::from_ymd_opt(1980, 4, 2).unwrap(),
            ),
            now,
        )
        .unwrap();
    let spouse = graph
        .add_member(
            group,
            NewMember::new(
                Relationship::Spouse,
                "Jane",
                "Smith",
                NaiveDate::from_ymd_opt(1982, 8, 20).unwrap(),
            ),
            now,
        )
        .unwrap();
    let subscription = graph
        .add_subscription(group, plan, now.minus_days(1), None, now)
        .unwrap();
    graph.activate(group, &now).unwrap();

    Family {
        graph,
        company,
        group,
        primary,
        spouse,
        subscription,
    }
}

fn simulated_failure() -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, "Simulated database failure")
}

// ════════════════════════════════════════════════════════════════════════════
// Mock Reader
// ════════════════════════════════════════════════════════════════════════════

pub struct MockMemberReader {
    entries: Vec<MemberEntry>,
    search_result: MemberSearchResult,
    fail: bool,
    searches: Mutex<Vec<ComposedQuery>>,
}

impl MockMemberReader {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            search_result: MemberSearchResult::default(),
            fail: false,
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Reader serving every member of `graph`.
    pub fn with_graph(graph: &MembershipGraph) -> Self {
        Self {
            entries: graph
                .members()
                .filter_map(|m| MemberEntry::from_graph(graph, m.id()))
                .collect(),
            ..Self::new()
        }
    }

    pub fn with_search_result(result: MemberSearchResult) -> Self {
        Self {
            search_result: result,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn searches(&self) -> Vec<ComposedQuery> {
        self.searches.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail {
            return Err(simulated_failure());
        }
        Ok(())
    }

    fn listed(entry: &MemberEntry) -> bool {
        entry.member.is_active() && entry.group.is_active()
    }
}

#[async_trait]
impl MemberReader for MockMemberReader {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<MemberEntry>, DomainError> {
        self.check()?;
        Ok(self.entries.iter().find(|e| e.member.id() == id).cloned())
    }

    async fn find_by_name(
        &self,
        firstname: &str,
        lastname: &str,
    ) -> Result<Option<MemberEntry>, DomainError> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .find(|e| e.member.firstname() == firstname && e.member.lastname() == lastname)
            .cloned())
    }

    async fn find_group_members(
        &self,
        company_id: CompanyId,
        external_id: &str,
    ) -> Result<Vec<MemberEntry>, DomainError> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .filter(|e| {
                Self::listed(e)
                    && e.group.company_id() == company_id
                    && e.group.external_id() == external_id
            })
            .cloned()
            .collect())
    }

    async fn find_by_email_and_name(
        &self,
        criteria: &EmailAndName,
    ) -> Result<Option<MemberEntry>, DomainError> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .find(|e| {
                e.member.is_active()
                    && e.group.email() == criteria.email
                    && e.member.firstname() == criteria.firstname
                    && e.member.lastname() == criteria.lastname
                    && e.member.birthday() == criteria.birthday
            })
            .cloned())
    }

    async fn find_active_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Option<MemberEntry>, DomainError> {
        self.check()?;
        Ok(self
            .entries
            .iter()
            .find(|e| e.member.is_active() && e.member.customer_id() == Some(customer_id))
            .cloned())
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
        offset: i64,
        limit: i64,
    ) -> Result<Paginated<MemberEntry>, DomainError> {
        self.check()?;
        let matching: Vec<MemberEntry> = self
            .entries
            .iter()
            .filter(|e| Self::listed(e) && e.group.company_id() == company_id)
            .cloned()
            .collect();
        let total = matching.len() as u64;
        Ok(Paginated {
            items: matching
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect(),
            total,
        })
    }

    async fn search(
        &self,
        query: &ComposedQuery,
        _now: &Timestamp,
    ) -> Result<MemberSearchResult, DomainError> {
        self.check()?;
        self.searches.lock().unwrap().push(query.clone());
        Ok(self.search_result.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Mock Repository
// ════════════════════════════════════════════════════════════════════════════

pub struct MockMemberGroupRepository {
    graph: Mutex<MembershipGraph>,
    fail_update: bool,
    updates: Mutex<Vec<MemberGroupId>>,
    deleted: Mutex<Vec<MemberId>>,
}

impl MockMemberGroupRepository {
    pub fn new() -> Self {
        Self::with_graph(MembershipGraph::new())
    }

    pub fn with_graph(graph: MembershipGraph) -> Self {
        Self {
            graph: Mutex::new(graph),
            fail_update: false,
            updates: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_update(graph: MembershipGraph) -> Self {
        Self {
            fail_update: true,
            ..Self::with_graph(graph)
        }
    }

    pub fn stored(&self) -> MembershipGraph {
        self.graph.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<MemberGroupId> {
        self.updates.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<MemberId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemberGroupRepository for MockMemberGroupRepository {
    async fn find_by_id(&self, id: MemberGroupId) -> Result<Option<MembershipGraph>, DomainError> {
        let graph = self.graph.lock().unwrap();
        Ok(graph.group(id).map(|_| graph.clone()))
    }

    async fn find_by_member_id(
        &self,
        member_id: MemberId,
    ) -> Result<Option<MembershipGraph>, DomainError> {
        let graph = self.graph.lock().unwrap();
        Ok(graph.member(member_id).map(|_| graph.clone()))
    }

    async fn update(
        &self,
        graph: &MembershipGraph,
        group_id: MemberGroupId,
    ) -> Result<(), DomainError> {
        if self.fail_update {
            return Err(simulated_failure());
        }
        *self.graph.lock().unwrap() = graph.clone();
        self.updates.lock().unwrap().push(group_id);
        Ok(())
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<(), DomainError> {
        self.graph
            .lock()
            .unwrap()
            .remove_member(member_id)
            .map_err(DomainError::from)?;
        self.deleted.lock().unwrap().push(member_id);
        Ok(())
    }
}
