//! Result assembler for the simple, page-numbered listing.
//!
//! Page numbers start at 1. Out-of-range paging input is never an error:
//! a page below 1 becomes 1 and a non-positive page size becomes the
//! default of 10 (it is not clamped to 1).

use serde::Serialize;

use crate::domain::foundation::{MemberId, PlanId, Timestamp};
use crate::domain::membership::{
    Member, MemberGroup, MemberGroupSubscription, MembershipGraph, Relationship,
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Normalised page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).max(DEFAULT_PAGE);
        let per_page = match per_page {
            Some(n) if n > 0 => n,
            _ => DEFAULT_PER_PAGE,
        };
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        self.per_page.saturating_mul(self.page - 1)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One fetched page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Size of the whole result set, not of `items`.
    pub total: u64,
}

/// Page DTO handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_pages: u64,
    pub current_page: i64,
    pub total_items: u64,
    pub per_page: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps a fetched page, mapping each item.
    pub fn assemble<S, F>(request: PageRequest, source: Paginated<S>, map: F) -> Self
    where
        F: FnMut(S) -> T,
    {
        Self {
            total_pages: total_pages(source.total, request.per_page()),
            current_page: request.page(),
            total_items: source.total,
            per_page: request.per_page(),
            items: source.items.into_iter().map(map).collect(),
        }
    }
}

/// `ceil(total / per_page)`; zero items make zero pages.
pub fn total_pages(total: u64, per_page: i64) -> u64 {
    let per_page = per_page.max(1) as u64;
    (total + per_page - 1) / per_page
}

/// A member with the parts of its group needed for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub member: Member,
    pub group: MemberGroup,
    /// The group's chronologically last subscription, in force or not.
    pub last_subscription: Option<MemberGroupSubscription>,
}

impl MemberEntry {
    pub fn from_graph(graph: &MembershipGraph, member_id: MemberId) -> Option<Self> {
        let member = graph.member(member_id)?;
        let group = graph.group_of(member)?;
        Some(Self {
            member: member.clone(),
            group: group.clone(),
            last_subscription: graph.last_subscription(group.id()).cloned(),
        })
    }

    /// Last subscription if it is in force at `now`; earlier ones are never used.
    pub fn active_subscription(&self, now: &Timestamp) -> Option<&MemberGroupSubscription> {
        self.last_subscription
            .as_ref()
            .filter(|subscription| subscription.is_active_at(now))
    }
}

/// Public shape of a member in the simple listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListItem {
    /// The group's external id.
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub plan_id: Option<PlanId>,
    pub plan_start_date: Option<String>,
    pub plan_end_date: Option<String>,
    pub email: String,
    pub birthday: String,
    pub relationship: Relationship,
}

impl MemberListItem {
    pub fn from_entry(entry: &MemberEntry, now: &Timestamp) -> Self {
        let subscription = entry.active_subscription(now);
        Self {
            member_id: entry.group.external_id().to_string(),
            first_name: entry.member.firstname().to_string(),
            last_name: entry.member.lastname().to_string(),
            plan_id: subscription.map(|s| s.plan_id()),
            plan_start_date: subscription.map(|s| s.started_at().format_date()),
            plan_end_date: subscription
                .and_then(|s| s.ended_at())
                .map(|ended| ended.format_date()),
            email: entry.group.email().to_string(),
            birthday: entry.member.birthday().format("%Y-%m-%d").to_string(),
            relationship: entry.member.relationship(),
        }
    }
}
