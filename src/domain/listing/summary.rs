//! Flat rows produced by the advanced listing.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::membership::Relationship;

/// One member of the listing join, projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: MemberId,
    pub customer_id: Option<i64>,
    pub external_id: String,
    pub full_name: String,
    pub email: String,
    pub company_title: String,
    /// Absent when the group has no subscription in force.
    pub plan_title: Option<String>,
    pub created_at: Timestamp,
    pub relationship: Relationship,
    pub birthday: NaiveDate,
    pub active: bool,
}

/// A page of summaries plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchResult {
    pub rows: Vec<MemberSummary>,
    pub total_count: u64,
}
