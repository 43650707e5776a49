//! Member reader port (read side / queries).
//!
//! Every lookup the registry answers without mutating anything: point
//! lookups, the simple company listing and the registry-driven search.
//!
//! # Design
//!
//! - **Entries, not aggregates**: lookups return [`MemberEntry`] values
//!   carrying the member, its group and the group's last subscription,
//!   which is all the public mapping needs
//! - **Composed search**: `search` receives an already resolved
//!   [`ComposedQuery`]; implementations render or evaluate it and never
//!   consult the filter registry themselves
//!
//! # Example
//!
//! ```ignore
//! async fn first_page(reader: &dyn MemberReader, company: CompanyId) -> Result<u64, DomainError> {
//!     let page = reader.list_by_company(company, 0, 10).await?;
//!     Ok(page.total)
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{CompanyId, DomainError, MemberId, Timestamp};
use crate::domain::listing::{ComposedQuery, MemberEntry, MemberSearchResult, Paginated};

/// Exact-match criteria for [`MemberReader::find_by_email_and_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAndName {
    /// Email of the member's group.
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub birthday: NaiveDate,
}

/// Reader port for member queries.
#[async_trait]
pub trait MemberReader: Send + Sync {
    /// Member by id, active or not.
    async fn find_by_id(&self, id: MemberId) -> Result<Option<MemberEntry>, DomainError>;

    /// First member (lowest id) with exactly these names, active or not.
    async fn find_by_name(
        &self,
        firstname: &str,
        lastname: &str,
    ) -> Result<Option<MemberEntry>, DomainError>;

    /// Active members of the active group `external_id` of `company_id`.
    ///
    /// Returns an empty list when nothing matches.
    async fn find_group_members(
        &self,
        company_id: CompanyId,
        external_id: &str,
    ) -> Result<Vec<MemberEntry>, DomainError>;

    /// Active member whose group email, names and birthday all match.
    async fn find_by_email_and_name(
        &self,
        criteria: &EmailAndName,
    ) -> Result<Option<MemberEntry>, DomainError>;

    /// Active member linked to a shop customer.
    async fn find_active_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Option<MemberEntry>, DomainError>;

    /// Active members of active groups of a company, ordered by member id.
    ///
    /// `total` counts the whole matching set, not the returned slice.
    async fn list_by_company(
        &self,
        company_id: CompanyId,
        offset: i64,
        limit: i64,
    ) -> Result<Paginated<MemberEntry>, DomainError>;

    /// Runs a composed listing query with the subscription window
    /// evaluated at `now`.
    ///
    /// `total_count` uses the same joins and predicates without ordering
    /// or paging.
    async fn search(
        &self,
        query: &ComposedQuery,
        now: &Timestamp,
    ) -> Result<MemberSearchResult, DomainError>;
}
