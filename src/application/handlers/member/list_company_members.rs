//! ListCompanyMembersHandler - Query handler for the simple, page-numbered listing.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{CompanyId, Timestamp};
use crate::domain::listing::{MemberListItem, Page, PageRequest};
use crate::domain::membership::MembershipError;
use crate::ports::MemberReader;

/// Query for one page of a company's active members.
#[derive(Debug, Clone)]
pub struct ListCompanyMembersQuery {
    pub company_id: CompanyId,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub type ListCompanyMembersResult = Page<MemberListItem>;

/// Handler for the simple company listing.
///
/// Only active members of active groups are listed, ordered by member id.
/// Plan fields come from each group's last subscription and are empty
/// when it is not in force.
pub struct ListCompanyMembersHandler {
    reader: Arc<dyn MemberReader>,
}

impl ListCompanyMembersHandler {
    pub fn new(reader: Arc<dyn MemberReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListCompanyMembersQuery,
    ) -> Result<ListCompanyMembersResult, MembershipError> {
        let request = PageRequest::new(query.page, query.per_page);
        let now = Timestamp::now();

        let fetched = self
            .reader
            .list_by_company(query.company_id, request.offset(), request.limit())
            .await?;

        debug!(
            company_id = %query.company_id,
            page = request.page(),
            per_page = request.per_page(),
            total = fetched.total,
            "Listed company members"
        );

        Ok(Page::assemble(request, fetched, |entry| {
            MemberListItem::from_entry(&entry, &now)
        }))
    }
}
