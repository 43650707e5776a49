//! GetMemberGroupHandler - Query handler for a group by company and external id.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::CompanyId;
use crate::domain::listing::MemberEntry;
use crate::domain::membership::{EntityKind, MembershipError};
use crate::ports::MemberReader;

#[derive(Debug, Clone)]
pub struct GetMemberGroupQuery {
    pub company_id: CompanyId,
    pub external_id: String,
}

/// Active members of the group, ordered by member id.
pub type GetMemberGroupResult = Vec<MemberEntry>;

/// Handler for resolving a company's group by its external id.
///
/// A group that is inactive, or has no active members, is reported as not
/// found.
pub struct GetMemberGroupHandler {
    reader: Arc<dyn MemberReader>,
}

impl GetMemberGroupHandler {
    pub fn new(reader: Arc<dyn MemberReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetMemberGroupQuery,
    ) -> Result<GetMemberGroupResult, MembershipError> {
        let members = self
            .reader
            .find_group_members(query.company_id, &query.external_id)
            .await?;

        if members.is_empty() {
            warn!(
                company_id = %query.company_id,
                external_id = %query.external_id,
                "Member group not found"
            );
            return Err(MembershipError::not_found(
                EntityKind::MemberGroup,
                query.external_id,
            ));
        }

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{family, MockMemberReader};
    use super::*;

    #[tokio::test]
    async fn returns_active_members_of_group() {
        let family = family();
        let handler =
            GetMemberGroupHandler::new(Arc::new(MockMemberReader::with_graph(&family.graph)));

        let members = handler
            .handle(GetMemberGroupQuery {
                company_id: family.company,
                external_id: "ext-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn inactive_group_is_not_found() {
        let mut family = family();
        family.graph.deactivate(family.group).unwrap();
        let handler =
            GetMemberGroupHandler::new(Arc::new(MockMemberReader::with_graph(&family.graph)));

        let err = handler
            .handle(GetMemberGroupQuery {
                company_id: family.company,
                external_id: "ext-1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, MembershipError::not_found(EntityKind::MemberGroup, "ext-1"));
    }

    #[tokio::test]
    async fn other_company_does_not_see_group() {
        let family = family();
        let handler =
            GetMemberGroupHandler::new(Arc::new(MockMemberReader::with_graph(&family.graph)));

        let result = handler
            .handle(GetMemberGroupQuery {
                company_id: CompanyId::new(999),
                external_id: "ext-1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(MembershipError::NotFound { .. })));
    }
}
