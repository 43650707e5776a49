//! GetMemberHandler - Query handler for a single member by id.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::MemberId;
use crate::domain::listing::MemberEntry;
use crate::domain::membership::{EntityKind, MembershipError};
use crate::ports::MemberReader;

#[derive(Debug, Clone)]
pub struct GetMemberQuery {
    pub member_id: MemberId,
}

pub type GetMemberResult = MemberEntry;

/// Handler for loading a member by id, active or not.
pub struct GetMemberHandler {
    reader: Arc<dyn MemberReader>,
}

impl GetMemberHandler {
    pub fn new(reader: Arc<dyn MemberReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetMemberQuery) -> Result<GetMemberResult, MembershipError> {
        match self.reader.find_by_id(query.member_id).await? {
            Some(entry) => Ok(entry),
            None => {
                warn!(member_id = %query.member_id, "Member not found");
                Err(MembershipError::not_found(EntityKind::Member, query.member_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{family, MockMemberReader};
    use super::*;

    #[tokio::test]
    async fn returns_member_with_group() {
        let family = family();
        let handler = GetMemberHandler::new(Arc::new(MockMemberReader::with_graph(&family.graph)));

        let entry = handler
            .handle(GetMemberQuery {
                member_id: family.spouse,
            })
            .await
            .unwrap();

        assert_eq!(entry.member.firstname(), "Jane");
        assert_eq!(entry.group.external_id(), "ext-1");
        assert!(entry.last_subscription.is_some());
    }

    #[tokio::test]
    async fn missing_member_is_not_found_with_id() {
        let handler = GetMemberHandler::new(Arc::new(MockMemberReader::new()));
        let err = handler
            .handle(GetMemberQuery {
                member_id: MemberId::new(31),
            })
            .await
            .unwrap_err();

        assert_eq!(err, MembershipError::not_found(EntityKind::Member, 31));
        assert_eq!(err.http_status(), 404);
    }

    #[tokio::test]
    async fn reader_failure_is_a_persistence_error() {
        let handler = GetMemberHandler::new(Arc::new(MockMemberReader::failing()));
        let result = handler
            .handle(GetMemberQuery {
                member_id: MemberId::new(1),
            })
            .await;
        assert!(matches!(result, Err(MembershipError::Persistence(_))));
    }
}
