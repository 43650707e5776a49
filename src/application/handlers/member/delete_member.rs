//! DeleteMemberHandler - Command handler for removing a member from its group.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::MemberId;
use crate::domain::membership::{EntityKind, MembershipError};
use crate::ports::MemberGroupRepository;

#[derive(Debug, Clone, Copy)]
pub struct DeleteMemberCommand {
    pub member_id: MemberId,
}

/// Handler for deleting a member.
///
/// Members with recorded subscription usage cannot be deleted; the usage
/// rows are order history and are kept.
pub struct DeleteMemberHandler {
    repository: Arc<dyn MemberGroupRepository>,
}

impl DeleteMemberHandler {
    pub fn new(repository: Arc<dyn MemberGroupRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteMemberCommand) -> Result<(), MembershipError> {
        let mut graph = self
            .repository
            .find_by_member_id(cmd.member_id)
            .await?
            .ok_or_else(|| {
                warn!(member_id = %cmd.member_id, "Member not found");
                MembershipError::not_found(EntityKind::Member, cmd.member_id)
            })?;

        if let Err(e) = graph.remove_member(cmd.member_id) {
            warn!(member_id = %cmd.member_id, error = %e, "Rejected member delete");
            return Err(e);
        }

        self.repository
            .delete_member(cmd.member_id)
            .await
            .map_err(|e| {
                let err = MembershipError::from(e);
                match err {
                    MembershipError::Persistence(_) => {
                        error!(member_id = %cmd.member_id, error = %err, "Failed to delete member")
                    }
                    _ => warn!(member_id = %cmd.member_id, error = %err, "Rejected member delete"),
                }
                err
            })?;

        info!(member_id = %cmd.member_id, "Member deleted");
        Ok(())
    }
}
