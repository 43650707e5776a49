//! DeactivateMemberGroupHandler - Command handler for deactivating a group.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::MemberGroupId;
use crate::domain::membership::{EntityKind, MembershipError};
use crate::ports::MemberGroupRepository;

#[derive(Debug, Clone, Copy)]
pub struct DeactivateMemberGroupCommand {
    pub group_id: MemberGroupId,
}

/// Handler for deactivating a member group and all of its members.
pub struct DeactivateMemberGroupHandler {
    repository: Arc<dyn MemberGroupRepository>,
}

impl DeactivateMemberGroupHandler {
    pub fn new(repository: Arc<dyn MemberGroupRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeactivateMemberGroupCommand) -> Result<(), MembershipError> {
        let mut graph = self
            .repository
            .find_by_id(cmd.group_id)
            .await?
            .ok_or_else(|| {
                warn!(group_id = %cmd.group_id, "Member group not found");
                MembershipError::not_found(EntityKind::MemberGroup, cmd.group_id)
            })?;

        graph.deactivate(cmd.group_id)?;

        self.repository
            .update(&graph, cmd.group_id)
            .await
            .map_err(|e| {
                error!(group_id = %cmd.group_id, error = %e, "Failed to save deactivated member group");
                MembershipError::from(e)
            })?;

        info!(group_id = %cmd.group_id, "Member group deactivated");
        Ok(())
    }
}
