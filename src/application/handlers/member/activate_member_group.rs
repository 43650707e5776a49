//! ActivateMemberGroupHandler - Command handler for the activation cascade.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::{MemberGroupId, Timestamp};
use crate::domain::membership::{ActivationOutcome, EntityKind, MembershipError};
use crate::ports::MemberGroupRepository;

#[derive(Debug, Clone, Copy)]
pub struct ActivateMemberGroupCommand {
    pub group_id: MemberGroupId,
}

pub type ActivateMemberGroupResult = ActivationOutcome;

/// Handler for activating a member group.
///
/// A group without a primary member is left as it is and nothing is
/// written. Otherwise the group and its members are activated and saved
/// together.
pub struct ActivateMemberGroupHandler {
    repository: Arc<dyn MemberGroupRepository>,
}

impl ActivateMemberGroupHandler {
    pub fn new(repository: Arc<dyn MemberGroupRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: ActivateMemberGroupCommand,
    ) -> Result<ActivateMemberGroupResult, MembershipError> {
        // 1. Load the group
        let mut graph = self
            .repository
            .find_by_id(cmd.group_id)
            .await?
            .ok_or_else(|| {
                warn!(group_id = %cmd.group_id, "Member group not found");
                MembershipError::not_found(EntityKind::MemberGroup, cmd.group_id)
            })?;

        // 2. Run the cascade
        let outcome = graph.activate(cmd.group_id, &Timestamp::now())?;
        let ActivationOutcome::Activated { activated, skipped } = outcome else {
            info!(group_id = %cmd.group_id, "Member group has no primary member; left unchanged");
            return Ok(outcome);
        };

        // 3. Persist
        self.repository
            .update(&graph, cmd.group_id)
            .await
            .map_err(|e| {
                error!(group_id = %cmd.group_id, error = %e, "Failed to save activated member group");
                MembershipError::from(e)
            })?;

        info!(group_id = %cmd.group_id, activated, skipped, "Member group activated");
        Ok(outcome)
    }
}
