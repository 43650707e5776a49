//! UpdateGroupEmailHandler - Command handler for changing a group's e-mail.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::MemberGroupId;
use crate::domain::membership::{EntityKind, MembershipError};
use crate::ports::MemberGroupRepository;

#[derive(Debug, Clone)]
pub struct UpdateGroupEmailCommand {
    pub group_id: MemberGroupId,
    pub email: String,
}

pub struct UpdateGroupEmailHandler {
    repository: Arc<dyn MemberGroupRepository>,
}

impl UpdateGroupEmailHandler {
    pub fn new(repository: Arc<dyn MemberGroupRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateGroupEmailCommand) -> Result<(), MembershipError> {
        let mut graph = self
            .repository
            .find_by_id(cmd.group_id)
            .await?
            .ok_or_else(|| {
                warn!(group_id = %cmd.group_id, "Member group not found");
                MembershipError::not_found(EntityKind::MemberGroup, cmd.group_id)
            })?;

        if let Err(e) = graph.update_group_email(cmd.group_id, cmd.email) {
            warn!(group_id = %cmd.group_id, error = %e, "Rejected member group e-mail");
            return Err(e);
        }

        self.repository
            .update(&graph, cmd.group_id)
            .await
            .map_err(|e| {
                error!(group_id = %cmd.group_id, error = %e, "Failed to save member group e-mail");
                MembershipError::from(e)
            })?;

        info!(group_id = %cmd.group_id, "Member group e-mail changed");
        Ok(())
    }
}
