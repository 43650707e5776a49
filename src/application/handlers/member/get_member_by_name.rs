//! GetMemberByNameHandler - Query handler for a member by first and last name.

use std::sync::Arc;

use tracing::warn;

use crate::domain::listing::MemberEntry;
use crate::domain::membership::{require_text, EntityKind, MembershipError};
use crate::ports::MemberReader;

#[derive(Debug, Clone)]
pub struct GetMemberByNameQuery {
    pub firstname: String,
    pub lastname: String,
}

impl GetMemberByNameQuery {
    /// Both names must be non-blank and at most 255 characters.
    pub fn validate(&self) -> Result<(), MembershipError> {
        require_text("firstname", &self.firstname)?;
        require_text("lastname", &self.lastname)?;
        Ok(())
    }
}

pub type GetMemberByNameResult = MemberEntry;

/// Handler for name lookups.
///
/// Names are matched exactly. When several members share a name the one
/// with the lowest id wins, active or not.
pub struct GetMemberByNameHandler {
    reader: Arc<dyn MemberReader>,
}

impl GetMemberByNameHandler {
    pub fn new(reader: Arc<dyn MemberReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetMemberByNameQuery,
    ) -> Result<GetMemberByNameResult, MembershipError> {
        query.validate()?;

        self.reader
            .find_by_name(&query.firstname, &query.lastname)
            .await?
            .ok_or_else(|| {
                let lookup_key = format!("{} {}", query.firstname, query.lastname);
                warn!(lookup_key = %lookup_key, "Member not found by name");
                MembershipError::not_found(EntityKind::Member, lookup_key)
            })
    }
}
