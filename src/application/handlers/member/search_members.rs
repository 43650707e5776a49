//! SearchMembersHandler - Query handler for the registry-driven listing.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::Timestamp;
use crate::domain::listing::{MemberQuery, MemberSearchResult, QueryComposer};
use crate::domain::membership::MembershipError;
use crate::ports::MemberReader;

/// Query carrying the raw filter map and paging controls.
#[derive(Debug, Clone, Default)]
pub struct SearchMembersQuery {
    pub query: MemberQuery,
}

pub type SearchMembersResult = MemberSearchResult;

/// Handler for the advanced member listing.
///
/// Composes the raw request against the filter registry and hands the
/// result to the reader. Unknown filter keys and order keys are not
/// errors; a malformed value for a known key is.
pub struct SearchMembersHandler {
    reader: Arc<dyn MemberReader>,
    composer: QueryComposer,
}

impl SearchMembersHandler {
    pub fn new(reader: Arc<dyn MemberReader>, composer: QueryComposer) -> Self {
        Self { reader, composer }
    }

    pub async fn handle(
        &self,
        query: SearchMembersQuery,
    ) -> Result<SearchMembersResult, MembershipError> {
        let composed = self.composer.compose(&query.query)?;

        debug!(
            predicates = composed.predicates.len(),
            ignored = ?composed.ignored_filters,
            order_by = %composed.order.field,
            direction = composed.order.direction.as_sql(),
            limit = composed.limit,
            offset = composed.offset,
            "Composed member search"
        );

        let result = self.reader.search(&composed, &Timestamp::now()).await?;
        Ok(result)
    }
}
