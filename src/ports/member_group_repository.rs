//! Member group repository port (write side).
//!
//! Loads and stores a member group together with everything that hangs
//! off it, as a [`MembershipGraph`] slice: the group, its company, its
//! members, its subscriptions with their plans, and the usage rows booked
//! against those subscriptions.
//!
//! # Design
//!
//! - **Aggregate boundary**: one group per graph; transitions run on the
//!   graph and `update` persists the mutable fields in one transaction
//! - **Mutable fields only**: `update` writes group email and active flag,
//!   member active flag and customer link, subscription end and notified
//!   timestamps; identity fields are never rewritten

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberGroupId, MemberId};
use crate::domain::membership::MembershipGraph;

/// Repository port for member group persistence.
#[async_trait]
pub trait MemberGroupRepository: Send + Sync {
    /// Loads the group and its dependents.
    ///
    /// Returns `None` if the group doesn't exist.
    async fn find_by_id(&self, id: MemberGroupId) -> Result<Option<MembershipGraph>, DomainError>;

    /// Loads the group a member belongs to.
    ///
    /// Returns `None` if the member doesn't exist.
    async fn find_by_member_id(
        &self,
        member_id: MemberId,
    ) -> Result<Option<MembershipGraph>, DomainError>;

    /// Persists the mutable fields of every entity of `group_id` in `graph`.
    ///
    /// # Errors
    ///
    /// - `MemberGroupNotFound` if the group doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, graph: &MembershipGraph, group_id: MemberGroupId)
        -> Result<(), DomainError>;

    /// Deletes a member row.
    ///
    /// Callers check the usage policy on the graph first; storage rejects
    /// the delete as well while usage rows reference the member.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member doesn't exist
    /// - `ValidationFailed` if usage rows still reference the member
    /// - `DatabaseError` on persistence failure
    async fn delete_member(&self, member_id: MemberId) -> Result<(), DomainError>;
}
