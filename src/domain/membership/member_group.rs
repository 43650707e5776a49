//! Member group entity.
//!
//! The billing/enrollment unit tying members to a company and to a
//! subscription history. Members and subscriptions are referenced by id
//! and resolved through [`MembershipGraph`](super::MembershipGraph).

use serde::{Deserialize, Serialize};

use super::constraints::{require_email, require_text};
use crate::domain::foundation::{
    CompanyId, MemberGroupId, MemberId, SubscriptionId, Timestamp, ValidationError,
};

/// Member group entity.
///
/// # Invariants
///
/// - `subscription_ids` is ordered by `created_at` ascending (insertion order)
/// - `company_id`, `external_id` and `created_at` never change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGroup {
    pub(crate) id: MemberGroupId,
    pub(crate) company_id: CompanyId,
    pub(crate) external_id: String,
    pub(crate) email: String,
    pub(crate) active: bool,
    pub(crate) created_at: Timestamp,
    pub(crate) subscription_ids: Vec<SubscriptionId>,
    pub(crate) member_ids: Vec<MemberId>,
}

impl MemberGroup {
    /// Creates an inactive group without members or subscriptions.
    pub fn create(
        id: MemberGroupId,
        company_id: CompanyId,
        external_id: impl Into<String>,
        email: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let external_id = external_id.into();
        let email = email.into();
        require_text("external_id", &external_id)?;
        require_email("email", &email)?;

        Ok(Self {
            id,
            company_id,
            external_id,
            email,
            active: false,
            created_at,
            subscription_ids: Vec::new(),
            member_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> MemberGroupId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Subscription ids, oldest first.
    pub fn subscription_ids(&self) -> &[SubscriptionId] {
        &self.subscription_ids
    }

    pub fn member_ids(&self) -> &[MemberId] {
        &self.member_ids
    }

    /// The chronologically last subscription, regardless of its window.
    pub fn last_subscription_id(&self) -> Option<SubscriptionId> {
        self.subscription_ids.last().copied()
    }

    pub fn update_email(&mut self, email: impl Into<String>) -> Result<(), ValidationError> {
        let email = email.into();
        require_email("email", &email)?;
        self.email = email;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> MemberGroup {
        MemberGroup::create(
            MemberGroupId::new(1),
            CompanyId::new(1),
            "ext-001",
            "family@example.com",
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_group_is_inactive_and_empty() {
        let g = group();
        assert!(!g.is_active());
        assert!(g.member_ids().is_empty());
        assert!(g.last_subscription_id().is_none());
    }

    #[test]
    fn create_rejects_invalid_email() {
        let result = MemberGroup::create(
            MemberGroupId::new(1),
            CompanyId::new(1),
            "ext-001",
            "not-an-email",
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn create_rejects_blank_external_id() {
        let result = MemberGroup::create(
            MemberGroupId::new(1),
            CompanyId::new(1),
            "",
            "family@example.com",
            Timestamp::now(),
        );
        assert_eq!(result, Err(ValidationError::empty_field("external_id")));
    }

    #[test]
    fn update_email_replaces_valid_address() {
        let mut g = group();
        g.update_email("new@example.com").unwrap();
        assert_eq!(g.email(), "new@example.com");
    }

    #[test]
    fn update_email_keeps_old_address_on_error() {
        let mut g = group();
        assert!(g.update_email("broken").is_err());
        assert_eq!(g.email(), "family@example.com");
    }

    #[test]
    fn last_subscription_follows_insertion_order() {
        let mut g = group();
        g.subscription_ids.push(SubscriptionId::new(9));
        g.subscription_ids.push(SubscriptionId::new(4));
        assert_eq!(g.last_subscription_id(), Some(SubscriptionId::new(4)));
    }
}
