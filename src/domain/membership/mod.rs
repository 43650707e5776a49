//! Membership domain module.
//!
//! Companies enroll member groups; a group holds members (self, spouse,
//! children) and an ordered history of plan subscriptions against which
//! members book usage.
//!
//! # Module Structure
//!
//! - `graph` - Arena owning every entity, relations stored as ids
//! - `activation` - Activation cascade and active-subscription rule
//! - `member` - Member entity and age-based eligibility
//! - `member_group` - Member group entity
//! - `subscription` - Subscriptions and usage rows
//! - `relationship` - Self/Spouse/Child roles
//! - `company` - Company and plan reference entities

mod activation;
mod company;
mod constraints;
mod errors;
mod graph;
mod member;
mod member_group;
mod relationship;
mod subscription;

pub use activation::ActivationOutcome;
pub use company::{Company, Plan};
pub use constraints::{require_email, require_text, MAX_TEXT_LENGTH};
pub use errors::{EntityKind, MembershipError};
pub use graph::MembershipGraph;
pub use member::{
    Member, NewMember, MAX_CHILD_ALLOW_PURCHASE_AGE, MIN_CHILD_ALLOW_PURCHASE_AGE,
};
pub use member_group::MemberGroup;
pub use relationship::Relationship;
pub use subscription::{MemberGroupSubscription, OrderLine, SubscriptionUsage};
