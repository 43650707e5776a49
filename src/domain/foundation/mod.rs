//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types that form the
//! vocabulary of the member registry.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CompanyId, MemberGroupId, MemberId, PlanId, SubscriptionId, UsageId};
pub use timestamp::Timestamp;
