//! Membership-specific error types.
//!
//! Every failure surfaced by the registry falls into one of three classes.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | ValidationFailed | 400 |
//! | Persistence | 500 |

use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Kind of entity a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Company,
    Plan,
    MemberGroup,
    Member,
    Subscription,
    Usage,
}

impl EntityKind {
    /// Error code reported for a missing entity of this kind.
    pub fn not_found_code(&self) -> ErrorCode {
        match self {
            EntityKind::Company => ErrorCode::CompanyNotFound,
            EntityKind::Plan => ErrorCode::PlanNotFound,
            EntityKind::MemberGroup => ErrorCode::MemberGroupNotFound,
            EntityKind::Member => ErrorCode::MemberNotFound,
            EntityKind::Subscription | EntityKind::Usage => ErrorCode::SubscriptionNotFound,
        }
    }

    fn from_not_found_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::CompanyNotFound => EntityKind::Company,
            ErrorCode::PlanNotFound => EntityKind::Plan,
            ErrorCode::MemberGroupNotFound => EntityKind::MemberGroup,
            ErrorCode::SubscriptionNotFound => EntityKind::Subscription,
            _ => EntityKind::Member,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Company => "Company",
            EntityKind::Plan => "Plan",
            EntityKind::MemberGroup => "MemberGroup",
            EntityKind::Member => "Member",
            EntityKind::Subscription => "MemberGroupSubscription",
            EntityKind::Usage => "MemberGroupSubscriptionUsage",
        };
        write!(f, "{}", name)
    }
}

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    /// A required lookup by id or unique criteria found nothing.
    #[error("{entity_kind} was not found ({lookup_key})")]
    NotFound {
        entity_kind: EntityKind,
        lookup_key: String,
    },

    /// Input was rejected.
    #[error("Validation failed for '{field}': {constraint}")]
    ValidationFailed { field: String, constraint: String },

    /// Storage boundary failure; never classified further.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl MembershipError {
    pub fn not_found(entity_kind: EntityKind, lookup_key: impl ToString) -> Self {
        MembershipError::NotFound {
            entity_kind,
            lookup_key: lookup_key.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        MembershipError::Persistence(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound { entity_kind, .. } => entity_kind.not_found_code(),
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::Persistence(_) => ErrorCode::DatabaseError,
        }
    }

    /// HTTP status the transport layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            MembershipError::NotFound { .. } => 404,
            MembershipError::ValidationFailed { .. } => 400,
            MembershipError::Persistence(_) => 500,
        }
    }

    /// True when the caller caused the failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MembershipError::Persistence(_))
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        MembershipError::ValidationFailed {
            field: err.field().to_string(),
            constraint: err.constraint(),
        }
    }
}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        if err.code.is_not_found() {
            let lookup_key = err.detail("lookup_key").unwrap_or(&err.message).to_string();
            return MembershipError::NotFound {
                entity_kind: EntityKind::from_not_found_code(err.code),
                lookup_key,
            };
        }

        if err.code.is_validation() {
            let field = err.detail("field").unwrap_or("unknown").to_string();
            let constraint = err.detail("constraint").unwrap_or(&err.message).to_string();
            return MembershipError::ValidationFailed { field, constraint };
        }

        MembershipError::Persistence(err.to_string())
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        let code = err.code();
        match err {
            MembershipError::NotFound {
                entity_kind,
                lookup_key,
            } => DomainError::new(code, format!("{} was not found", entity_kind))
                .with_detail("entity_kind", entity_kind.to_string())
                .with_detail("lookup_key", lookup_key),
            MembershipError::ValidationFailed { field, constraint } => {
                DomainError::new(code, format!("Validation failed for '{}'", field))
                    .with_detail("field", field)
                    .with_detail("constraint", constraint)
            }
            MembershipError::Persistence(message) => DomainError::new(code, message),
        }
    }
}
