//! Strongly-typed identifier value objects.
//!
//! Every entity in the registry is keyed by a database-assigned integer.
//! Cross-entity references are stored as these ids and resolved through
//! the membership arena, never as owning pointers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database id.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw database id.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

integer_id!(
    /// Identifier of a company that enrolls member groups.
    CompanyId
);

integer_id!(
    /// Identifier of a subscription plan.
    PlanId
);

integer_id!(
    /// Identifier of a member group (billing/enrollment unit).
    MemberGroupId
);

integer_id!(
    /// Identifier of a single member.
    MemberId
);

integer_id!(
    /// Identifier of a member group subscription.
    SubscriptionId
);

integer_id!(
    /// Identifier of a subscription usage row.
    UsageId
);
