//! Company and plan reference entities.
//!
//! Both are owned elsewhere; the registry only needs their identity and
//! display title.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CompanyId, PlanId};

/// Company that enrolls member groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub title: String,
}

impl Company {
    pub fn new(id: CompanyId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Subscription plan a member group can be enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub title: String,
}

impl Plan {
    pub fn new(id: PlanId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}
