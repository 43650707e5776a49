//! Relationship of a member to its group.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Role of a member within its member group.
///
/// The primary member is persisted and serialised as `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// The enrolled person the group is built around.
    #[serde(rename = "self")]
    Primary,

    /// Spouse of the primary member.
    Spouse,

    /// Child of the primary member.
    Child,
}

impl Relationship {
    /// All relationships, in the order they are offered to callers.
    pub const ALL: [Relationship; 3] = [
        Relationship::Spouse,
        Relationship::Child,
        Relationship::Primary,
    ];

    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Primary => "self",
            Relationship::Spouse => "spouse",
            Relationship::Child => "child",
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Relationship::Primary),
            "spouse" => Ok(Relationship::Spouse),
            "child" => Ok(Relationship::Child),
            other => Err(ValidationError::invalid_format(
                "relationship",
                format!("expected one of spouse, child, self; got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_serializes_as_self() {
        let json = serde_json::to_string(&Relationship::Primary).unwrap();
        assert_eq!(json, "\"self\"");
    }

    #[test]
    fn relationship_deserializes_from_lowercase() {
        let rel: Relationship = serde_json::from_str("\"spouse\"").unwrap();
        assert_eq!(rel, Relationship::Spouse);
    }

    #[test]
    fn parse_roundtrips_storage_value() {
        for rel in Relationship::ALL {
            assert_eq!(rel.as_str().parse::<Relationship>().unwrap(), rel);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("Child".parse::<Relationship>().is_err());
    }
}
