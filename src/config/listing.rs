//! Listing configuration - where the filter registry comes from.
//!
//! Without a registry file the built-in registry is used. A registry file
//! is YAML in the shape documented on [`FilterRegistry`]; unknown field
//! paths fail while parsing and kind/field mismatches fail validation, so
//! a bad file is caught at startup rather than on the first query.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use super::error::{ConfigError, ValidationError};
use crate::domain::listing::FilterRegistry;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingConfig {
    /// Optional YAML filter registry replacing the built-in one
    #[serde(default)]
    pub registry_path: Option<PathBuf>,
}

impl ListingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.registry_path {
            if !path.is_file() {
                return Err(ValidationError::RegistryFileNotFound(path.clone()));
            }
        }
        Ok(())
    }

    /// Loads the configured registry, or the built-in one.
    pub fn load_registry(&self) -> Result<FilterRegistry, ConfigError> {
        let Some(path) = &self.registry_path else {
            return Ok(FilterRegistry::default());
        };

        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::RegistryRead {
            path: path.clone(),
            source,
        })?;
        let registry = parse_registry(&document)?;
        info!(
            path = %path.display(),
            filters = ?registry.filter_keys().collect::<Vec<_>>(),
            sorts = ?registry.sort_keys().collect::<Vec<_>>(),
            "Loaded filter registry"
        );
        Ok(registry)
    }
}

/// Parses and validates a YAML registry document.
pub fn parse_registry(document: &str) -> Result<FilterRegistry, ConfigError> {
    let registry: FilterRegistry = serde_yaml::from_str(document)?;
    registry.validate()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{FieldPath, FilterKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REGISTRY: &str = r#"
filters:
  plan: { kind: equality, field: plan.id }
  name: { kind: text_match, field: member.full_name }
  born: { kind: range, field: member.birthday }
sorts:
  name: member.full_name
"#;

    #[test]
    fn no_path_uses_builtin_registry() {
        let registry = ListingConfig::default().load_registry().unwrap();
        assert_eq!(&registry, FilterRegistry::default_registry());
    }

    #[test]
    fn loads_registry_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(REGISTRY.as_bytes()).unwrap();

        let config = ListingConfig {
            registry_path: Some(file.path().to_path_buf()),
        };
        assert!(config.validate().is_ok());

        let registry = config.load_registry().unwrap();
        assert_eq!(registry.filter_kind_for("plan"), Some(FilterKind::Equality));
        assert_eq!(registry.query_field_for("born"), Some(FieldPath::MemberBirthday));
        assert_eq!(registry.sort_field_for("name"), Some(FieldPath::MemberFullName));
        assert!(!registry.is_sortable("plan"));
        assert!(registry.filter_kind_for("plan_id").is_none());
        assert_eq!(
            registry.filter_keys().collect::<Vec<_>>(),
            vec!["born", "name", "plan"]
        );
        assert_eq!(registry.sort_keys().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn missing_file_fails_validation() {
        let config = ListingConfig {
            registry_path: Some(PathBuf::from("/nonexistent/registry.yaml")),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RegistryFileNotFound(_))
        ));
        assert!(matches!(
            config.load_registry(),
            Err(ConfigError::RegistryRead { .. })
        ));
    }

    #[test]
    fn unknown_field_path_is_a_parse_error() {
        let result = parse_registry("filters:\n  x: { kind: equality, field: member.shoe_size }\n");
        assert!(matches!(result, Err(ConfigError::RegistryParse(_))));
    }

    #[test]
    fn text_match_on_integer_field_is_invalid() {
        let result = parse_registry("filters:\n  x: { kind: text_match, field: plan.id }\n");
        assert!(matches!(result, Err(ConfigError::RegistryInvalid(_))));
    }

    #[test]
    fn sorting_on_boolean_field_is_invalid() {
        let result = parse_registry("sorts:\n  active: member.active\n");
        assert!(matches!(result, Err(ConfigError::RegistryInvalid(_))));
    }
}
