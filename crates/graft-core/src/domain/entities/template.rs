//! Template descriptors and the registry that owns them.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{DomainError, TemplateKey};

/// Where a template lives and how to present it.
///
/// Immutable once built; the registry hands out shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub key: TemplateKey,
    pub name: String,
    pub description: String,
    /// Git remote URL.
    pub repository: String,
    /// Branch or tag fetched with `--branch`.
    pub git_ref: Option<String>,
}

impl TemplateDescriptor {
    pub fn new(key: TemplateKey, repository: impl Into<String>) -> Self {
        Self {
            name: key.to_string(),
            key,
            description: String::new(),
            repository: repository.into(),
            git_ref: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.repository.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "repository",
            });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        Ok(())
    }
}

impl fmt::Display for TemplateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}

/// Immutable lookup table of every known template.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<TemplateKey, TemplateDescriptor>,
}

impl TemplateRegistry {
    /// Build a registry, rejecting invalid or duplicate descriptors.
    pub fn new(
        descriptors: impl IntoIterator<Item = TemplateDescriptor>,
    ) -> Result<Self, DomainError> {
        let mut templates = BTreeMap::new();
        for descriptor in descriptors {
            descriptor.validate()?;
            let key = descriptor.key.clone();
            if templates.insert(key.clone(), descriptor).is_some() {
                return Err(DomainError::InvalidTemplateKey {
                    key: key.to_string(),
                    reason: "registered twice".into(),
                });
            }
        }
        Ok(Self { templates })
    }

    pub fn get(&self, key: &TemplateKey) -> Result<&TemplateDescriptor, DomainError> {
        self.templates
            .get(key)
            .ok_or_else(|| DomainError::UnknownTemplate {
                key: key.to_string(),
            })
    }

    /// Descriptors in key order.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.templates.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TemplateKey> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(key: &str) -> TemplateDescriptor {
        TemplateDescriptor::new(
            TemplateKey::new(key).unwrap(),
            format!("https://example.com/{key}.git"),
        )
        .with_ref("main")
    }

    #[test]
    fn registry_lookup() {
        let registry = TemplateRegistry::new([descriptor("layered"), descriptor("modular")]).unwrap();
        let key = TemplateKey::new("modular").unwrap();
        assert_eq!(registry.get(&key).unwrap().repository, "https://example.com/modular.git");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_key_is_not_found() {
        let registry = TemplateRegistry::new([descriptor("layered")]).unwrap();
        let key = TemplateKey::new("hexagonal").unwrap();
        assert!(matches!(
            registry.get(&key),
            Err(DomainError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let result = TemplateRegistry::new([descriptor("layered"), descriptor("layered")]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_repository_rejected() {
        let bad = TemplateDescriptor::new(TemplateKey::new("x").unwrap(), " ");
        assert!(matches!(
            TemplateRegistry::new([bad]),
            Err(DomainError::MissingRequiredField { field: "repository" })
        ));
    }

    #[test]
    fn iteration_is_key_ordered() {
        let registry =
            TemplateRegistry::new([descriptor("modular"), descriptor("hexagonal"), descriptor("layered")])
                .unwrap();
        let keys: Vec<_> = registry.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["hexagonal", "layered", "modular"]);
    }
}
