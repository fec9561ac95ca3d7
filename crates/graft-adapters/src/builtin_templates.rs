//! Built-in template registry.
//!
//! Three Go project layouts ship with graft. A TOML file can add templates or
//! replace built-ins with the same key:
//!
//! ```toml
//! [[template]]
//! key = "clean"
//! name = "Clean Architecture Template"
//! description = "Entities, use cases, interface adapters"
//! repository = "https://github.com/acme/go-clean-template.git"
//! ref = "main"
//! ```
//!
//! The registry is built once at startup and never mutated afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use graft_core::{
    domain::{TemplateDescriptor, TemplateKey, TemplateRegistry},
    error::{GraftError, GraftResult},
};

/// Branch every built-in template is fetched from.
pub const DEFAULT_REF: &str = "main";

/// Key of the template used when none is chosen.
pub const DEFAULT_TEMPLATE: &str = "layered";

const BUILTINS: &[(&str, &str, &str, &str)] = &[
    (
        "layered",
        "Layered Architecture Template",
        "Traditional layered architecture with clear separation between presentation, business logic, and data layers",
        "https://github.com/PickHD/go-layered-template.git",
    ),
    (
        "modular",
        "Modular Architecture Template",
        "Modular monolithic architecture with domain-driven design principles",
        "https://github.com/PickHD/go-modular-template.git",
    ),
    (
        "hexagonal",
        "Hexagonal Architecture Template",
        "Hexagonal architecture (ports and adapters) with isolation of core logic from external concerns",
        "https://github.com/PickHD/go-hexagonal-template.git",
    ),
];

/// Descriptors of the templates that ship with graft.
pub fn builtin_descriptors() -> GraftResult<Vec<TemplateDescriptor>> {
    BUILTINS
        .iter()
        .map(|(key, name, description, repository)| -> GraftResult<TemplateDescriptor> {
            Ok(TemplateDescriptor::new(TemplateKey::new(*key)?, *repository)
                .with_name(*name)
                .with_description(*description)
                .with_ref(DEFAULT_REF))
        })
        .collect()
}

/// Registry of the built-in templates.
pub fn builtin_registry() -> GraftResult<TemplateRegistry> {
    Ok(TemplateRegistry::new(builtin_descriptors()?)?)
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "template")]
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    key: String,
    repository: String,
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

impl TemplateEntry {
    fn into_descriptor(self) -> GraftResult<TemplateDescriptor> {
        let key = TemplateKey::new(self.key)?;
        let mut descriptor = TemplateDescriptor::new(key, self.repository)
            .with_description(self.description);
        if let Some(name) = self.name {
            descriptor = descriptor.with_name(name);
        }
        if let Some(git_ref) = self.git_ref {
            descriptor = descriptor.with_ref(git_ref);
        }
        Ok(descriptor)
    }
}

/// Parse registry TOML into descriptors.
pub fn descriptors_from_toml(content: &str) -> GraftResult<Vec<TemplateDescriptor>> {
    let file: RegistryFile = toml::from_str(content).map_err(|e| GraftError::Configuration {
        message: format!("invalid template registry: {e}"),
    })?;

    file.templates
        .into_iter()
        .map(TemplateEntry::into_descriptor)
        .collect()
}

/// Built-ins, overlaid with the templates from `extra` when given.
#[instrument]
pub fn load_registry(extra: Option<&Path>) -> GraftResult<TemplateRegistry> {
    let mut by_key: BTreeMap<TemplateKey, TemplateDescriptor> = builtin_descriptors()?
        .into_iter()
        .map(|d| (d.key.clone(), d))
        .collect();

    if let Some(path) = extra {
        let content = std::fs::read_to_string(path).map_err(|e| GraftError::Configuration {
            message: format!("cannot read template registry {}: {e}", path.display()),
        })?;

        let descriptors = descriptors_from_toml(&content)?;
        info!(path = %path.display(), count = descriptors.len(), "Loaded template registry file");
        for descriptor in descriptors {
            debug!(template = %descriptor.key, "Registering template");
            by_key.insert(descriptor.key.clone(), descriptor);
        }
    }

    Ok(TemplateRegistry::new(by_key.into_values())?)
}
