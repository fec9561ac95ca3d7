//! The validated request handed to the provisioning use case.

use std::path::{Path, PathBuf};

use crate::domain::{DomainError, Identity, TemplateKey};

/// What to provision and where.
///
/// Invariant: `destination_root` is absolute, so `project_path()` is too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    template: TemplateKey,
    identity: Identity,
    project_name: String,
    destination_root: PathBuf,
}

impl ProvisionRequest {
    pub fn new(
        template: TemplateKey,
        identity: Identity,
        project_name: impl Into<String>,
        destination_root: impl Into<PathBuf>,
    ) -> Result<Self, DomainError> {
        let project_name = project_name.into();
        let destination_root = destination_root.into();

        validate_project_name(&project_name)?;

        if !destination_root.is_absolute() {
            return Err(DomainError::RelativeDestination {
                path: destination_root.display().to_string(),
            });
        }

        Ok(Self {
            template,
            identity,
            project_name,
            destination_root,
        })
    }

    pub fn template(&self) -> &TemplateKey {
        &self.template
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// `<destination_root>/<project_name>`; always absolute.
    pub fn project_path(&self) -> PathBuf {
        self.destination_root.join(&self.project_name)
    }
}

/// A project name is a single, visible path segment.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProjectName {
        name: name.into(),
        reason: reason.into(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("name cannot contain whitespace"));
    }
    Ok(())
}
