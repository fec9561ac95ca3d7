// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (collected into rewrite reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid module identity '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    #[error("Invalid template key '{key}': {reason}")]
    InvalidTemplateKey { key: String, reason: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Invariant Violations (caller bugs)
    // ========================================================================
    #[error("Destination path is not absolute: {path}")]
    RelativeDestination { path: String },

    #[error("Old and new module identity are the same: {identity}")]
    IdentityUnchanged { identity: String },

    // ========================================================================
    // Source Text Errors
    // ========================================================================
    #[error("No '{keyword}' declaration found in manifest")]
    MissingDeclaration { keyword: String },

    #[error("Unsupported import literal on line {line}: {reason}")]
    UnsupportedImportLiteral { line: usize, reason: String },

    // ========================================================================
    // Not Found
    // ========================================================================
    #[error("Unknown template: {key}")]
    UnknownTemplate { key: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidIdentity { .. } => vec![
                "Module paths look like: github.com/user/project".into(),
                "Use --module to provide one explicitly".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-service, my_api, project123".into(),
            ],
            Self::UnknownTemplate { key } => vec![
                format!("'{}' is not a known template", key),
                "Try: graft templates list".into(),
            ],
            Self::MissingDeclaration { keyword } => vec![
                format!("The template manifest has no '{} <path>' line", keyword),
                "The cached template may be corrupted: graft cache clear".into(),
            ],
            Self::UnsupportedImportLiteral { .. } => vec![
                "Import paths cannot contain escapes or raw strings".into(),
                "Fix the import by hand in the reported file".into(),
            ],
            Self::RelativeDestination { .. } | Self::IdentityUnchanged { .. } => vec![
                "This is a bug in graft, please report it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentity { .. }
            | Self::InvalidTemplateKey { .. }
            | Self::InvalidProjectName { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::UnknownTemplate { .. } => ErrorCategory::NotFound,
            Self::MissingDeclaration { .. } | Self::UnsupportedImportLiteral { .. } => {
                ErrorCategory::Validation
            }
            Self::RelativeDestination { .. } | Self::IdentityUnchanged { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
