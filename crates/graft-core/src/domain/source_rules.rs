//! Which files a rewrite touches and how it reads them.

use crate::domain::imports::{GO_IMPORTS, ImportSyntax};

/// Version-control metadata directory names.
pub const VCS_DIRS: &[&str] = &[".git"];

/// Language conventions for the identity rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRules {
    /// Manifest file name at the project root.
    pub manifest_file: &'static str,
    /// Keyword that starts the identity declaration line.
    pub declaration_keyword: &'static str,
    /// Extension (without dot) of files whose imports are rewritten.
    pub source_extension: &'static str,
    pub imports: ImportSyntax,
    /// Extra directory names never descended into.
    pub skipped_dirs: &'static [&'static str],
}

impl SourceRules {
    /// Go modules: `go.mod`, `module <path>`, `*.go`.
    pub const fn go() -> Self {
        Self {
            manifest_file: "go.mod",
            declaration_keyword: "module",
            source_extension: "go",
            imports: GO_IMPORTS,
            skipped_dirs: &["vendor"],
        }
    }

    pub fn is_source_file(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext == self.source_extension)
    }

    /// VCS metadata, hidden directories, and the configured extras.
    pub fn skips_dir(&self, dir_name: &str) -> bool {
        is_vcs_dir(dir_name) || dir_name.starts_with('.') || self.skipped_dirs.contains(&dir_name)
    }
}

impl Default for SourceRules {
    fn default() -> Self {
        Self::go()
    }
}

/// `true` for VCS metadata names, whether directory or gitlink file.
pub fn is_vcs_dir(name: &str) -> bool {
    VCS_DIRS.contains(&name)
}
