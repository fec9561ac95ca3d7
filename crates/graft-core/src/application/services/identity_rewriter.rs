//! Identity rewriting over a copied source tree.
//!
//! The manifest declaration is rewritten first, then every import path under
//! the old identity in every source file. Per-file failures during the import
//! pass are collected as warnings; only directory-level failures abort.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DomainError, Identity, SourceRules, imports, manifest},
    error::{GraftError, GraftResult},
};

/// A file the import pass could not process.
#[derive(Debug, Clone)]
pub struct FileWarning {
    pub path: PathBuf,
    pub error: GraftError,
}

/// Outcome of an import rewrite pass.
#[derive(Debug, Clone, Default)]
pub struct RewriteReport {
    /// Source files looked at.
    pub files_scanned: usize,
    /// Files written back with at least one replacement.
    pub files_rewritten: Vec<PathBuf>,
    pub replacements: usize,
    pub warnings: Vec<FileWarning>,
}

impl RewriteReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Rewrites manifest declarations and import paths.
pub struct IdentityRewriter {
    filesystem: Arc<dyn Filesystem>,
    rules: SourceRules,
}

impl IdentityRewriter {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self::with_rules(filesystem, SourceRules::default())
    }

    pub fn with_rules(filesystem: Arc<dyn Filesystem>, rules: SourceRules) -> Self {
        Self { filesystem, rules }
    }

    /// Manifest location for a project rooted at `root`.
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(self.rules.manifest_file)
    }

    /// Read the identity declared in `manifest`.
    #[instrument(skip_all, fields(path = %manifest.display()))]
    pub fn extract_declared_identity(&self, manifest: &Path) -> GraftResult<Identity> {
        let content = self.read_manifest(manifest)?;
        let identity = manifest::declared_identity(&content, self.rules.declaration_keyword)
            .map_err(|e| invalid_manifest(manifest, e))?;

        debug!(identity = %identity, "Declared identity found");
        Ok(identity)
    }

    /// Rewrite the declaration in `manifest` to `identity`.
    #[instrument(skip_all, fields(path = %manifest.display(), identity = %identity))]
    pub fn set_declared_identity(&self, manifest: &Path, identity: &Identity) -> GraftResult<()> {
        let content = self.read_manifest(manifest)?;
        let updated =
            manifest::with_declared_identity(&content, self.rules.declaration_keyword, identity)
                .map_err(|e| invalid_manifest(manifest, e))?;

        self.filesystem.write_file(manifest, &updated)?;
        info!("Manifest declaration updated");
        Ok(())
    }

    /// Move every import path under `old` to `new` across the tree at `root`.
    #[instrument(skip_all, fields(root = %root.display(), old = %old, new = %new))]
    pub fn rewrite_imports(
        &self,
        root: &Path,
        old: &Identity,
        new: &Identity,
    ) -> GraftResult<RewriteReport> {
        if old == new {
            return Err(DomainError::IdentityUnchanged {
                identity: old.to_string(),
            }
            .into());
        }

        let rules = self.rules;
        let entries = self
            .filesystem
            .walk(root, &|name: &str| rules.skips_dir(name))?;

        let mut report = RewriteReport::default();
        for entry in entries {
            if entry.is_dir || !rules.is_source_file(entry.file_name()) {
                continue;
            }
            report.files_scanned += 1;

            match self.rewrite_file(&entry.path, old, new) {
                Ok(0) => {}
                Ok(count) => {
                    debug!(path = %entry.path.display(), replacements = count, "Imports rewritten");
                    report.replacements += count;
                    report.files_rewritten.push(entry.path);
                }
                Err(error) => {
                    warn!(path = %entry.path.display(), error = %error, "Skipping file");
                    report.warnings.push(FileWarning {
                        path: entry.path,
                        error,
                    });
                }
            }
        }

        info!(
            scanned = report.files_scanned,
            rewritten = report.files_rewritten.len(),
            warnings = report.warnings.len(),
            "Import rewrite finished"
        );
        Ok(report)
    }

    /// Returns the number of replacements; the file is only written when non-zero.
    fn rewrite_file(&self, path: &Path, old: &Identity, new: &Identity) -> GraftResult<usize> {
        let content = self.filesystem.read_to_string(path)?;
        let outcome = imports::rewrite_imports(&content, old, new, self.rules.imports)?;

        if outcome.changed() {
            self.filesystem.write_file(path, &outcome.content)?;
        }
        Ok(outcome.replacements)
    }

    fn read_manifest(&self, manifest: &Path) -> GraftResult<String> {
        if !self.filesystem.exists(manifest) {
            return Err(ApplicationError::ManifestMissing {
                path: manifest.to_path_buf(),
            }
            .into());
        }
        self.filesystem.read_to_string(manifest)
    }
}

fn invalid_manifest(path: &Path, err: DomainError) -> GraftError {
    ApplicationError::InvalidManifest {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFs;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    fn rewriter(fs: &FakeFs) -> IdentityRewriter {
        IdentityRewriter::new(Arc::new(fs.clone()))
    }

    #[test]
    fn extract_after_set_returns_new_identity() {
        let fs = FakeFs::new().with_file(
            "/p/go.mod",
            "module github.com/old/module\n\ngo 1.21\n",
        );
        let rw = rewriter(&fs);
        let manifest = Path::new("/p/go.mod");

        assert_eq!(
            rw.extract_declared_identity(manifest).unwrap(),
            id("github.com/old/module")
        );
        rw.set_declared_identity(manifest, &id("github.com/new/module"))
            .unwrap();
        assert_eq!(
            rw.extract_declared_identity(manifest).unwrap(),
            id("github.com/new/module")
        );
        assert_eq!(
            fs.content("/p/go.mod").as_deref(),
            Some("module github.com/new/module\n\ngo 1.21\n")
        );
    }

    #[test]
    fn missing_manifest_names_the_path() {
        let fs = FakeFs::new();
        let err = rewriter(&fs)
            .extract_declared_identity(Path::new("/p/go.mod"))
            .unwrap_err();
        assert!(err.to_string().contains("/p/go.mod"));
    }

    #[test]
    fn manifest_without_declaration_is_invalid() {
        let fs = FakeFs::new().with_file("/p/go.mod", "go 1.21\n");
        let err = rewriter(&fs)
            .extract_declared_identity(Path::new("/p/go.mod"))
            .unwrap_err();
        assert!(matches!(
            err,
            GraftError::Application(ApplicationError::InvalidManifest { .. })
        ));
        assert!(err.to_string().contains("/p/go.mod"));
    }

    #[test]
    fn rewrites_only_source_files_outside_skipped_dirs() {
        let import = "package x\n\nimport \"a/b/pkg\"\n";
        let fs = FakeFs::new()
            .with_file("/p/main.go", import)
            .with_file("/p/README.md", import)
            .with_file("/p/vendor/a/b/pkg/pkg.go", import)
            .with_file("/p/.hidden/gen.go", import);

        let report = rewriter(&fs)
            .rewrite_imports(Path::new("/p"), &id("a/b"), &id("x/y"))
            .unwrap();

        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.files_rewritten, vec![PathBuf::from("/p/main.go")]);
        assert_eq!(
            fs.content("/p/main.go").as_deref(),
            Some("package x\n\nimport \"x/y/pkg\"\n")
        );
        assert_eq!(fs.content("/p/README.md").as_deref(), Some(import));
        assert_eq!(fs.content("/p/vendor/a/b/pkg/pkg.go").as_deref(), Some(import));
        assert_eq!(fs.content("/p/.hidden/gen.go").as_deref(), Some(import));
    }

    #[test]
    fn unsupported_literal_becomes_warning() {
        let bad = "package x\n\nimport (\n\t\"a/b/\\u0070kg\"\n)\n";
        let fs = FakeFs::new()
            .with_file("/p/bad.go", bad)
            .with_file("/p/good.go", "package x\n\nimport \"a/b\"\n");

        let report = rewriter(&fs)
            .rewrite_imports(Path::new("/p"), &id("a/b"), &id("x/y"))
            .unwrap();

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_rewritten.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, PathBuf::from("/p/bad.go"));
        assert!(matches!(
            report.warnings[0].error,
            GraftError::Domain(DomainError::UnsupportedImportLiteral { line: 4, .. })
        ));
        assert_eq!(fs.content("/p/bad.go").as_deref(), Some(bad));
    }

    #[test]
    fn unchanged_identity_is_rejected() {
        let fs = FakeFs::new().with_file("/p/main.go", "package main\n");
        let err = rewriter(&fs)
            .rewrite_imports(Path::new("/p"), &id("a/b"), &id("a/b"))
            .unwrap_err();
        assert!(matches!(
            err,
            GraftError::Domain(DomainError::IdentityUnchanged { .. })
        ));
    }

    #[test]
    fn missing_root_is_fatal() {
        let fs = FakeFs::new();
        assert!(
            rewriter(&fs)
                .rewrite_imports(Path::new("/nope"), &id("a/b"), &id("x/y"))
                .is_err()
        );
    }
}
