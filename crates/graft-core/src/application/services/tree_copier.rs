//! Materializes a cached template tree into a fresh destination.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DomainError, source_rules::is_vcs_dir},
    error::{GraftError, GraftResult},
};

/// Counts of what a copy produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub directories: usize,
}

/// Copies template trees, preserving relative structure and permissions.
pub struct TreeCopier {
    filesystem: Arc<dyn Filesystem>,
}

impl TreeCopier {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Copy everything under `source` into `destination`, skipping VCS metadata.
    ///
    /// `destination` must be absolute. It is expected not to exist; that is
    /// checked by the caller. The first failure stops the copy and leaves
    /// whatever was already written in place.
    #[instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
    pub fn copy_tree(&self, source: &Path, destination: &Path) -> GraftResult<CopySummary> {
        if !destination.is_absolute() {
            return Err(DomainError::RelativeDestination {
                path: destination.display().to_string(),
            }
            .into());
        }

        let entries = self.filesystem.walk(source, &is_vcs_dir)?;

        let partial = |err: GraftError| -> GraftError {
            ApplicationError::PartialCopy {
                destination: destination.to_path_buf(),
                reason: err.to_string(),
            }
            .into()
        };

        self.filesystem
            .create_dir_all(destination)
            .map_err(partial)?;

        let mut summary = CopySummary::default();
        for entry in entries {
            if is_vcs_dir(entry.file_name()) {
                debug!(path = %entry.path.display(), "Skipping VCS metadata");
                continue;
            }

            let target = destination.join(&entry.relative);
            if entry.is_dir {
                self.filesystem.create_dir_all(&target).map_err(partial)?;
                summary.directories += 1;
            } else {
                self.filesystem
                    .copy_file(&entry.path, &target)
                    .map_err(partial)?;
                summary.files += 1;
            }
        }

        info!(
            files = summary.files,
            directories = summary.directories,
            "Template tree copied"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFs;

    fn copier(fs: &FakeFs) -> TreeCopier {
        TreeCopier::new(Arc::new(fs.clone()))
    }

    #[test]
    fn copies_structure_and_contents() {
        let fs = FakeFs::new()
            .with_file("/cache/layered/go.mod", "module example.com/tpl\n")
            .with_file("/cache/layered/internal/app/app.go", "package app\n");

        let summary = copier(&fs)
            .copy_tree(Path::new("/cache/layered"), Path::new("/work/demo"))
            .unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.directories, 2);
        assert_eq!(
            fs.content("/work/demo/internal/app/app.go").as_deref(),
            Some("package app\n")
        );
    }

    #[test]
    fn skips_vcs_metadata() {
        let fs = FakeFs::new()
            .with_file("/cache/t/main.go", "package main\n")
            .with_file("/cache/t/.git/HEAD", "ref: refs/heads/main\n");

        copier(&fs)
            .copy_tree(Path::new("/cache/t"), Path::new("/work/demo"))
            .unwrap();

        assert!(fs.exists(Path::new("/work/demo/main.go")));
        assert!(!fs.exists(Path::new("/work/demo/.git")));
    }

    #[test]
    fn skips_gitlink_file() {
        let fs = FakeFs::new()
            .with_file("/cache/t/main.go", "package main\n")
            .with_file("/cache/t/lib/.git", "gitdir: ../.git/modules/lib\n");

        let summary = copier(&fs)
            .copy_tree(Path::new("/cache/t"), Path::new("/work/demo"))
            .unwrap();

        assert_eq!(summary.files, 1);
        assert!(fs.exists(Path::new("/work/demo/lib")));
        assert!(!fs.exists(Path::new("/work/demo/lib/.git")));
    }

    #[test]
    fn rejects_relative_destination() {
        let fs = FakeFs::new().with_file("/cache/t/main.go", "package main\n");

        let err = copier(&fs)
            .copy_tree(Path::new("/cache/t"), Path::new("demo"))
            .unwrap_err();

        assert!(matches!(
            err,
            GraftError::Domain(DomainError::RelativeDestination { .. })
        ));
        assert!(!fs.exists(Path::new("demo")));
    }

    #[test]
    fn missing_source_is_fatal() {
        let fs = FakeFs::new();
        let err = copier(&fs)
            .copy_tree(Path::new("/cache/none"), Path::new("/work/demo"))
            .unwrap_err();
        assert!(matches!(
            err,
            GraftError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
