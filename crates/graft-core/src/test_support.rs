//! Shared fixtures for service unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::{ApplicationError, Filesystem, WalkEntry};
use crate::error::GraftResult;

/// `None` marks a directory.
type Tree = BTreeMap<PathBuf, Option<String>>;

/// Minimal in-memory filesystem; ancestors are created implicitly.
#[derive(Clone, Default)]
pub(crate) struct FakeFs {
    tree: Arc<Mutex<Tree>>,
}

impl FakeFs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(self, path: &str, content: &str) -> Self {
        self.write_file(Path::new(path), content).unwrap();
        self
    }

    pub(crate) fn content(&self, path: &str) -> Option<String> {
        self.tree.lock().unwrap().get(Path::new(path)).cloned().flatten()
    }

    fn insert_dirs(tree: &mut Tree, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            tree.entry(ancestor.to_path_buf()).or_insert(None);
        }
    }
}

fn not_found(path: &Path) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "not found".into(),
    }
}

impl Filesystem for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.tree.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> GraftResult<()> {
        Self::insert_dirs(&mut self.tree.lock().unwrap(), path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> GraftResult<String> {
        self.content(&path.to_string_lossy())
            .ok_or_else(|| not_found(path).into())
    }

    fn write_file(&self, path: &Path, content: &str) -> GraftResult<()> {
        let mut tree = self.tree.lock().unwrap();
        if let Some(parent) = path.parent() {
            Self::insert_dirs(&mut tree, parent);
        }
        tree.insert(path.to_path_buf(), Some(content.to_string()));
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn remove_dir_all(&self, path: &Path) -> GraftResult<()> {
        let mut tree = self.tree.lock().unwrap();
        if !tree.contains_key(path) {
            return Err(not_found(path).into());
        }
        tree.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> GraftResult<()> {
        let mut tree = self.tree.lock().unwrap();
        match tree.get(path) {
            Some(Some(_)) => {
                tree.remove(path);
                Ok(())
            }
            _ => Err(not_found(path).into()),
        }
    }

    fn walk(&self, root: &Path, prune: &dyn Fn(&str) -> bool) -> GraftResult<Vec<WalkEntry>> {
        let tree = self.tree.lock().unwrap();
        if !tree.contains_key(root) {
            return Err(not_found(root).into());
        }

        let entries = tree
            .iter()
            .filter(|(path, _)| path.starts_with(root) && path.as_path() != root)
            .filter(|(path, _)| {
                let relative = path.strip_prefix(root).unwrap();
                let mut components: Vec<_> = relative.components().collect();
                components.pop();
                !components
                    .iter()
                    .any(|c| prune(&c.as_os_str().to_string_lossy()))
            })
            .map(|(path, node)| WalkEntry {
                path: path.clone(),
                relative: path.strip_prefix(root).unwrap().to_path_buf(),
                is_dir: node.is_none(),
            })
            .collect();
        Ok(entries)
    }
}
