//! End-to-end provisioning with the real adapters and a local git remote.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use graft_adapters::{GitFetcher, JsonCacheStore, LocalFilesystem};
use graft_core::prelude::*;
use tempfile::TempDir;

// Serialize git-process tests to avoid flaky failures under parallel execution
static GIT_LOCK: Mutex<()> = Mutex::new(());

const OLD: &str = "github.com/old/module";

fn git(args: &[&str], cwd: &Path) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A bare remote holding a tiny Go module on branch `main`.
fn template_remote(parent: &Path) -> PathBuf {
    let bare = parent.join("remote.git");
    let work = parent.join("work");
    std::fs::create_dir_all(work.join("internal/app")).unwrap();

    git(
        &["init", "--bare", "--initial-branch=main", bare.to_str().unwrap()],
        parent,
    );
    git(&["init", "--initial-branch=main"], &work);
    git(&["config", "user.name", "Test"], &work);
    git(&["config", "user.email", "test@test.com"], &work);

    std::fs::write(work.join("go.mod"), format!("module {OLD}\n\ngo 1.22\n")).unwrap();
    std::fs::write(
        work.join("main.go"),
        format!("package main\n\nimport \"{OLD}/internal/app\"\n\nfunc main() {{ app.Run() }}\n"),
    )
    .unwrap();
    std::fs::write(
        work.join("internal/app/app.go"),
        "package app\n\nfunc Run() {}\n",
    )
    .unwrap();

    git(&["add", "."], &work);
    git(&["commit", "-m", "template"], &work);
    git(&["push", bare.to_str().unwrap(), "HEAD:main"], &work);

    bare
}

struct Fixture {
    _temp: TempDir,
    cache_root: PathBuf,
    projects: PathBuf,
    service: ScaffoldService,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let remote = template_remote(temp.path());
    let cache_root = temp.path().join("cache");
    let projects = temp.path().join("projects");
    std::fs::create_dir_all(&projects).unwrap();

    let registry = TemplateRegistry::new([TemplateDescriptor::new(
        TemplateKey::new("layered").unwrap(),
        remote.to_string_lossy(),
    )
    .with_ref("main")])
    .unwrap();

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let templates = TemplateService::new(
        Arc::new(registry),
        Box::new(JsonCacheStore::new(&cache_root)),
        Box::new(GitFetcher::new()),
        Arc::clone(&filesystem),
    );

    Fixture {
        _temp: temp,
        cache_root,
        projects,
        service: ScaffoldService::new(templates, filesystem),
    }
}

fn request(projects: &Path, name: &str) -> ProvisionRequest {
    ProvisionRequest::new(
        TemplateKey::new("layered").unwrap(),
        Identity::new("github.com/acme/shop").unwrap(),
        name,
        projects,
    )
    .unwrap()
}

fn contains_git_dir(root: &Path) -> bool {
    all_paths(root).iter().any(|p| p.ends_with(".git"))
}

fn all_paths(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path.clone());
            }
            out.push(path);
        }
    }
    out
}

#[test]
fn provisions_from_a_git_remote() {
    let _lock = GIT_LOCK.lock().unwrap();
    let fx = fixture();

    let report = fx
        .service
        .provision(&request(&fx.projects, "shop"), None)
        .unwrap();

    let project = fx.projects.join("shop");
    assert_eq!(report.project_path, project);
    assert_eq!(report.previous_identity.as_str(), OLD);

    let go_mod = std::fs::read_to_string(project.join("go.mod")).unwrap();
    assert!(go_mod.starts_with("module github.com/acme/shop\n"));
    let main_go = std::fs::read_to_string(project.join("main.go")).unwrap();
    assert!(main_go.contains("import \"github.com/acme/shop/internal/app\""));

    assert!(!contains_git_dir(&project));
    assert!(!contains_git_dir(&fx.cache_root.join("layered")));

    let cache = JsonCacheStore::new(&fx.cache_root);
    assert!(cache.is_fresh(&TemplateKey::new("layered").unwrap()));
}

#[test]
fn second_project_reuses_the_cache() {
    let _lock = GIT_LOCK.lock().unwrap();
    let fx = fixture();
    let key = TemplateKey::new("layered").unwrap();

    fx.service
        .provision(&request(&fx.projects, "one"), None)
        .unwrap();
    let first = JsonCacheStore::new(&fx.cache_root).entry(&key).unwrap();

    fx.service
        .provision(&request(&fx.projects, "two"), None)
        .unwrap();
    let second = JsonCacheStore::new(&fx.cache_root).entry(&key).unwrap();

    assert_eq!(first.cached_at, second.cached_at);
    assert!(fx.projects.join("two/go.mod").exists());
}

#[test]
fn stale_cache_is_deleted_and_refetched() {
    let _lock = GIT_LOCK.lock().unwrap();
    let fx = fixture();
    let key = TemplateKey::new("layered").unwrap();
    let cache = JsonCacheStore::new(&fx.cache_root);

    // A day-old tree with a leftover file and no VCS metadata.
    let dir = cache.storage_path(&key);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("leftover.txt"), "old").unwrap();
    cache
        .touch_at(&key, Utc::now() - Duration::hours(25))
        .unwrap();
    assert!(!cache.is_fresh(&key));

    fx.service
        .provision(&request(&fx.projects, "shop"), None)
        .unwrap();

    assert!(!dir.join("leftover.txt").exists());
    assert!(dir.join("go.mod").exists());
    assert!(cache.is_fresh(&key));
    assert!(!fx.projects.join("shop/leftover.txt").exists());
}

#[test]
fn existing_project_directory_is_refused() {
    let _lock = GIT_LOCK.lock().unwrap();
    let fx = fixture();
    std::fs::create_dir_all(fx.projects.join("shop")).unwrap();

    let err = fx
        .service
        .provision(&request(&fx.projects, "shop"), None)
        .unwrap_err();

    assert!(err.to_string().contains("already exists"));
    assert!(!fx.cache_root.join("layered").exists());
}

#[test]
fn fresh_entry_with_missing_tree_is_refetched() {
    let _lock = GIT_LOCK.lock().unwrap();
    let fx = fixture();
    let key = TemplateKey::new("layered").unwrap();
    let cache = JsonCacheStore::new(&fx.cache_root);

    // Metadata says fresh, but the tree itself is gone.
    cache.touch_at(&key, Utc::now()).unwrap();
    assert!(cache.is_fresh(&key));
    assert!(!cache.storage_path(&key).exists());

    fx.service
        .provision(&request(&fx.projects, "shop"), None)
        .unwrap();

    assert!(cache.storage_path(&key).join("go.mod").exists());
    assert!(fx.projects.join("shop/go.mod").exists());
}
