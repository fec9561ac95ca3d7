//! Git template fetching.
//!
//! Shells out to `git`. With a credential the clone URL carries it in the
//! authority; every piece of git output is scrubbed of it before it reaches
//! an error or a log line.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, instrument};

use graft_core::{
    application::{ApplicationError, ports::RepositoryFetcher},
    domain::{Credential, TemplateDescriptor, authenticated_url},
    error::{GraftError, GraftResult},
};

/// Fetches templates with the `git` command line.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: PathBuf,
}

impl GitFetcher {
    /// Create a fetcher that runs `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Create a fetcher that runs a specific git binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the git binary can be run at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .is_ok_and(|out| out.status.success())
    }

    fn git(&self, args: &[&str], cwd: Option<&Path>) -> GraftResult<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        cmd.output().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::ToolUnavailable { tool: "git" }.into(),
            _ => GraftError::Internal {
                message: format!("Failed to run git: {e}"),
            },
        })
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Git stderr with the credential scrubbed out.
fn scrubbed_stderr(output: &Output, credential: Option<&Credential>) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    match credential {
        Some(credential) => credential.redact(&stderr),
        None => stderr,
    }
}

impl RepositoryFetcher for GitFetcher {
    /// Fetch and hard-reset an existing checkout.
    ///
    /// Cached trees have their `.git` directory removed after every clone, so
    /// for them this always reports `RefreshUnavailable`.
    #[instrument(skip_all, fields(template = %descriptor.key, path = %dir.display()))]
    fn refresh(
        &self,
        descriptor: &TemplateDescriptor,
        dir: &Path,
        credential: Option<Credential>,
    ) -> GraftResult<()> {
        if !dir.join(".git").is_dir() {
            return Err(ApplicationError::RefreshUnavailable {
                path: dir.to_path_buf(),
                reason: "no git metadata".into(),
            }
            .into());
        }

        let refspec = descriptor.git_ref.as_deref().unwrap_or("HEAD");
        let url = authenticated_url(&descriptor.repository, credential.as_ref());

        let steps: [&[&str]; 2] = [
            &["fetch", "--depth", "1", url.as_str(), refspec],
            &["reset", "--hard", "FETCH_HEAD"],
        ];
        for args in steps {
            let output = self.git(args, Some(dir))?;
            if !output.status.success() {
                return Err(ApplicationError::RefreshUnavailable {
                    path: dir.to_path_buf(),
                    reason: scrubbed_stderr(&output, credential.as_ref()),
                }
                .into());
            }
        }

        debug!("Checkout refreshed");
        Ok(())
    }

    #[instrument(skip_all, fields(template = %descriptor.key, path = %dir.display()))]
    fn shallow_clone(
        &self,
        descriptor: &TemplateDescriptor,
        dir: &Path,
        credential: Option<Credential>,
    ) -> GraftResult<()> {
        if dir.exists() {
            return Err(ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: "clone target already exists".into(),
            }
            .into());
        }

        let url = authenticated_url(&descriptor.repository, credential.as_ref());
        let target = dir.to_string_lossy().into_owned();

        let mut args = vec!["clone", "--depth", "1"];
        if let Some(git_ref) = descriptor.git_ref.as_deref() {
            args.extend(["--branch", git_ref]);
        }
        args.extend([url.as_str(), target.as_str()]);

        debug!(
            repository = %descriptor.repository,
            authenticated = credential.is_some(),
            "Cloning"
        );
        let output = self.git(&args, None)?;

        if !output.status.success() {
            return Err(ApplicationError::FetchFailed {
                template: descriptor.key.to_string(),
                reason: scrubbed_stderr(&output, credential.as_ref()),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::domain::TemplateKey;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Serialize git-process tests to avoid flaky failures under parallel execution
    static GIT_LOCK: Mutex<()> = Mutex::new(());

    fn run(args: &[&str], cwd: &Path) {
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

    /// Bare repo on branch `main` with a go.mod and one source file.
    fn create_bare_repo(parent: &Path) -> PathBuf {
        let bare = parent.join("template.git");
        let work = parent.join("work");
        std::fs::create_dir_all(&work).unwrap();

        run(
            &["init", "--bare", "--initial-branch=main", bare.to_str().unwrap()],
            parent,
        );
        run(&["clone", bare.to_str().unwrap(), work.to_str().unwrap()], parent);
        run(&["config", "user.name", "Test"], &work);
        run(&["config", "user.email", "test@test.com"], &work);

        std::fs::write(work.join("go.mod"), "module github.com/old/module\n").unwrap();
        std::fs::create_dir_all(work.join("cmd")).unwrap();
        std::fs::write(work.join("cmd/main.go"), "package main\n").unwrap();

        run(&["add", "."], &work);
        run(&["commit", "-m", "Initial commit"], &work);
        run(&["push", "origin", "HEAD:main"], &work);

        bare
    }

    fn descriptor(repository: &Path) -> TemplateDescriptor {
        TemplateDescriptor::new(
            TemplateKey::new("layered").unwrap(),
            repository.to_string_lossy(),
        )
        .with_ref("main")
    }

    #[test]
    fn shallow_clone_checks_out_ref() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let bare = create_bare_repo(temp.path());
        let dir = temp.path().join("cache/layered");
        std::fs::create_dir_all(dir.parent().unwrap()).unwrap();

        GitFetcher::new()
            .shallow_clone(&descriptor(&bare), &dir, None)
            .unwrap();

        assert!(dir.join("go.mod").exists());
        assert!(dir.join("cmd/main.go").exists());
        assert!(dir.join(".git").is_dir());
    }

    #[test]
    fn missing_ref_is_fetch_failure() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let bare = create_bare_repo(temp.path());
        let dir = temp.path().join("clone");

        let err = GitFetcher::new()
            .shallow_clone(&descriptor(&bare).with_ref("no-such-branch"), &dir, None)
            .unwrap_err();

        assert!(matches!(
            err,
            GraftError::Application(ApplicationError::FetchFailed { .. })
        ));
    }

    #[test]
    fn refresh_without_git_metadata_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let descriptor = descriptor(Path::new("/nowhere.git"));

        let err = GitFetcher::new()
            .refresh(&descriptor, temp.path(), None)
            .unwrap_err();

        assert!(matches!(
            err,
            GraftError::Application(ApplicationError::RefreshUnavailable { .. })
        ));
    }

    #[test]
    fn refresh_updates_existing_checkout() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let bare = create_bare_repo(temp.path());
        let dir = temp.path().join("clone");
        let fetcher = GitFetcher::new();
        fetcher.shallow_clone(&descriptor(&bare), &dir, None).unwrap();

        let work = temp.path().join("work");
        std::fs::write(work.join("README.md"), "hello\n").unwrap();
        run(&["add", "."], &work);
        run(&["commit", "-m", "Add readme"], &work);
        run(&["push", "origin", "HEAD:main"], &work);

        fetcher.refresh(&descriptor(&bare), &dir, None).unwrap();
        assert!(dir.join("README.md").exists());
    }

    #[test]
    fn credential_never_appears_in_errors() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let descriptor = TemplateDescriptor::new(
            TemplateKey::new("layered").unwrap(),
            "https://127.0.0.1:9/graft/missing.git",
        );
        let credential = Credential::new("ghp_supersecret");

        let err = GitFetcher::new()
            .shallow_clone(&descriptor, &temp.path().join("clone"), credential)
            .unwrap_err();

        assert!(!err.to_string().contains("ghp_supersecret"));
    }

    #[test]
    fn missing_binary_is_tool_unavailable() {
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::with_program("/definitely/not/git");
        assert!(!fetcher.is_available());

        let err = fetcher
            .shallow_clone(
                &descriptor(Path::new("/nowhere.git")),
                &temp.path().join("clone"),
                None,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GraftError::Application(ApplicationError::ToolUnavailable { tool: "git" })
        ));
    }
}
