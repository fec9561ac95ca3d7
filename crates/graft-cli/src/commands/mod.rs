//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and render results; adapter
//! wiring lives in [`template_service`] so every command sees the same cache
//! and registry.

use std::path::PathBuf;
use std::sync::Arc;

use graft_adapters::{GitFetcher, JsonCacheStore, LocalFilesystem, builtin_templates};
use graft_core::{
    application::{ports::Filesystem, TemplateService},
    domain::Credential,
};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod cache;
pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod prompt;
pub mod templates;

/// Environment variable holding the token for private template remotes.
pub const TOKEN_ENV: &str = "GRAFT_GITHUB_TOKEN";

/// The credential from [`TOKEN_ENV`], if set and non-empty.
pub fn credential_from_env() -> Option<Credential> {
    std::env::var(TOKEN_ENV).ok().and_then(|token| Credential::new(token))
}

/// Cache root from config, else the platform cache directory.
pub fn cache_root(config: &AppConfig) -> CliResult<PathBuf> {
    config
        .cache
        .dir
        .clone()
        .or_else(JsonCacheStore::default_root)
        .ok_or_else(|| CliError::ConfigError {
            message: "no cache directory available; set cache.dir".into(),
            source: None,
        })
}

/// Template service over the real adapters.
pub fn template_service(
    config: &AppConfig,
    filesystem: Arc<dyn Filesystem>,
) -> CliResult<TemplateService> {
    let registry = builtin_templates::load_registry(config.templates.registry.as_deref())?;

    Ok(TemplateService::new(
        Arc::new(registry),
        Box::new(JsonCacheStore::new(cache_root(config)?)),
        Box::new(GitFetcher::new()),
        filesystem,
    ))
}

/// The local filesystem as a shared port.
pub fn local_filesystem() -> Arc<dyn Filesystem> {
    Arc::new(LocalFilesystem::new())
}
