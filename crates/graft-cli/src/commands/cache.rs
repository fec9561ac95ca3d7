//! `graft cache` - inspect and clear the template cache.

use chrono::Utc;
use indicatif::{HumanBytes, HumanDuration};

use graft_adapters::JsonCacheStore;
use graft_core::domain::{CacheEntry, TemplateKey};

use crate::{
    cli::CacheCommands,
    commands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(cmd: CacheCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        CacheCommands::Info => info(&config, &output),
        CacheCommands::Clear { template } => clear(template, &config, &output),
    }
}

fn info(config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let store = JsonCacheStore::new(commands::cache_root(config)?);
    let entries = store.entries();

    output.header("Template Cache")?;
    output.print(&format!("  Location:  {}", store.root().display()))?;
    output.print(&format!("  Metadata:  {}", store.metadata_path().display()))?;
    output.print(&format!("  Size:      {}", HumanBytes(store.size_bytes()?)))?;
    output.print("")?;

    if entries.is_empty() {
        output.info("No templates cached")?;
        return Ok(());
    }

    for (key, entry) in &entries {
        output.print(&describe_entry(key, entry))?;
    }
    Ok(())
}

fn describe_entry(key: &str, entry: &CacheEntry) -> String {
    let now = Utc::now();
    let age = entry.age_at(now).to_std().unwrap_or_default();
    let status = if entry.is_fresh_at(now) { "fresh" } else { "stale" };
    let mut line = format!(
        "  {key:<10} {status:<6} fetched {} ago  {}",
        HumanDuration(age),
        entry.path.display()
    );
    if let Some(version) = &entry.version {
        line.push_str(&format!("  ({version})"));
    }
    line
}

fn clear(template: Option<String>, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let service = commands::template_service(config, commands::local_filesystem())?;

    match template {
        Some(raw) => {
            let key = TemplateKey::new(raw)?;
            service.clear(&key)?;
            output.success(&format!("Cleared cached template '{key}'"))?;
        }
        None => {
            service.clear_all()?;
            output.success("Template cache cleared")?;
        }
    }
    Ok(())
}
