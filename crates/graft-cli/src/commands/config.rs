//! `graft config` - read configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&config.to_toml()?)?;
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let path = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };

    match key {
        "defaults.template" => Ok(config.defaults.template.clone()),
        "defaults.output_dir" => Ok(path(&config.defaults.output_dir)),
        "cache.dir" => Ok(path(&config.cache.dir)),
        "templates.registry" => Ok(path(&config.templates.registry)),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.template").unwrap(), "layered");
    }

    #[test]
    fn unset_paths_are_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "cache.dir").unwrap(), "");
    }

    #[test]
    fn set_paths_are_displayed() {
        let mut cfg = AppConfig::default();
        cfg.templates.registry = Some(PathBuf::from("/etc/graft/templates.toml"));
        assert_eq!(
            get_config_value(&cfg, "templates.registry").unwrap(),
            "/etc/graft/templates.toml"
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
