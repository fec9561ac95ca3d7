//! `graft templates` - list registered templates and refresh their cache.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use graft_core::{
    application::{TemplateInfo, TemplateService, UpdateReport},
    domain::TemplateKey,
};

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat, TemplatesCommands, UpdateArgs},
    commands::{self, TOKEN_ENV},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: TemplatesCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = commands::template_service(&config, commands::local_filesystem())?;

    match cmd {
        TemplatesCommands::List(args) => list(args, &service, &output),
        TemplatesCommands::Update(args) => update(args, &service, &output),
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// JSON row for `templates list --format json`.
#[derive(Debug, Serialize)]
struct TemplateRow {
    key: String,
    name: String,
    description: String,
    repository: String,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    cached: bool,
    cached_at: Option<DateTime<Utc>>,
}

impl From<&TemplateInfo> for TemplateRow {
    fn from(info: &TemplateInfo) -> Self {
        Self {
            key: info.key.to_string(),
            name: info.name.clone(),
            description: info.description.clone(),
            repository: info.repository.clone(),
            git_ref: info.git_ref.clone(),
            cached: info.fresh,
            cached_at: info.cached_at,
        }
    }
}

fn list(args: ListArgs, service: &TemplateService, output: &OutputManager) -> CliResult<()> {
    let templates = service.list();

    let format = args.format.unwrap_or(match output.format() {
        OutputFormat::Json => ListFormat::Json,
        _ => ListFormat::Table,
    });

    match format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for template in &templates {
                output.print("")?;
                output.print(&format!(
                    "  {} - {}  ({})",
                    template.key,
                    template.name,
                    cache_status(template)
                ))?;
                if !template.description.is_empty() {
                    output.print(&format!("    {}", template.description))?;
                }
            }
            output.print("")?;
        }
        ListFormat::List => {
            for template in &templates {
                output.data(template.key.as_str())?;
            }
        }
        ListFormat::Json => {
            output.data(&to_json(&templates)?)?;
        }
    }

    Ok(())
}

fn cache_status(template: &TemplateInfo) -> &'static str {
    match (template.fresh, template.cached_at) {
        (true, _) => "cached",
        (false, Some(_)) => "stale",
        (false, None) => "not cached",
    }
}

fn to_json(templates: &[TemplateInfo]) -> CliResult<String> {
    let rows: Vec<TemplateRow> = templates.iter().map(TemplateRow::from).collect();
    serde_json::to_string_pretty(&rows).map_err(|e| CliError::InvalidInput {
        message: format!("cannot encode template list: {e}"),
    })
}

// ── update ────────────────────────────────────────────────────────────────────

/// Re-fetch one or every template; per-template failures are warnings.
#[instrument(skip_all)]
fn update(args: UpdateArgs, service: &TemplateService, output: &OutputManager) -> CliResult<()> {
    let credential = commands::credential_from_env()
        .ok_or(CliError::MissingCredential { variable: TOKEN_ENV })?;

    output.info("Updating template cache...")?;

    let report = match args.template {
        Some(raw) => {
            let key = TemplateKey::new(raw)?;
            service.get(&key)?;
            let spinner = output.spinner(&format!("Updating {key}..."));
            let result = service.fetch(&key, Some(&credential));
            spinner.finish_and_clear();

            let mut report = UpdateReport::default();
            match result {
                Ok(_) => report.updated.push(key),
                Err(err) => report.failed.push((key, err)),
            }
            report
        }
        None => {
            let spinner = output.spinner("Updating all templates...");
            let report = service.update_all(Some(&credential));
            spinner.finish_and_clear();
            report
        }
    };

    for key in &report.updated {
        output.success(&format!("{key} template updated"))?;
    }
    for (key, err) in &report.failed {
        output.warning(&format!("Failed to update {key}: {err}"))?;
    }

    if report.is_clean() {
        output.success("Template cache update completed!")?;
    } else {
        output.warning(&format!(
            "Template cache update finished with {} failure(s)",
            report.failed.len()
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn info(fresh: bool, cached_at: Option<DateTime<Utc>>) -> TemplateInfo {
        TemplateInfo {
            key: TemplateKey::new("layered").unwrap(),
            name: "Layered Architecture Template".into(),
            description: "Layers".into(),
            repository: "https://github.com/PickHD/go-layered-template.git".into(),
            git_ref: Some("main".into()),
            cached_at,
            fresh,
        }
    }

    #[test]
    fn status_labels() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(cache_status(&info(true, Some(at))), "cached");
        assert_eq!(cache_status(&info(false, Some(at))), "stale");
        assert_eq!(cache_status(&info(false, None)), "not cached");
    }

    #[test]
    fn json_rows_use_ref_and_cached_fields() {
        let json = to_json(&[info(false, None)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let row = &value[0];

        assert_eq!(row["key"], "layered");
        assert_eq!(row["ref"], "main");
        assert_eq!(row["cached"], false);
        assert!(row["cached_at"].is_null());
    }
}
