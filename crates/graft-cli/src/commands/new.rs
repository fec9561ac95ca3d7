//! Implementation of the `graft new` command.
//!
//! Responsibility: resolve the template, module path and destination from
//! flags, config and prompts; call the core provisioning service; display
//! results. No business logic lives here.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use graft_core::{
    application::{ProvisionReport, ScaffoldService, TemplateService},
    domain::{Identity, ProvisionRequest, TemplateKey},
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    commands::{self, prompt},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `graft new` command.
///
/// Dispatch sequence:
/// 1. Resolve the output directory to an absolute path
/// 2. Resolve template and module path (flag, then prompt, then config)
/// 3. Build and validate the `ProvisionRequest`
/// 4. Refuse an existing destination before any fetch
/// 5. Show the summary; stop on `--dry-run`; confirm unless `--yes`,
///    which `--quiet` does not imply
/// 6. Provision behind a spinner and report
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Destination
    let output_root = resolve_output_dir(args.output.as_deref(), &config)?;

    let filesystem = commands::local_filesystem();
    let templates = commands::template_service(&config, filesystem.clone())?;

    // 2. Template and module
    let template = resolve_template(args.template.as_deref(), &templates, &config)?;
    if args.template.is_none() && !prompt::is_interactive() {
        output.info(&format!(
            "Using default template '{template}' (pass --template to choose another)"
        ))?;
    }
    let identity = resolve_identity(args.module.as_deref())?;

    // 3. Request
    let request = ProvisionRequest::new(template, identity, &args.name, &output_root)?;
    debug!(
        template = %request.template(),
        identity = %request.identity(),
        path = %request.project_path().display(),
        "Request resolved"
    );

    // 4. Destination guard
    let project_path = request.project_path();
    if project_path.exists() {
        return Err(CliError::ProjectExists { path: project_path });
    }

    // 5. Summary, dry run, confirmation
    show_configuration(&request, &templates, &output)?;

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            request.project_name(),
            project_path.display(),
        ))?;
        return Ok(());
    }

    if !args.yes && !prompt::confirm("Generate project?")? {
        return Err(CliError::Cancelled);
    }

    // 6. Provision
    let credential = commands::credential_from_env();
    let service = ScaffoldService::new(templates, filesystem);

    info!(path = %project_path.display(), "Provisioning started");
    let spinner = output.spinner(&format!("Provisioning from '{}'...", request.template()));
    let result = service.provision(&request, credential.as_ref());
    spinner.finish_and_clear();
    let report = result?;
    info!(path = %report.project_path.display(), "Provisioning completed");

    report_result(&report, &output)?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", report.project_path.display()))?;
        output.print("  go mod tidy")?;
        output.print("  go build ./...")?;
    }

    Ok(())
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// `--output`, else `defaults.output_dir`, else the CWD; always absolute.
fn resolve_output_dir(flag: Option<&Path>, config: &AppConfig) -> CliResult<PathBuf> {
    let dir = flag
        .map(Path::to_path_buf)
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    std::path::absolute(&dir).map_err(|e| CliError::IoError {
        message: format!("cannot resolve output directory '{}'", dir.display()),
        source: e,
    })
}

/// `--template`, else a picker when interactive, else `defaults.template`.
///
/// The non-interactive fallback is announced by the caller.
fn resolve_template(
    flag: Option<&str>,
    templates: &TemplateService,
    config: &AppConfig,
) -> CliResult<TemplateKey> {
    if let Some(key) = flag {
        return checked_key(key, templates);
    }

    if !prompt::is_interactive() {
        return checked_key(&config.defaults.template, templates);
    }

    let registry = templates.registry();
    let keys: Vec<&TemplateKey> = registry.keys().collect();
    let labels: Vec<String> = registry
        .iter()
        .map(|d| format!("{:<10} {}", d.key, d.description))
        .collect();
    let default = keys
        .iter()
        .position(|k| k.as_str() == config.defaults.template)
        .unwrap_or(0);

    let index = prompt::select("Architecture template", &labels, default)?;
    keys.get(index)
        .map(|k| (*k).clone())
        .ok_or_else(|| CliError::InvalidInput {
            message: "no template selected".into(),
        })
}

fn checked_key(raw: &str, templates: &TemplateService) -> CliResult<TemplateKey> {
    let key = TemplateKey::new(raw)?;
    templates.get(&key)?;
    Ok(key)
}

/// `--module`, else prompted for.
fn resolve_identity(flag: Option<&str>) -> CliResult<Identity> {
    let raw = match flag {
        Some(raw) => raw.to_owned(),
        None => prompt::input(
            "Go module path (e.g. github.com/user/project)",
            "--module",
            |value| Identity::new(value).map(|_| ()).map_err(|e| e.to_string()),
        )?,
    };
    Ok(Identity::new(raw)?)
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    request: &ProvisionRequest,
    templates: &TemplateService,
    out: &OutputManager,
) -> CliResult<()> {
    let template = templates.get(request.template())?;

    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", request.project_name()))?;
    out.print(&format!("  Module:    {}", request.identity()))?;
    out.print(&format!("  Template:  {template}"))?;
    out.print(&format!("  Source:    {}", template.repository))?;
    out.print(&format!("  Location:  {}", request.project_path().display()))?;
    out.print("")?;
    Ok(())
}

fn report_result(report: &ProvisionReport, out: &OutputManager) -> CliResult<()> {
    out.success(&format!(
        "Project created at {}",
        report.project_path.display()
    ))?;
    out.print(&format!(
        "  Copied {} files in {} directories",
        report.copy.files, report.copy.directories
    ))?;

    match &report.rewrite {
        Some(rewrite) => {
            out.print(&format!(
                "  Module {} -> {} ({} imports in {} files)",
                report.previous_identity,
                report.identity,
                rewrite.replacements,
                rewrite.files_rewritten.len(),
            ))?;
            for warning in &rewrite.warnings {
                out.warning(&format!(
                    "{}: {}",
                    warning.path.display(),
                    warning.error
                ))?;
            }
        }
        None => out.print(&format!(
            "  Module path already {}, imports left as-is",
            report.identity
        ))?,
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
