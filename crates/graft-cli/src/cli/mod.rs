//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "graft",
    bin_name = "graft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Provision Go projects from template repositories",
    long_about = "graft copies a cached Go template repository into a new project \
                  and rewrites its module path and imports to your own.",
    after_help = "EXAMPLES:\n\
        \x20 graft new shop --template layered --module github.com/acme/shop\n\
        \x20 graft templates list\n\
        \x20 graft cache clear --template hexagonal\n\
        \x20 graft completions bash > /usr/share/bash-completion/completions/graft",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a template.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 graft new shop --template layered --module github.com/acme/shop\n\
            \x20 graft new api  -t hexagonal -m example.com/api --output ~/src --yes\n\
            \x20 graft new shop                  # prompts for the rest"
    )]
    New(NewArgs),

    /// Inspect and refresh the template registry.
    #[command(
        subcommand,
        about = "Manage templates",
        after_help = "EXAMPLES:\n\
            \x20 graft templates list\n\
            \x20 graft templates list --format json\n\
            \x20 GRAFT_GITHUB_TOKEN=... graft templates update"
    )]
    Templates(TemplatesCommands),

    /// Inspect and clear the template cache.
    #[command(
        subcommand,
        about = "Manage the template cache",
        after_help = "EXAMPLES:\n\
            \x20 graft cache info\n\
            \x20 graft cache clear\n\
            \x20 graft cache clear --template modular"
    )]
    Cache(CacheCommands),

    /// Initialise a graft configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 graft init           # platform config directory\n\
            \x20 graft init --local   # .graft.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 graft completions bash > ~/.local/share/bash-completion/completions/graft\n\
            \x20 graft completions zsh  > ~/.zfunc/_graft\n\
            \x20 graft completions fish > ~/.config/fish/completions/graft.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the graft configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 graft config get defaults.template\n\
            \x20 graft config list\n\
            \x20 graft config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `graft new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project directory name, created under the output directory.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Template key from the registry.
    #[arg(
        short = 't',
        long = "template",
        value_name = "KEY",
        help = "Template to use (layered, modular, hexagonal, ...)"
    )]
    pub template: Option<String>,

    /// Go module path for the new project.
    #[arg(
        short = 'm',
        long = "module",
        value_name = "MODULE",
        help = "Go module path (e.g. github.com/user/project)"
    )]
    pub module: Option<String>,

    /// Directory the project is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── templates ─────────────────────────────────────────────────────────────────

/// Subcommands for `graft templates`.
#[derive(Debug, Subcommand)]
pub enum TemplatesCommands {
    /// List registered templates and their cache status.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Re-fetch templates from their remotes.
    Update(UpdateArgs),
}

/// Arguments for `graft templates list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format; follows `--output-format` when omitted.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ListFormat>,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One key per line.
    List,
    /// JSON array.
    Json,
}

/// Arguments for `graft templates update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Update only this template.
    #[arg(short = 't', long = "template", value_name = "KEY")]
    pub template: Option<String>,
}

// ── cache ─────────────────────────────────────────────────────────────────────

/// Subcommands for `graft cache`.
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Show the cache location, entries and size.
    Info,

    /// Remove cached templates.
    Clear {
        /// Clear only this template.
        #[arg(short = 't', long = "template", value_name = "KEY")]
        template: Option<String>,
    },
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `graft init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.graft.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `graft completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `graft config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.template`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
