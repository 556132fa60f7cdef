//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate projects from archetypes",
    long_about = "Stencil renders an archetype (a manifest of prompts plus a tree of \
                  templated files) into a new project, substituting {{ key }} \
                  placeholders in both paths and file contents.",
    after_help = "EXAMPLES:\n\
        \x20 stencil render ./python-rest-service ./out -A answers.yaml\n\
        \x20 stencil render ./python-rest-service ./out -a org-name='Acme Corp' -a prefix-name=user\n\
        \x20 stencil context ./python-rest-service -A answers.yaml --output-format json\n\
        \x20 stencil check ./python-rest-service",
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
    /// Render an archetype into a destination directory.
    #[command(
        visible_alias = "new",
        about = "Render an archetype into a new project",
        after_help = "EXAMPLES:\n\
            \x20 stencil render ./archetype ./out -A answers.yaml --non-interactive\n\
            \x20 stencil render ./archetype ./out -a prefix-name=user --dry-run"
    )]
    Render(RenderArgs),

    /// Resolve the context an archetype would render with.
    #[command(
        visible_alias = "ctx",
        about = "Resolve and print the rendering context",
        after_help = "EXAMPLES:\n\
            \x20 stencil context ./archetype -A answers.yaml\n\
            \x20 stencil context ./archetype -a org-name=Acme --output-format json"
    )]
    Context(ContextArgs),

    /// Lint an archetype without rendering it.
    #[command(
        about = "Check an archetype for template errors",
        after_help = "EXAMPLES:\n\
            \x20 stencil check ./archetype\n\
            \x20 stencil check ./archetype --output-format json"
    )]
    Check(CheckArgs),

    /// Initialise a Stencil configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil init           # user config directory\n\
            \x20 stencil init --local   # .stencil.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get output.format\n\
            \x20 stencil config list\n\
            \x20 stencil config path"
    )]
    Config(ConfigCommands),
}

// ── answers (shared) ──────────────────────────────────────────────────────────

/// Where answers come from. Shared by `render` and `context`.
#[derive(Debug, Clone, Default, Args)]
pub struct AnswerArgs {
    /// Inline answers; these beat every other source.
    #[arg(
        short = 'a',
        long = "answer",
        value_name = "KEY=VALUE",
        help = "Answer a prompt (repeatable)"
    )]
    pub answers: Vec<String>,

    /// YAML, JSON or TOML answer files.  Later files win.
    #[arg(
        short = 'A',
        long = "answer-file",
        value_name = "FILE",
        help = "Read answers from a .yaml/.yml/.json/.toml file (repeatable)"
    )]
    pub answer_files: Vec<PathBuf>,

    /// Never prompt; unanswered prompts without a default are an error.
    #[arg(
        long = "non-interactive",
        env = "STENCIL_NON_INTERACTIVE",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Fail instead of prompting for missing answers"
    )]
    pub non_interactive: bool,
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `stencil render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Archetype directory (or its `archetype.toml`).
    #[arg(value_name = "ARCHETYPE", help = "Archetype directory")]
    pub archetype: PathBuf,

    /// Destination directory.  Must be missing or empty.
    #[arg(value_name = "DEST", help = "Destination directory (missing or empty)")]
    pub destination: PathBuf,

    #[command(flatten)]
    pub answers: AnswerArgs,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── context ───────────────────────────────────────────────────────────────────

/// Arguments for `stencil context`.
#[derive(Debug, Args)]
pub struct ContextArgs {
    /// Archetype directory (or its `archetype.toml`).
    #[arg(value_name = "ARCHETYPE", help = "Archetype directory")]
    pub archetype: PathBuf,

    #[command(flatten)]
    pub answers: AnswerArgs,
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `stencil check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Archetype directory (or its `archetype.toml`).
    #[arg(value_name = "ARCHETYPE", help = "Archetype directory")]
    pub archetype: PathBuf,

    /// Treat warnings as errors.
    #[arg(long = "strict", help = "Fail on warnings too")]
    pub strict: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.stencil.toml` in the current directory.
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

/// Arguments for `stencil completions`.
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

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `output.format` or `answers.author`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
