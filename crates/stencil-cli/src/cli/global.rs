//! Flags accepted by every `stencil` subcommand, before or after it.

use clap::Args;
use std::path::PathBuf;

/// Verbosity, colour, config file, output format and log file.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Repeat for more detail; see [`crate::logging`] for the mapping.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings and errors
    -v      - Info level (progress messages)
    -vv     - Debug level (every prompt and rendered file)
    -vvv    - Trace level (answer lookups per layer)"
    )]
    pub verbose: u8,

    /// Only errors and requested JSON reach the terminal.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only"
    )]
    pub quiet: bool,

    /// Plain text on stdout and stderr. Any non-empty `NO_COLOR` other than
    /// `0`/`false` turns this on (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Replaces the user config file; `.stencil.toml` and `STENCIL_*`
    /// still apply on top.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read configuration from FILE"
    )]
    pub config: Option<PathBuf>,

    /// `json` prints reports (render, context, check, config list) as JSON.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "auto, human, plain or json"
    )]
    pub output_format: OutputFormat,

    /// JSON-lines copy of the log, filtered like stderr.
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Append logs to FILE"
    )]
    pub log_file: Option<PathBuf>,
}

/// Output style. `Auto` picks `Human` on a terminal and `Plain` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Auto,
    /// Colours, symbols and a spinner.
    Human,
    Plain,
    Json,
}

impl OutputFormat {
    /// Parse the `[output] format` config value. Unknown values fall back to
    /// `Auto`.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" => Self::Human,
            "plain" => Self::Plain,
            "json" => Self::Json,
            _ => Self::Auto,
        }
    }
}
