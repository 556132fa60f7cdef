//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STENCIL_OUTPUT__FORMAT=json`,
//!    `STENCIL_ANSWERS__AUTHOR="Jane Doe"`
//! 3. `.stencil.toml` in the current directory
//! 4. `--config FILE`, or the user config file ([`AppConfig::config_path`])
//! 5. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Name of the per-project config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".stencil.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default answers, consulted after `-a` flags and answer files.
    pub answers: BTreeMap<String, String>,
    /// Output settings.
    pub output: OutputConfig,
    /// Rendering behaviour.
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prompt for missing answers when attached to a terminal.
    pub interactive: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { interactive: true }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default()).context("invalid built-in defaults")?);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(true)),
            None => builder.add_source(
                File::from(Self::config_path())
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        builder
            .add_source(
                File::from(Path::new(LOCAL_CONFIG_FILE))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("STENCIL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Look up a dotted key (`output.format`, `answers.author`).
    pub fn get(&self, key: &str) -> Option<String> {
        match key.split_once('.') {
            Some(("answers", name)) => self.answers.get(name).cloned(),
            Some(("output", "no_color")) => Some(self.output.no_color.to_string()),
            Some(("output", "format")) => Some(self.output.format.clone()),
            Some(("render", "interactive")) => Some(self.render.interactive.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert!(cfg.answers.is_empty());
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.output.format, "auto");
        assert!(cfg.render.interactive);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[answers]\nauthor = \"Jane Doe\"\n\n[render]\ninteractive = false\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.answers.get("author").map(String::as_str), Some("Jane Doe"));
        assert!(!cfg.render.interactive);
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/no/such/stencil.toml"))).is_err());
    }

    #[test]
    fn dotted_lookup() {
        let mut cfg = AppConfig::default();
        cfg.answers.insert("org-name".into(), "Acme".into());

        assert_eq!(cfg.get("answers.org-name").as_deref(), Some("Acme"));
        assert_eq!(cfg.get("output.format").as_deref(), Some("auto"));
        assert_eq!(cfg.get("render.interactive").as_deref(), Some("true"));
        assert_eq!(cfg.get("answers.missing"), None);
        assert_eq!(cfg.get("nope"), None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }

    #[test]
    fn round_trips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }
}
