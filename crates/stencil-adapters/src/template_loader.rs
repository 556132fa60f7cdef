//! Filesystem-based archetype loader.
//!
//! Reads an `archetype.toml` manifest and walks the template tree next to it,
//! converting both into a domain [`Archetype`].
//!
//! # Directory layout expected
//!
//! ```text
//! python-rest-service/
//! ├── archetype.toml                     ← manifest (required)
//! └── contents/                          ← template root
//!     └── {{ prefix-name }}-{{ suffix-name }}/
//!         ├── README.md
//!         └── scripts/
//!             └── dev-setup.py
//! ```
//!
//! # `archetype.toml` format
//!
//! ```toml
//! [archetype]
//! name        = "python-rest-service"
//! version     = "0.1.0"                 # optional
//! description = "Multi-package service" # optional
//! authors     = ["Platform Team"]       # optional
//! contents    = "contents"              # optional, default "contents"
//! verbatim    = ["**/*.png"]            # optional, copied without substitution
//!
//! [[prompts]]
//! label         = "Org Name:"
//! key           = "org-name"
//! placeholder   = "Acme"                # optional
//! help          = "Owning organisation" # optional
//! defaults_with = "acme"                # optional
//! cased_as      = [
//!     { identity = "programming" },     # or identity = ["kebab", "snake"]
//!     { key = "org-title", case = "title" },
//! ]
//! ```
//!
//! Files that are not valid UTF-8 are treated as verbatim automatically.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use stencil_core::{
    application::{ApplicationError, ports::ArchetypeStore},
    domain::{
        AnswerValue, Archetype, ArchetypeMetadata, Case, CaseSet, CasingRule, DirectorySpec,
        DomainError, FileSpec, PromptSpec, RelativePath, TemplateContent, TemplateNode,
        TemplateTree,
    },
    error::StencilResult,
};

/// File name of the manifest inside an archetype directory.
pub const MANIFEST_FILE: &str = "archetype.toml";

const DEFAULT_CONTENTS: &str = "contents";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of an `archetype.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct ArchetypeManifest {
    pub archetype: ArchetypeSection,
    #[serde(default)]
    pub prompts: Vec<PromptEntry>,
}

/// `[archetype]` section.
#[derive(Debug, Deserialize, Clone)]
pub struct ArchetypeSection {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Template root relative to the manifest, `contents` when omitted.
    pub contents: Option<String>,
    /// Globs (relative to the template root) copied byte for byte.
    #[serde(default)]
    pub verbatim: Vec<String>,
}

/// One entry under `[[prompts]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct PromptEntry {
    pub label: String,
    pub key: String,
    pub placeholder: Option<String>,
    pub help: Option<String>,
    pub defaults_with: Option<AnswerValue>,
    #[serde(default)]
    pub cased_as: Vec<CasingEntry>,
}

/// One casing rule. Case names stay strings here so an unknown name becomes
/// `UnknownCasingRule` rather than a generic parse error.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum CasingEntry {
    Identity { identity: IdentityCases },
    Fixed { key: String, case: String },
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum IdentityCases {
    Named(String),
    List(Vec<String>),
}

impl CasingEntry {
    fn to_rule(&self) -> Result<CasingRule, DomainError> {
        match self {
            Self::Identity {
                identity: IdentityCases::Named(name),
            } => CaseSet::named(name).map(CasingRule::CasedIdentity),
            Self::Identity {
                identity: IdentityCases::List(names),
            } => CaseSet::from_names(names).map(CasingRule::CasedIdentity),
            Self::Fixed { key, case } => Ok(CasingRule::FixedKey {
                key: key.clone(),
                case: case.parse::<Case>()?,
            }),
        }
    }
}

impl PromptEntry {
    fn to_spec(&self) -> Result<PromptSpec, DomainError> {
        let mut spec = PromptSpec::new(&self.label, &self.key);
        if let Some(hint) = &self.placeholder {
            spec = spec.placeholder(hint);
        }
        if let Some(help) = &self.help {
            spec = spec.help(help);
        }
        if let Some(default) = &self.defaults_with {
            spec = spec.defaults_with(default.clone());
        }
        for entry in &self.cased_as {
            spec = spec.cased_as(entry.to_rule()?);
        }
        Ok(spec)
    }
}

/// Parse manifest text without touching the filesystem.
pub fn parse_manifest(raw: &str) -> Result<ArchetypeManifest, DomainError> {
    toml::from_str(raw)
        .map_err(|e| DomainError::InvalidArchetype(format!("failed to parse {MANIFEST_FILE}: {e}")))
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads an [`Archetype`] from a directory containing `archetype.toml`.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use stencil_adapters::FilesystemArchetypeStore;
/// use stencil_core::application::ports::ArchetypeStore;
///
/// let archetype = FilesystemArchetypeStore::new().load(Path::new("./demos/python-rest-service"))?;
/// println!("{} prompts", archetype.prompts.len());
/// # Ok::<(), stencil_core::error::StencilError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemArchetypeStore;

impl FilesystemArchetypeStore {
    pub fn new() -> Self {
        Self
    }

    /// Walk `root` and build a [`TemplateTree`].
    ///
    /// Depth-first, entries sorted by file name, so a directory always comes
    /// before its children and the order is the same on every platform.
    fn build_tree(&self, root: &Path, verbatim: &GlobSet) -> StencilResult<TemplateTree> {
        let mut tree = TemplateTree::new();

        for walk_entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let walk_entry = walk_entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().unwrap_or(root).to_path_buf(),
                reason: format!("directory walk error: {e}"),
            })?;
            let abs_path = walk_entry.path();
            let rel_path = abs_path.strip_prefix(root).map_err(|_| {
                DomainError::InvalidArchetype(format!(
                    "failed to relativise '{}' against '{}'",
                    abs_path.display(),
                    root.display()
                ))
            })?;
            let path_str = slash_path(rel_path)?;

            if walk_entry.file_type().is_dir() {
                tree.push(TemplateNode::Directory(DirectorySpec::new(path_str)));
                continue;
            }

            // Symlinks and special files have no place in a template tree.
            if !walk_entry.file_type().is_file() {
                return Err(DomainError::InvalidArchetype(format!(
                    "'{path_str}' is not a regular file or directory"
                ))
                .into());
            }

            let bytes = fs::read(abs_path).map_err(|e| ApplicationError::io(abs_path, &e))?;
            let content = if verbatim.is_match(&path_str) {
                TemplateContent::Verbatim(bytes)
            } else {
                match String::from_utf8(bytes) {
                    Ok(text) => TemplateContent::Text(text),
                    Err(e) => TemplateContent::Verbatim(e.into_bytes()),
                }
            };

            let mut spec = FileSpec::new(path_str, content);
            if is_executable(abs_path) {
                spec = spec.executable();
            }
            tree.push(TemplateNode::File(spec));
        }

        Ok(tree)
    }
}

impl ArchetypeStore for FilesystemArchetypeStore {
    #[instrument(skip(self), fields(location = %location.display()))]
    fn load(&self, location: &Path) -> StencilResult<Archetype> {
        let dir = archetype_dir(location);
        if !dir.is_dir() {
            return Err(ApplicationError::ArchetypeNotFound { location: dir }.into());
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(DomainError::InvalidArchetype(format!(
                "missing {MANIFEST_FILE} in '{}'",
                dir.display()
            ))
            .into());
        }

        let raw = fs::read_to_string(&manifest_path)
            .map_err(|e| ApplicationError::io(&manifest_path, &e))?;
        let manifest = parse_manifest(&raw)?;

        let contents = manifest
            .archetype
            .contents
            .as_deref()
            .unwrap_or(DEFAULT_CONTENTS);
        let contents_rel = RelativePath::try_new(contents).map_err(|_| {
            DomainError::InvalidArchetype(format!(
                "contents '{contents}' must be a relative path inside the archetype"
            ))
        })?;
        let contents_dir = dir.join(contents_rel.as_path());
        if !contents_dir.is_dir() {
            return Err(DomainError::InvalidArchetype(format!(
                "contents directory '{}' not found",
                contents_dir.display()
            ))
            .into());
        }

        let verbatim = build_globset(&manifest.archetype.verbatim)?;
        let tree = self.build_tree(&contents_dir, &verbatim)?;

        let section = &manifest.archetype;
        let mut metadata = ArchetypeMetadata::new(&section.name)
            .description(section.description.clone().unwrap_or_default());
        if let Some(version) = &section.version {
            metadata = metadata.version(version);
        }
        for author in &section.authors {
            metadata = metadata.author(author);
        }

        let archetype = manifest
            .prompts
            .iter()
            .map(PromptEntry::to_spec)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .fold(Archetype::builder().metadata(metadata).tree(tree), |b, p| {
                b.prompt(p)
            })
            .build()?;

        debug!(
            name = archetype.name(),
            prompts = archetype.prompts.len(),
            nodes = archetype.tree.len(),
            "loaded archetype"
        );
        Ok(archetype)
    }
}

/// Accept either the archetype directory or its manifest file.
fn archetype_dir(location: &Path) -> PathBuf {
    if location.file_name() == Some(std::ffi::OsStr::new(MANIFEST_FILE)) {
        location
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        location.to_path_buf()
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, DomainError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            DomainError::InvalidArchetype(format!("invalid verbatim glob '{pattern}': {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| DomainError::InvalidArchetype(format!("invalid verbatim globs: {e}")))
}

/// Forward-slash form of a relative path, identical on every platform.
///
/// Template names must be UTF-8: they are rendered as text.
fn slash_path(path: &Path) -> Result<String, DomainError> {
    let segments = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_str().ok_or_else(|| {
                DomainError::InvalidArchetype(format!(
                    "template name '{}' is not valid UTF-8",
                    path.display()
                ))
            })),
            _ => None,
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join("/"))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

// ── Tests ─────────────────────────────────────────────────────────────────────
