//! Archetype aggregate: metadata, prompts and the template tree.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Archetype (Aggregate Root)                               │
//! │ ├── ArchetypeMetadata   name, version, description       │
//! │ ├── Vec<PromptSpec>     what to ask, how to case it      │
//! │ └── TemplateTree        what to write                    │
//! │      └── Vec<TemplateNode>                               │
//! │           ├── FileSpec       path template + content     │
//! │           └── DirectorySpec  path template               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Paths in the tree are *templates*: `{{ prefix-name }}/README.md` only
//! becomes a real [`RelativePath`](super::common::RelativePath) once it has
//! been rendered against a [`Context`](super::context::Context).

use std::collections::HashSet;

use crate::domain::{
    entities::{common::Permissions, prompt::PromptSpec},
    error::DomainError,
};

// ============================================================================
// Core Archetype Aggregate
// ============================================================================

/// A reusable project blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `metadata.name` is non-empty
/// 2. prompt keys are unique
/// 3. `tree` is non-empty
/// 4. template paths in `tree` are unique
#[derive(Debug, Clone)]
pub struct Archetype {
    pub metadata: ArchetypeMetadata,
    pub prompts: Vec<PromptSpec>,
    pub tree: TemplateTree,
}

impl Archetype {
    /// Start the builder pattern for fluent construction.
    ///
    /// # Example
    /// ```rust
    /// use stencil_core::domain::{Archetype, ArchetypeMetadata, FileSpec, PromptSpec, TemplateNode};
    ///
    /// let archetype = Archetype::builder()
    ///     .metadata(ArchetypeMetadata::new("demo"))
    ///     .prompt(PromptSpec::new("Name", "name"))
    ///     .add_node(TemplateNode::File(FileSpec::text("{{ name }}.txt", "hi {{ name }}")))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(archetype.prompts.len(), 1);
    /// ```
    pub fn builder() -> ArchetypeBuilder {
        ArchetypeBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.metadata.name.trim().is_empty() {
            return Err(DomainError::InvalidArchetype(
                "archetype name cannot be empty".into(),
            ));
        }

        let mut keys = HashSet::new();
        for prompt in &self.prompts {
            if prompt.key().trim().is_empty() {
                return Err(DomainError::InvalidArchetype(format!(
                    "prompt '{}' has an empty key",
                    prompt.label()
                )));
            }
            if !keys.insert(prompt.key()) {
                return Err(DomainError::InvalidArchetype(format!(
                    "prompt key '{}' is declared more than once",
                    prompt.key()
                )));
            }
        }

        if self.tree.is_empty() {
            return Err(DomainError::InvalidArchetype(format!(
                "archetype '{}' has no contents",
                self.metadata.name
            )));
        }

        let mut seen = HashSet::new();
        for node in self.tree.iter() {
            if !seen.insert(node.path()) {
                return Err(DomainError::InvalidArchetype(format!(
                    "template path '{}' appears twice",
                    node.path()
                )));
            }
        }

        Ok(())
    }

    /// Every key the prompts can produce, in declaration order.
    pub fn declared_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for prompt in &self.prompts {
            for key in prompt.declared_keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

/// Builder for [`Archetype`]; validation runs in `build()`.
#[derive(Default)]
pub struct ArchetypeBuilder {
    metadata: Option<ArchetypeMetadata>,
    prompts: Vec<PromptSpec>,
    tree: TemplateTree,
}

impl ArchetypeBuilder {
    pub fn metadata(mut self, metadata: ArchetypeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Add a prompt (accumulates, order is resolution order).
    pub fn prompt(mut self, prompt: PromptSpec) -> Self {
        self.prompts.push(prompt);
        self
    }

    /// Set the entire tree at once (replaces any previous nodes).
    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    /// Add a single node to the tree (accumulates).
    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    pub fn build(self) -> Result<Archetype, DomainError> {
        let archetype = Archetype {
            metadata: self
                .metadata
                .ok_or_else(|| DomainError::InvalidArchetype("metadata is required".into()))?,
            prompts: self.prompts,
            tree: self.tree,
        };
        archetype.validate()?;
        Ok(archetype)
    }
}

// ============================================================================
// Archetype Metadata
// ============================================================================

/// Human-readable information from the `[archetype]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub authors: Vec<String>,
}

impl ArchetypeMetadata {
    /// `version` defaults to `0.1.0`, everything else to empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "0.1.0".to_string(),
            authors: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }
}

// ============================================================================
// Template Tree
// ============================================================================

/// Ordered nodes. Order is the traversal order used for error reporting, so
/// "first unresolved placeholder" is well defined.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn with_node(mut self, node: TemplateNode) -> Self {
        self.push(node);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateNode> {
        self.nodes.iter()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileSpec> {
        self.nodes.iter().filter_map(|n| match n {
            TemplateNode::File(f) => Some(f),
            TemplateNode::Directory(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl FromIterator<TemplateNode> for TemplateTree {
    fn from_iter<I: IntoIterator<Item = TemplateNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    /// The unrendered, slash-separated path template.
    pub fn path(&self) -> &str {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

/// A file to produce. `path` is a template rendered like any body.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    pub path: String,
    pub content: TemplateContent,
    pub permissions: Permissions,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, content: TemplateContent) -> Self {
        Self {
            path: path.into(),
            content,
            permissions: Permissions::default(),
        }
    }

    /// Shorthand for a text file whose body goes through substitution.
    pub fn text(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(path, TemplateContent::Text(body.into()))
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }
}

/// A directory to produce, even when nothing is written inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySpec {
    pub path: String,
}

impl DirectorySpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// File body as loaded from the archetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateContent {
    /// UTF-8 text; placeholders are substituted.
    Text(String),
    /// Copied byte for byte: binary files and anything matched by the
    /// manifest's `verbatim` globs.
    Verbatim(Vec<u8>),
}

impl TemplateContent {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            Self::Verbatim(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
