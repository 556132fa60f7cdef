//! Generate Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Load the archetype
//! 2. Resolve answers into a context
//! 3. Render the template tree in memory
//! 4. Check the destination and write, rolling back on failure
//!
//! It also exposes the read-only variants used by `--dry-run`, `context`
//! and `check`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        services::ContextService,
        ports::{AnswerSource, ArchetypeStore, Filesystem, TemplateRenderer},
    },
    domain::{
        Archetype, Context, DomainError, DomainValidator as validator, FsEntry, ProjectStructure,
        TemplateContent, TemplateNode, placeholder,
    },
    error::{StencilError, StencilResult},
};

/// Summary of one generation (or dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub archetype: String,
    pub destination: PathBuf,
    pub files: usize,
    pub directories: usize,
    pub bytes: usize,
    pub context_entries: usize,
    /// Rendered relative paths in write order.
    pub entries: Vec<String>,
    pub dry_run: bool,
}

impl GenerationReport {
    fn from_structure(archetype: &Archetype, ctx: &Context, structure: &ProjectStructure, dry_run: bool) -> Self {
        Self {
            archetype: archetype.name().to_string(),
            destination: structure.root().to_path_buf(),
            files: structure.files().count(),
            directories: structure.directories().count(),
            bytes: structure.total_bytes(),
            context_entries: ctx.len(),
            entries: structure
                .entries()
                .iter()
                .map(|e| e.path().to_string())
                .collect(),
            dry_run,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`GenerateService::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIssue {
    pub severity: Severity,
    /// Template path the finding is about; empty for manifest-level findings.
    pub path: String,
    pub message: String,
}

/// Result of linting an archetype without answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub archetype: String,
    pub prompts: usize,
    pub nodes: usize,
    pub issues: Vec<CheckIssue>,
}

impl CheckReport {
    pub fn errors(&self) -> impl Iterator<Item = &CheckIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CheckIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Main generation service.
pub struct GenerateService {
    store: Box<dyn ArchetypeStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    contexts: ContextService,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use stencil_core::application::GenerateService;
    ///
    /// let service = GenerateService::new(
    ///     store,      // impl ArchetypeStore
    ///     renderer,   // impl TemplateRenderer
    ///     filesystem, // impl Filesystem
    /// );
    /// ```
    pub fn new(
        store: Box<dyn ArchetypeStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
            contexts: ContextService::new(),
        }
    }

    /// Generate a project at `destination`.
    #[instrument(
        skip_all,
        fields(
            archetype = %location.display(),
            destination = %destination.display()
        )
    )]
    pub fn generate(
        &self,
        location: &Path,
        answers: &dyn AnswerSource,
        destination: &Path,
    ) -> StencilResult<GenerationReport> {
        let archetype = self.load(location)?;
        let ctx = self.resolve(&archetype, answers)?;
        self.generate_with_context(&archetype, &ctx, destination)
    }

    /// Render and write an already resolved context.
    ///
    /// Consults no answer source, so callers that prompt can finish all
    /// prompting before this starts.
    #[instrument(skip_all, fields(archetype = archetype.name(), destination = %destination.display()))]
    pub fn generate_with_context(
        &self,
        archetype: &Archetype,
        ctx: &Context,
        destination: &Path,
    ) -> StencilResult<GenerationReport> {
        let structure = self.render(archetype, ctx, destination)?;

        let created_from = self.check_destination(destination)?;
        self.write_structure(&structure, created_from.as_deref())?;

        let report = GenerationReport::from_structure(archetype, ctx, &structure, false);
        info!(
            files = report.files,
            directories = report.directories,
            bytes = report.bytes,
            "Generation completed successfully"
        );
        Ok(report)
    }

    /// Everything `generate` does except writing.
    #[instrument(skip_all, fields(archetype = %location.display()))]
    pub fn plan(
        &self,
        location: &Path,
        answers: &dyn AnswerSource,
        destination: &Path,
    ) -> StencilResult<GenerationReport> {
        let archetype = self.load(location)?;
        let ctx = self.resolve(&archetype, answers)?;
        let structure = self.render(&archetype, &ctx, destination)?;
        self.check_destination(destination)?;
        Ok(GenerationReport::from_structure(&archetype, &ctx, &structure, true))
    }

    pub fn load(&self, location: &Path) -> StencilResult<Archetype> {
        let archetype = self.store.load(location)?;
        info!(archetype = archetype.name(), "Archetype loaded");
        Ok(archetype)
    }

    /// Ask every prompt of `archetype` through `answers`.
    pub fn resolve(&self, archetype: &Archetype, answers: &dyn AnswerSource) -> StencilResult<Context> {
        self.contexts.resolve(&archetype.prompts, answers)
    }

    /// Load and resolve only.
    #[instrument(skip_all, fields(archetype = %location.display()))]
    pub fn context(&self, location: &Path, answers: &dyn AnswerSource) -> StencilResult<Context> {
        let archetype = self.store.load(location)?;
        self.resolve(&archetype, answers)
    }

    /// Static lint of an archetype.
    ///
    /// Reports malformed tokens and keys the tree references that no prompt
    /// declares (errors), and prompts whose keys are never referenced
    /// (warnings). Needs no answers.
    #[instrument(skip_all, fields(archetype = %location.display()))]
    pub fn check(&self, location: &Path) -> StencilResult<CheckReport> {
        let archetype = self.store.load(location)?;
        let declared: BTreeSet<String> = archetype.declared_keys().into_iter().collect();
        let mut referenced = BTreeSet::new();
        let mut issues = Vec::new();

        for node in archetype.tree.iter() {
            let mut sources = vec![node.path()];
            if let TemplateNode::File(file) = node {
                if let TemplateContent::Text(body) = &file.content {
                    sources.push(body.as_str());
                }
            }

            for source in sources {
                match placeholder::parse(source) {
                    Ok(parsed) => {
                        for p in parsed.placeholders() {
                            referenced.insert(p.key.clone());
                            if !declared.contains(&p.key) {
                                issues.push(CheckIssue {
                                    severity: Severity::Error,
                                    path: node.path().to_string(),
                                    message: format!("'{}' is not produced by any prompt", p.key),
                                });
                            }
                        }
                    }
                    Err(e) => issues.push(CheckIssue {
                        severity: Severity::Error,
                        path: node.path().to_string(),
                        message: e.to_string(),
                    }),
                }
            }
        }

        for prompt in &archetype.prompts {
            if !prompt.declared_keys().iter().any(|k| referenced.contains(k)) {
                issues.push(CheckIssue {
                    severity: Severity::Warning,
                    path: String::new(),
                    message: format!("prompt '{}' is never referenced", prompt.key()),
                });
            }
        }

        debug!(issues = issues.len(), "Archetype checked");
        Ok(CheckReport {
            archetype: archetype.name().to_string(),
            prompts: archetype.prompts.len(),
            nodes: archetype.tree.len(),
            issues,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn render(
        &self,
        archetype: &Archetype,
        ctx: &Context,
        destination: &Path,
    ) -> StencilResult<ProjectStructure> {
        let structure = self.renderer.render(archetype, ctx, destination)?;
        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }

    /// Refuse a non-empty destination.
    ///
    /// Returns the outermost directory the write will create: the
    /// destination itself or its first missing ancestor. `None` means the
    /// destination already exists and is empty, so rollback restores it.
    fn check_destination(&self, destination: &Path) -> StencilResult<Option<PathBuf>> {
        if !self.filesystem.exists(destination) {
            let created_from = destination
                .ancestors()
                .take_while(|p| p.parent().is_some() && !self.filesystem.exists(p))
                .last()
                .unwrap_or(destination);
            debug!(created_from = %created_from.display(), "Destination will be created");
            return Ok(Some(created_from.to_path_buf()));
        }
        if self.filesystem.is_empty_dir(destination)? {
            debug!("Destination exists and is empty");
            return Ok(None);
        }
        Err(DomainError::DestinationConflict {
            path: destination.display().to_string(),
        }
        .into())
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(&self, structure: &ProjectStructure, created_from: Option<&Path>) -> StencilResult<()> {
        match self.write_all(structure) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(structure.root(), created_from, &e)?;
                Err(e)
            }
        }
    }

    /// Directories first, then files.
    fn write_all(&self, structure: &ProjectStructure) -> StencilResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for entry in structure.entries() {
            if let FsEntry::Directory(dir) = entry {
                self.filesystem.create_dir_all(&root.join(dir.path.as_path()))?;
            }
        }

        for file in structure.files() {
            let path = root.join(file.path.as_path());
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, &file.content)?;
            if file.permissions.is_executable() {
                self.filesystem.set_permissions(&path, true)?;
            }
            debug!(path = %file.path, bytes = file.size(), "Wrote file");
        }

        Ok(())
    }

    fn rollback(&self, root: &Path, created_from: Option<&Path>, cause: &StencilError) -> StencilResult<()> {
        let restored = match created_from {
            Some(top) => self.filesystem.remove_dir_all(top),
            None => self
                .filesystem
                .remove_dir_all(root)
                .and_then(|()| self.filesystem.create_dir_all(root)),
        };

        match restored {
            Ok(()) => {
                info!("Rollback successful");
                Ok(())
            }
            Err(e) => {
                let path = created_from.unwrap_or(root);
                warn!(error = %e, path = %path.display(), "Rollback failed");
                Err(ApplicationError::RollbackFailed {
                    path: path.to_path_buf(),
                    reason: format!("{e} (after: {cause})"),
                }
                .into())
            }
        }
    }
}
