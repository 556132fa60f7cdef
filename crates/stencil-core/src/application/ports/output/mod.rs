//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::domain::{AnswerValue, Archetype, Context, ProjectStructure, PromptSpec};
use crate::error::StencilResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write bytes to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()>;

    /// Set or clear the executable bit.
    fn set_permissions(&self, path: &Path, executable: bool) -> StencilResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// `true` if `path` is a directory with no entries.
    fn is_empty_dir(&self, path: &Path) -> StencilResult<bool>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;
}

/// Port for archetype loading.
///
/// Implemented by:
/// - `stencil_adapters::template_loader::FilesystemArchetypeStore` (archetype directories)
/// - `stencil_adapters::template_store::InMemoryArchetypeStore` (tests, embedding)
pub trait ArchetypeStore: Send + Sync {
    /// Load and validate the archetype at `location`.
    fn load(&self, location: &Path) -> StencilResult<Archetype>;
}

/// Port for template rendering.
///
/// Implementations must not write anything: the whole tree is rendered into
/// a [`ProjectStructure`] first, so an unresolved placeholder anywhere leaves
/// the destination untouched.
pub trait TemplateRenderer: Send + Sync {
    /// Render an archetype's tree into a project structure rooted at `output_root`.
    fn render(
        &self,
        archetype: &Archetype,
        context: &Context,
        output_root: &Path,
    ) -> StencilResult<ProjectStructure>;
}

/// Port for answer lookup.
///
/// `Ok(None)` means "no opinion"; the prompt default or the next layered
/// source gets a chance.
#[cfg_attr(test, mockall::automock)]
pub trait AnswerSource {
    fn get(&self, prompt: &PromptSpec) -> StencilResult<Option<AnswerValue>>;
}
