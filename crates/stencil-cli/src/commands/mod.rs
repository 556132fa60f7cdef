//! Command handlers.  Each one translates parsed arguments into calls on the
//! core services and renders the result; none of them holds business logic.

pub mod check;
pub mod completions;
pub mod config;
pub mod context;
pub mod init;
pub mod render;

use stencil_adapters::{FilesystemArchetypeStore, LocalFilesystem, PlaceholderRenderer};
use stencil_core::application::GenerateService;

/// The production wiring: archetypes and output both live on local disk.
fn generate_service() -> GenerateService {
    GenerateService::new(
        Box::new(FilesystemArchetypeStore::new()),
        Box::new(PlaceholderRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
}
