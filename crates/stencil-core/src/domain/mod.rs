//! Core domain layer for Stencil.
//!
//! This module contains pure logic with no I/O. Loading archetypes, asking
//! questions and writing files are handled via ports (traits) defined in the
//! application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, terminal or environment access
//! - **Immutable entities**: domain objects are `Clone` + `PartialEq`

pub mod entities;
pub mod error;
pub mod placeholder;
pub mod value_objects;

mod validation;

pub use entities::{
    common::{Permissions, RelativePath},
    context::{Context, ContextBuilder},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    prompt::{CasingRule, PromptSpec},
    template::{
        Archetype, ArchetypeBuilder, ArchetypeMetadata, DirectorySpec, FileSpec,
        TemplateContent, TemplateNode, TemplateTree,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use placeholder::{ParsedTemplate, Placeholder, PlaceholderError, Segment, substitute};
pub use validation::DomainValidator;
pub use value_objects::{AnswerValue, Case, CaseSet};
