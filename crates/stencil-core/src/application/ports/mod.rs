//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stencil-adapters` (and the
//! interactive prompt in `stencil-cli`) implement these.
//!
//! ## Driven (Output) Ports
//!
//! - `Filesystem`: writes the rendered project
//! - `ArchetypeStore`: loads archetypes
//! - `TemplateRenderer`: turns a tree plus context into a `ProjectStructure`
//! - `AnswerSource`: supplies raw answers for prompts

pub mod output;

pub use output::{AnswerSource, ArchetypeStore, Filesystem, TemplateRenderer};

#[cfg(test)]
pub use output::MockAnswerSource;
