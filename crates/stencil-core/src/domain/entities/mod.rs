pub mod common;
pub mod context;
pub mod project_structure;
pub mod prompt;
pub mod template;

pub use crate::domain::DomainError;
pub use context::{Context, ContextBuilder};
pub use project_structure::ProjectStructure;
pub use prompt::{CasingRule, PromptSpec};
pub use template::Archetype;
