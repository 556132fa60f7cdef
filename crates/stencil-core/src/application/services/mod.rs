//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "resolve a context".

pub mod context_service;
pub mod generate_service;

pub use context_service::ContextService;
pub use generate_service::{CheckIssue, CheckReport, GenerateService, GenerationReport, Severity};
