//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stencil
//! archetype generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (GenerateService, ContextService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Driven: Store, Filesystem, Render,     │
//! │          AnswerSource)                  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stencil-adapters (Infrastructure)   │
//! │ (FilesystemArchetypeStore, LocalFs, ..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Case, PromptSpec, Context, Archetype) │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::application::GenerateService;
//!
//! // Adapters come from `stencil-adapters`.
//! let service = GenerateService::new(store, renderer, filesystem);
//! let report = service.generate("./archetype".as_ref(), &answers, "./out".as_ref())?;
//! println!("wrote {} files", report.files);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ContextService, GenerateService,
        ports::{AnswerSource, ArchetypeStore, Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        AnswerValue, Archetype, Case, CaseSet, CasingRule, Context, ContextBuilder,
        ProjectStructure, PromptSpec, TemplateTree,
    };
    pub use crate::error::{StencilError, StencilResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
