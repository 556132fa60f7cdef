//! Context Service - resolves prompts into a [`Context`].

use tracing::{debug, info, instrument};

use crate::{
    application::ports::AnswerSource,
    domain::{Context, ContextBuilder, PromptSpec},
    error::StencilResult,
};

/// Drives a [`ContextBuilder`] over an archetype's prompts, in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextService;

impl ContextService {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(prompts = prompts.len()))]
    pub fn resolve(&self, prompts: &[PromptSpec], answers: &dyn AnswerSource) -> StencilResult<Context> {
        let mut builder = ContextBuilder::new();

        for prompt in prompts {
            let supplied = answers.get(prompt)?;
            debug!(
                key = prompt.key(),
                supplied = supplied.is_some(),
                has_default = prompt.default_value().is_some(),
                "Resolving prompt"
            );
            builder = builder.resolve(prompt, supplied)?;
        }

        let context = builder.build();
        info!(entries = context.len(), "Context resolved");
        Ok(context)
    }
}
