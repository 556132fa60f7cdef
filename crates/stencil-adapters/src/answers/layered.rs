use stencil_core::{
    application::ports::AnswerSource,
    domain::{AnswerValue, PromptSpec},
    error::StencilResult,
};
use tracing::trace;

/// Asks each source in turn; the first one with a value wins.
#[derive(Default)]
pub struct LayeredAnswers {
    layers: Vec<(String, Box<dyn AnswerSource>)>,
}

impl LayeredAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority layer.
    pub fn push(&mut self, name: impl Into<String>, source: Box<dyn AnswerSource>) {
        self.layers.push((name.into(), source));
    }

    pub fn with(mut self, name: impl Into<String>, source: impl AnswerSource + 'static) -> Self {
        self.push(name, Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl AnswerSource for LayeredAnswers {
    fn get(&self, prompt: &PromptSpec) -> StencilResult<Option<AnswerValue>> {
        for (name, layer) in &self.layers {
            if let Some(value) = layer.get(prompt)? {
                trace!(key = prompt.key(), layer = %name, "Answer found");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}
