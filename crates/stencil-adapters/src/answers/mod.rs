//! Answer sources.
//!
//! Every source implements [`AnswerSource`](stencil_core::application::ports::AnswerSource).
//! The CLI stacks them with [`LayeredAnswers`]: command-line pairs, then answer
//! files, then configured defaults, then (optionally) an interactive prompt.

mod file;
mod layered;
mod map;

pub use file::FileAnswers;
pub use layered::LayeredAnswers;
pub use map::MapAnswers;
