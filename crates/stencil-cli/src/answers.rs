//! Assembling the answer stack for `render` and `context`.
//!
//! Priority, highest first: `-a` flags, answer files (later files win),
//! config `[answers]`, then an interactive prompt when attached to a
//! terminal.

use std::io::IsTerminal as _;

use tracing::debug;

use stencil_adapters::{FileAnswers, LayeredAnswers, MapAnswers};

use crate::{cli::AnswerArgs, config::AppConfig, error::CliResult};

/// Build the layered answer source for one invocation.
pub fn build(args: &AnswerArgs, config: &AppConfig) -> CliResult<LayeredAnswers> {
    let mut layers = LayeredAnswers::new();

    layers.push("command line", Box::new(MapAnswers::from_pairs(&args.answers)?));

    for path in args.answer_files.iter().rev() {
        layers.push(path.display().to_string(), Box::new(FileAnswers::load(path)?));
    }

    if !config.answers.is_empty() {
        let defaults: MapAnswers = config.answers.clone().into_iter().collect();
        layers.push("config", Box::new(defaults));
    }

    if should_prompt(args, config) {
        push_interactive(&mut layers);
    }

    debug!(layers = layers.len(), "Answer sources ready");
    Ok(layers)
}

fn should_prompt(args: &AnswerArgs, config: &AppConfig) -> bool {
    !args.non_interactive
        && config.render.interactive
        && std::io::stdin().is_terminal()
        && std::io::stderr().is_terminal()
}

#[cfg(feature = "interactive")]
fn push_interactive(layers: &mut LayeredAnswers) {
    layers.push("interactive", Box::new(interactive::InteractiveAnswers::default()));
}

#[cfg(not(feature = "interactive"))]
fn push_interactive(_layers: &mut LayeredAnswers) {
    debug!("Built without the 'interactive' feature; not prompting");
}

#[cfg(feature = "interactive")]
mod interactive {
    use dialoguer::{Input, theme::ColorfulTheme};

    use stencil_core::{
        application::{ApplicationError, ports::AnswerSource},
        domain::{AnswerValue, PromptSpec},
        error::StencilResult,
    };

    /// Asks on the terminal for anything the other layers left open.
    #[derive(Default)]
    pub struct InteractiveAnswers {
        theme: ColorfulTheme,
    }

    impl AnswerSource for InteractiveAnswers {
        fn get(&self, prompt: &PromptSpec) -> StencilResult<Option<AnswerValue>> {
            if let Some(help) = prompt.help_text() {
                eprintln!("  {help}");
            }

            let label = match prompt.placeholder_hint() {
                Some(hint) => format!("{} (e.g. {hint})", prompt.label().trim_end_matches(':')),
                None => prompt.label().trim_end_matches(':').to_string(),
            };

            let mut input = Input::<String>::with_theme(&self.theme).with_prompt(label);
            if let Some(default) = prompt.default_value() {
                input = input.default(default.to_string());
            }

            input
                .interact_text()
                .map(|value| Some(AnswerValue::String(value)))
                .map_err(|e| {
                    ApplicationError::AnswerSource {
                        source_name: "interactive prompt".into(),
                        reason: e.to_string(),
                    }
                    .into()
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use stencil_core::{
        application::ports::AnswerSource,
        domain::{AnswerValue, PromptSpec},
    };

    fn answer(layers: &LayeredAnswers, key: &str) -> Option<AnswerValue> {
        layers.get(&PromptSpec::new(key, key)).unwrap()
    }

    #[test]
    fn flags_beat_files_beat_config() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.yaml");
        let second = dir.path().join("second.yaml");
        std::fs::write(&first, "a: first\nb: first\nc: first\n").unwrap();
        std::fs::write(&second, "b: second\n").unwrap();

        let args = AnswerArgs {
            answers: vec!["a=flag".into()],
            answer_files: vec![first, second],
            non_interactive: true,
        };
        let mut config = AppConfig::default();
        config.answers.insert("c".into(), "config".into());
        config.answers.insert("d".into(), "config".into());

        let layers = build(&args, &config).unwrap();
        assert_eq!(answer(&layers, "a"), Some(AnswerValue::from("flag")));
        assert_eq!(answer(&layers, "b"), Some(AnswerValue::from("second")));
        assert_eq!(answer(&layers, "c"), Some(AnswerValue::from("first")));
        assert_eq!(answer(&layers, "d"), Some(AnswerValue::from("config")));
        assert_eq!(answer(&layers, "e"), None);
    }

    #[test]
    fn missing_answer_file_fails_early() {
        let args = AnswerArgs {
            answer_files: vec![PathBuf::from("/no/such/answers.yaml")],
            non_interactive: true,
            ..AnswerArgs::default()
        };
        assert!(build(&args, &AppConfig::default()).is_err());
    }

    #[test]
    fn malformed_flag_fails_early() {
        let args = AnswerArgs {
            answers: vec!["oops".into()],
            non_interactive: true,
            ..AnswerArgs::default()
        };
        assert!(build(&args, &AppConfig::default()).is_err());
    }
}
