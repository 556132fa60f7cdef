use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::prompt::{CasingRule, PromptSpec},
    error::DomainError,
    value_objects::AnswerValue,
};

/// Flat key/value map consulted by placeholder substitution.
///
/// Ordered, so listings and `--output-format json` are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Context {
    entries: BTreeMap<String, String>,
}

impl Context {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Where a context entry came from. Reported in `DuplicateKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Answer { prompt: String },
    Rule { prompt: String, rule: String },
}

impl Origin {
    /// A prompt's own rules may overwrite that prompt's raw answer, which is
    /// how `org-name` ends up holding `acme-corp` under the identity rule.
    fn yields_to(&self, incoming: &Origin) -> bool {
        matches!(
            (self, incoming),
            (Origin::Answer { prompt: a }, Origin::Rule { prompt: b, .. }) if a == b
        )
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer { prompt } => write!(f, "answer to '{prompt}'"),
            Self::Rule { prompt, rule } => write!(f, "{rule} of '{prompt}'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    origin: Origin,
}

/// Folds prompts and their answers into a [`Context`].
///
/// Prompts are resolved in declaration order. Each one:
///
/// 1. takes the supplied answer, else the prompt default, else fails with
///    [`DomainError::MissingAnswer`];
/// 2. stores the answer under the prompt key;
/// 3. applies every casing rule, storing each derived pair.
///
/// Two writers may target the same key only when they agree on the value, or
/// when a prompt's rule replaces that same prompt's raw answer. Anything else
/// is a [`DomainError::DuplicateKey`].
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    entries: BTreeMap<String, Entry>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        mut self,
        prompt: &PromptSpec,
        supplied: Option<AnswerValue>,
    ) -> Result<Self, DomainError> {
        let value = supplied
            .or_else(|| prompt.default_value().cloned())
            .ok_or_else(|| DomainError::MissingAnswer {
                key: prompt.key().to_string(),
            })?
            .to_string();

        self.insert(
            prompt.key().to_string(),
            value.clone(),
            Origin::Answer {
                prompt: prompt.key().to_string(),
            },
        )?;

        for rule in prompt.rules() {
            self.apply_rule(prompt.key(), rule, &value)?;
        }

        Ok(self)
    }

    fn apply_rule(&mut self, prompt: &str, rule: &CasingRule, value: &str) -> Result<(), DomainError> {
        for (key, derived) in rule.derive(prompt, value) {
            self.insert(
                key,
                derived,
                Origin::Rule {
                    prompt: prompt.to_string(),
                    rule: rule.to_string(),
                },
            )?;
        }
        Ok(())
    }

    fn insert(&mut self, key: String, value: String, origin: Origin) -> Result<(), DomainError> {
        match self.entries.get_mut(&key) {
            None => {
                self.entries.insert(key, Entry { value, origin });
            }
            Some(existing) if existing.origin.yields_to(&origin) => {
                *existing = Entry { value, origin };
            }
            Some(existing) if existing.value == value => {}
            Some(existing) => {
                return Err(DomainError::DuplicateKey {
                    key,
                    existing: format!("{} = {:?}", existing.origin, existing.value),
                    conflicting: format!("{origin} = {value:?}"),
                });
            }
        }
        Ok(())
    }

    pub fn build(self) -> Context {
        Context {
            entries: self
                .entries
                .into_iter()
                .map(|(k, e)| (k, e.value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Case, CaseSet};

    fn org_prompt() -> PromptSpec {
        PromptSpec::new("Organization Name", "org-name")
            .cased_as(CasingRule::CasedIdentity(CaseSet::Programming))
            .cased_as(CasingRule::FixedKey {
                key: "org-title".into(),
                case: Case::Title,
            })
    }

    #[test]
    fn identity_and_fixed_rules_populate_context() {
        let ctx = ContextBuilder::new()
            .resolve(&org_prompt(), Some("Acme Corp".into()))
            .unwrap()
            .build();

        assert_eq!(ctx.get("orgName"), Some("acmeCorp"));
        assert_eq!(ctx.get("OrgName"), Some("AcmeCorp"));
        assert_eq!(ctx.get("org-name"), Some("acme-corp"));
        assert_eq!(ctx.get("org_name"), Some("acme_corp"));
        assert_eq!(ctx.get("ORG_NAME"), Some("ACME_CORP"));
        assert_eq!(ctx.get("org-title"), Some("Acme Corp"));
        assert_eq!(ctx.len(), 6);
    }

    #[test]
    fn prompt_without_rules_keeps_raw_answer() {
        let prompt = PromptSpec::new("Author", "author");
        let ctx = ContextBuilder::new()
            .resolve(&prompt, Some("Jane Doe".into()))
            .unwrap()
            .build();

        assert_eq!(ctx.get("author"), Some("Jane Doe"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn default_fills_missing_answer() {
        let prompt = PromptSpec::new("Suffix", "suffix-name").defaults_with("service");
        let ctx = ContextBuilder::new().resolve(&prompt, None).unwrap().build();
        assert_eq!(ctx.get("suffix-name"), Some("service"));
    }

    #[test]
    fn supplied_answer_beats_default() {
        let prompt = PromptSpec::new("Suffix", "suffix-name").defaults_with("service");
        let ctx = ContextBuilder::new()
            .resolve(&prompt, Some("worker".into()))
            .unwrap()
            .build();
        assert_eq!(ctx.get("suffix-name"), Some("worker"));
    }

    #[test]
    fn missing_answer_without_default_fails() {
        let prompt = PromptSpec::new("Prefix", "prefix-name");
        let err = ContextBuilder::new().resolve(&prompt, None).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingAnswer {
                key: "prefix-name".into()
            }
        );
    }

    #[test]
    fn non_string_answers_are_stringified() {
        let prompt = PromptSpec::new("Port", "port").defaults_with(8080_i64);
        let ctx = ContextBuilder::new().resolve(&prompt, None).unwrap().build();
        assert_eq!(ctx.get("port"), Some("8080"));
    }

    #[test]
    fn conflicting_writers_report_both_origins() {
        let first = PromptSpec::new("Org", "org-name");
        let second = PromptSpec::new("Solution", "solution-name").cased_as(CasingRule::FixedKey {
            key: "org-name".into(),
            case: Case::Kebab,
        });

        let err = ContextBuilder::new()
            .resolve(&first, Some("Acme".into()))
            .unwrap()
            .resolve(&second, Some("Billing".into()))
            .unwrap_err();

        match err {
            DomainError::DuplicateKey {
                key,
                existing,
                conflicting,
            } => {
                assert_eq!(key, "org-name");
                assert!(existing.contains("answer to 'org-name'"));
                assert!(conflicting.contains("'solution-name'"));
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn agreeing_writers_are_not_a_conflict() {
        let first = PromptSpec::new("Org", "org-name");
        let second = PromptSpec::new("Org again", "other").cased_as(CasingRule::FixedKey {
            key: "org-name".into(),
            case: Case::Lower,
        });

        let ctx = ContextBuilder::new()
            .resolve(&first, Some("acme".into()))
            .unwrap()
            .resolve(&second, Some("ACME".into()))
            .unwrap()
            .build();
        assert_eq!(ctx.get("org-name"), Some("acme"));
    }

    #[test]
    fn two_rules_of_one_prompt_disagreeing_is_a_conflict() {
        let prompt = PromptSpec::new("Name", "name")
            .cased_as(CasingRule::FixedKey {
                key: "name".into(),
                case: Case::Kebab,
            })
            .cased_as(CasingRule::FixedKey {
                key: "name".into(),
                case: Case::Title,
            });

        let err = ContextBuilder::new()
            .resolve(&prompt, Some("acme corp".into()))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));
    }

    #[test]
    fn single_word_key_under_identity_collides_on_multi_word_value() {
        // `x` is the same key in every programming case, but the values differ.
        let prompt =
            PromptSpec::new("X", "x").cased_as(CasingRule::CasedIdentity(CaseSet::Programming));

        let err = ContextBuilder::new()
            .resolve(&prompt, Some("acme corp".into()))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { key, .. } if key == "x"));
    }

    #[test]
    fn context_serializes_as_flat_object() {
        let ctx: Context = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn build_is_deterministic() {
        let build = || {
            ContextBuilder::new()
                .resolve(&org_prompt(), Some("Acme Corp".into()))
                .unwrap()
                .build()
        };
        assert_eq!(build(), build());
    }
}
