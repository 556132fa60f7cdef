use std::collections::HashMap;

use stencil_core::{
    application::{ApplicationError, ports::AnswerSource},
    domain::{AnswerValue, PromptSpec},
    error::StencilResult,
};

/// Answers held in memory: `-a key=value` pairs or configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapAnswers {
    values: HashMap<String, AnswerValue>,
}

impl MapAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Parse `key=value`. The value is kept as text; everything after the
    /// first `=` belongs to it.
    pub fn parse_pair(pair: &str) -> StencilResult<(String, AnswerValue)> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), AnswerValue::from(value)))
            }
            _ => Err(ApplicationError::AnswerSource {
                source_name: "command line".into(),
                reason: format!("expected key=value, got '{pair}'"),
            }
            .into()),
        }
    }

    /// Build from a list of `key=value` strings. Later pairs win.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> StencilResult<Self> {
        pairs
            .iter()
            .map(|p| Self::parse_pair(p.as_ref()))
            .collect::<StencilResult<Vec<_>>>()
            .map(|entries| entries.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for MapAnswers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl AnswerSource for MapAnswers {
    fn get(&self, prompt: &PromptSpec) -> StencilResult<Option<AnswerValue>> {
        Ok(self.values.get(prompt.key()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let answers = MapAnswers::from_pairs(&["org-name=Acme Corp", "url=http://x?a=b"]).unwrap();

        assert_eq!(
            answers.get(&PromptSpec::new("Org", "org-name")).unwrap(),
            Some(AnswerValue::from("Acme Corp"))
        );
        assert_eq!(
            answers.get(&PromptSpec::new("Url", "url")).unwrap(),
            Some(AnswerValue::from("http://x?a=b"))
        );
    }

    #[test]
    fn later_pairs_win() {
        let answers = MapAnswers::from_pairs(&["k=1", "k=2"]).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(
            answers.get(&PromptSpec::new("K", "k")).unwrap(),
            Some(AnswerValue::from("2"))
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(MapAnswers::parse_pair("novalue").is_err());
        assert!(MapAnswers::parse_pair("=value").is_err());
    }

    #[test]
    fn empty_value_is_allowed() {
        let (k, v) = MapAnswers::parse_pair("suffix-name=").unwrap();
        assert_eq!(k, "suffix-name");
        assert_eq!(v, AnswerValue::from(""));
    }

    #[test]
    fn unknown_key_has_no_opinion() {
        let answers = MapAnswers::new().with("a", "1");
        assert_eq!(answers.get(&PromptSpec::new("B", "b")).unwrap(), None);
    }
}
