//! Answers read from a YAML, JSON or TOML document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use stencil_core::{
    application::{ApplicationError, ports::AnswerSource},
    domain::{AnswerValue, PromptSpec},
    error::StencilResult,
};
use tracing::debug;

/// Answers loaded from one file.
///
/// Nested tables are flattened with `.`, so
///
/// ```yaml
/// org-name: Acme
/// db:
///   port: 5432
/// ```
///
/// answers `org-name` and `db.port`. `null` counts as "no answer"; lists are
/// rejected because a prompt takes a single scalar.
#[derive(Debug, Clone)]
pub struct FileAnswers {
    path: PathBuf,
    values: HashMap<String, AnswerValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl FileAnswers {
    pub fn load(path: impl AsRef<Path>) -> StencilResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ApplicationError::AnswerFileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let format = format_of(path)?;
        let raw = fs::read_to_string(path).map_err(|e| ApplicationError::io(path, &e))?;
        let answers = Self::parse(path, &raw, format)?;
        debug!(path = %path.display(), answers = answers.values.len(), "Loaded answer file");
        Ok(answers)
    }

    /// Parse a YAML document that did not come from disk (stdin, tests).
    pub fn from_yaml_str(raw: &str) -> StencilResult<Self> {
        Self::parse(Path::new("<yaml>"), raw, Format::Yaml)
    }

    fn parse(path: &Path, raw: &str, format: Format) -> StencilResult<Self> {
        let fail = |reason: String| ApplicationError::AnswerSource {
            source_name: path.display().to_string(),
            reason,
        };

        let document: Value = match format {
            Format::Yaml if raw.trim().is_empty() => Value::Object(Default::default()),
            Format::Yaml => serde_yaml::from_str(raw).map_err(|e| fail(e.to_string()))?,
            Format::Json => serde_json::from_str(raw).map_err(|e| fail(e.to_string()))?,
            Format::Toml => toml::from_str(raw).map_err(|e| fail(e.to_string()))?,
        };

        let Value::Object(map) = document else {
            return Err(fail("top level must be a mapping of keys to values".into()).into());
        };

        let mut values = HashMap::new();
        flatten("", &Value::Object(map), &mut values).map_err(fail)?;

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AnswerSource for FileAnswers {
    fn get(&self, prompt: &PromptSpec) -> StencilResult<Option<AnswerValue>> {
        Ok(self.values.get(prompt.key()).cloned())
    }
}

fn format_of(path: &Path) -> StencilResult<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(ApplicationError::AnswerSource {
            source_name: path.display().to_string(),
            reason: "unsupported extension, expected .yaml, .yml, .json or .toml".into(),
        }
        .into()),
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, AnswerValue>) -> Result<(), String> {
    let scalar = match value {
        Value::Null => return Ok(()),
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out)?;
            }
            return Ok(());
        }
        Value::Array(_) => return Err(format!("'{prefix}' is a list; answers must be scalars")),
        Value::Bool(b) => AnswerValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AnswerValue::Integer(i),
            None => AnswerValue::Float(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => AnswerValue::String(s.clone()),
    };
    out.insert(prefix.to_string(), scalar);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::error::StencilError;
    use tempfile::TempDir;

    fn answer(answers: &FileAnswers, key: &str) -> Option<AnswerValue> {
        answers.get(&PromptSpec::new(key, key)).unwrap()
    }

    #[test]
    fn yaml_scalars_and_nesting() {
        let answers = FileAnswers::from_yaml_str(
            "org-name: Acme\nport: 8080\nratio: 0.5\nenabled: true\nskip: null\ndb:\n  host: localhost\n",
        )
        .unwrap();

        assert_eq!(answer(&answers, "org-name"), Some(AnswerValue::from("Acme")));
        assert_eq!(answer(&answers, "port"), Some(AnswerValue::Integer(8080)));
        assert_eq!(answer(&answers, "ratio"), Some(AnswerValue::Float(0.5)));
        assert_eq!(answer(&answers, "enabled"), Some(AnswerValue::Bool(true)));
        assert_eq!(answer(&answers, "skip"), None);
        assert_eq!(answer(&answers, "db.host"), Some(AnswerValue::from("localhost")));
    }

    #[test]
    fn lists_are_rejected() {
        let err = FileAnswers::from_yaml_str("tags: [a, b]\n").unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::AnswerSource { reason, .. }) if reason.contains("tags")
        ));
    }

    #[test]
    fn top_level_scalar_is_rejected() {
        assert!(FileAnswers::from_yaml_str("just a string").is_err());
    }

    #[test]
    fn empty_yaml_is_empty() {
        assert!(FileAnswers::from_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn loads_json_and_toml_by_extension() {
        let temp = TempDir::new().unwrap();
        let json = temp.path().join("answers.json");
        let toml_path = temp.path().join("answers.toml");
        fs::write(&json, r#"{"org-name": "Acme", "solution-name": "billing"}"#).unwrap();
        fs::write(&toml_path, "org-name = \"Acme\"\n[db]\nport = 5432\n").unwrap();

        let from_json = FileAnswers::load(&json).unwrap();
        assert_eq!(answer(&from_json, "solution-name"), Some(AnswerValue::from("billing")));

        let from_toml = FileAnswers::load(&toml_path).unwrap();
        assert_eq!(answer(&from_toml, "db.port"), Some(AnswerValue::Integer(5432)));
        assert_eq!(from_toml.path(), toml_path.as_path());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = FileAnswers::load("/no/such/answers.yaml").unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::AnswerFileNotFound { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("answers.ini");
        fs::write(&path, "a=b").unwrap();
        assert!(FileAnswers::load(&path).is_err());
    }
}
