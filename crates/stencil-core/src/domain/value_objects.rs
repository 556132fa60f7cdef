//! Value objects: case transforms, case sets and answer values.
//!
//! Everything here is immutable, `Clone` and free of I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================================
// Case
// ============================================================================

/// Closed set of case transforms.
///
/// | Case       | `"my HTTP server"` |
/// |------------|--------------------|
/// | `Kebab`    | `my-http-server`   |
/// | `Snake`    | `my_http_server`   |
/// | `Pascal`   | `MyHttpServer`     |
/// | `Camel`    | `myHttpServer`     |
/// | `Title`    | `My Http Server`   |
/// | `Constant` | `MY_HTTP_SERVER`   |
/// | `Train`    | `My-Http-Server`   |
/// | `Dot`      | `my.http.server`   |
/// | `Lower`    | `my http server`   |
/// | `Upper`    | `MY HTTP SERVER`   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Case {
    Kebab,
    Snake,
    Pascal,
    Camel,
    Title,
    Constant,
    Train,
    Dot,
    Lower,
    Upper,
}

impl Case {
    pub const ALL: [Case; 10] = [
        Case::Kebab,
        Case::Snake,
        Case::Pascal,
        Case::Camel,
        Case::Title,
        Case::Constant,
        Case::Train,
        Case::Dot,
        Case::Lower,
        Case::Upper,
    ];

    /// Apply this transform. Pure: the same input always yields the same output.
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::Kebab => split_words(input).join("-"),
            Self::Snake => split_words(input).join("_"),
            Self::Dot => split_words(input).join("."),
            Self::Constant => split_words(input).join("_").to_uppercase(),
            Self::Pascal => split_words(input).iter().map(|w| capitalize(w)).collect(),
            Self::Camel => split_words(input)
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
            Self::Title => join_capitalized(input, " "),
            Self::Train => join_capitalized(input, "-"),
            Self::Lower => input.to_lowercase(),
            Self::Upper => input.to_uppercase(),
        }
    }

    /// Canonical manifest spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kebab => "kebab",
            Self::Snake => "snake",
            Self::Pascal => "pascal",
            Self::Camel => "camel",
            Self::Title => "title",
            Self::Constant => "constant",
            Self::Train => "train",
            Self::Dot => "dot",
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Case {
    type Err = DomainError;

    /// Accepts `kebab`, `kebab-case`, `kebab_case`, `KebabCase` and the
    /// aliases `class`, `upper_snake`, `screaming_snake`, `package`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = split_words(s).join("_");
        let normalized = normalized.strip_suffix("_case").unwrap_or(&normalized);

        match normalized {
            "kebab" => Ok(Self::Kebab),
            "snake" => Ok(Self::Snake),
            "pascal" | "class" => Ok(Self::Pascal),
            "camel" => Ok(Self::Camel),
            "title" => Ok(Self::Title),
            "constant" | "upper_snake" | "screaming_snake" => Ok(Self::Constant),
            "train" => Ok(Self::Train),
            "dot" | "package" => Ok(Self::Dot),
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            _ => Err(DomainError::UnknownCasingRule { rule: s.to_string() }),
        }
    }
}

// ============================================================================
// CaseSet
// ============================================================================

/// An ordered set of cases used by the cased-identity rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseSet {
    /// camel, pascal, kebab, snake, constant.
    Programming,
    Explicit(Vec<Case>),
}

impl CaseSet {
    pub const PROGRAMMING: [Case; 5] =
        [Case::Camel, Case::Pascal, Case::Kebab, Case::Snake, Case::Constant];

    pub fn cases(&self) -> &[Case] {
        match self {
            Self::Programming => &Self::PROGRAMMING,
            Self::Explicit(cases) => cases,
        }
    }

    /// Parse a named set. Only `programming` is named; lists go through
    /// [`CaseSet::from_names`].
    pub fn named(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "programming" | "programming_cases" | "programming-cases" => Ok(Self::Programming),
            _ => Err(DomainError::UnknownCasingRule {
                rule: name.to_string(),
            }),
        }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        names
            .iter()
            .map(|n| n.as_ref().parse::<Case>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Explicit)
    }
}

impl fmt::Display for CaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Programming => f.write_str("programming"),
            Self::Explicit(cases) => {
                let names: Vec<&str> = cases.iter().map(|c| c.as_str()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

// ============================================================================
// AnswerValue
// ============================================================================

/// A scalar answer supplied by a user, an answer file or a prompt default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AnswerValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            // to_uppercase handles Unicode correctly (e.g., "ß" -> "SS")
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

fn join_capitalized(input: &str, sep: &str) -> String {
    split_words(input)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Split a string into lowercase words based on casing and separators.
///
/// ## Word Boundary Detection
///
/// 1. **Explicit separators:** `_`, `-`, `.`, whitespace → always split
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
///    (detected by `Upper Upper Lower` pattern)
pub(crate) fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
