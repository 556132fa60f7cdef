//! Placeholder parsing and substitution.
//!
//! One function, [`substitute`], renders both template paths and file bodies.
//! The grammar is deliberately tiny:
//!
//! ```text
//! token    := "{{" ws* ( literal | lookup ) ws* "}}"
//! literal  := "'" [^']* "'" | '"' [^"]* '"'
//! lookup   := key ( ws* "|" ws* case )*
//! ```
//!
//! - `{{ org-name }}` looks `org-name` up in the [`Context`].
//! - `{{ prefix_name | lower }}` applies a [`Case`] filter to the value.
//! - `{{'{'}}` renders a literal `{` without any lookup, which lets templates
//!   emit third-party `{{ ... }}` syntax (CI expressions, Helm charts).
//! - In a run of braces like `{{{ id }}`, only the last two open the token;
//!   the rest are plain text (`{value`).
//! - A closing `}}` outside a token is plain text.

use thiserror::Error;

use crate::domain::{entities::context::Context, error::DomainError, value_objects::Case};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// One `{{ key | filter }}` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub key: String,
    pub filters: Vec<Case>,
    /// Byte offset of the opening delimiter in the source.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// A template string split into text and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    #[error("placeholder opened at byte {offset} is never closed")]
    Unterminated { offset: usize },

    #[error("placeholder at byte {offset} names no key")]
    EmptyKey { offset: usize },

    #[error("'{key}' at byte {offset} is not a valid key")]
    InvalidKey { key: String, offset: usize },

    #[error("string literal at byte {offset} is never closed")]
    UnterminatedLiteral { offset: usize },

    #[error("unknown filter '{filter}' at byte {offset}")]
    UnknownFilter { filter: String, offset: usize },

    #[error("no value for '{key}'")]
    Unresolved { key: String },
}

impl PlaceholderError {
    /// Attach the template path the error came from.
    pub fn at(self, path: impl Into<String>) -> DomainError {
        let path = path.into();
        match self {
            Self::Unresolved { key } => DomainError::UnresolvedPlaceholder { key, path },
            Self::UnknownFilter { filter, .. } => DomainError::UnknownCasingRule { rule: filter },
            other => DomainError::MalformedPlaceholder {
                offset: other.offset().unwrap_or_default(),
                reason: other.to_string(),
                path,
            },
        }
    }

    fn offset(&self) -> Option<usize> {
        match self {
            Self::Unterminated { offset }
            | Self::EmptyKey { offset }
            | Self::InvalidKey { offset, .. }
            | Self::UnterminatedLiteral { offset }
            | Self::UnknownFilter { offset, .. } => Some(*offset),
            Self::Unresolved { .. } => None,
        }
    }
}

impl ParsedTemplate {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every lookup, in source order (duplicates included).
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(p),
            Segment::Text(_) => None,
        })
    }

    /// `true` when rendering cannot consult the context at all.
    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// First key the context cannot resolve, if any.
    pub fn first_unresolved<'a>(&'a self, ctx: &Context) -> Option<&'a str> {
        self.placeholders()
            .find(|p| !ctx.contains_key(&p.key))
            .map(|p| p.key.as_str())
    }

    pub fn render(&self, ctx: &Context) -> Result<String, PlaceholderError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(p) => {
                    let value = ctx
                        .get(&p.key)
                        .ok_or_else(|| PlaceholderError::Unresolved { key: p.key.clone() })?;
                    let value = p
                        .filters
                        .iter()
                        .fold(value.to_string(), |acc, case| case.apply(&acc));
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

/// Render `source` against `ctx`. Used for paths and file bodies alike.
pub fn substitute(source: &str, ctx: &Context) -> Result<String, PlaceholderError> {
    parse(source)?.render(ctx)
}

/// Split `source` into text and lookups without touching any context.
pub fn parse(source: &str) -> Result<ParsedTemplate, PlaceholderError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut cursor = 0;

    while let Some(found) = source[cursor..].find(OPEN) {
        let mut open = cursor + found;
        // `{{{ key }}`: the token starts at the last pair of the run.
        while source[open + OPEN.len()..].starts_with('{') {
            open += 1;
        }
        text.push_str(&source[cursor..open]);

        let (token, end) = parse_token(source, open)?;
        match token {
            Token::Literal(literal) => text.push_str(&literal),
            Token::Lookup(placeholder) => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Placeholder(placeholder));
            }
        }
        cursor = end;
    }

    text.push_str(&source[cursor..]);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Ok(ParsedTemplate { segments })
}

enum Token {
    Literal(String),
    Lookup(Placeholder),
}

/// Parse the token whose `{{` sits at `open`. Returns the token and the byte
/// index just past its closing `}}`.
fn parse_token(source: &str, open: usize) -> Result<(Token, usize), PlaceholderError> {
    let body_start = open + OPEN.len();
    let body = &source[body_start..];
    let lead = body.len() - body.trim_start().len();

    if let Some(quote @ ('\'' | '"')) = body[lead..].chars().next() {
        let literal_start = body_start + lead + 1;
        let literal_len = source[literal_start..]
            .find(quote)
            .ok_or(PlaceholderError::UnterminatedLiteral { offset: open })?;
        let after = literal_start + literal_len + 1;
        let tail = &source[after..];
        let gap = tail.len() - tail.trim_start().len();
        if !tail[gap..].starts_with(CLOSE) {
            return Err(PlaceholderError::Unterminated { offset: open });
        }
        let literal = source[literal_start..literal_start + literal_len].to_string();
        return Ok((Token::Literal(literal), after + gap + CLOSE.len()));
    }

    let close = body
        .find(CLOSE)
        .ok_or(PlaceholderError::Unterminated { offset: open })?;
    let mut parts = body[..close].split('|');
    let key = parts.next().unwrap_or_default().trim();

    if key.is_empty() {
        return Err(PlaceholderError::EmptyKey { offset: open });
    }
    if !key.chars().all(is_key_char) {
        return Err(PlaceholderError::InvalidKey {
            key: key.to_string(),
            offset: open,
        });
    }

    let filters = parts
        .map(|f| {
            let name = f.trim();
            name.parse::<Case>()
                .map_err(|_| PlaceholderError::UnknownFilter {
                    filter: name.to_string(),
                    offset: open,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let placeholder = Placeholder {
        key: key.to_string(),
        filters,
        offset: open,
    };
    Ok((Token::Lookup(placeholder), body_start + close + CLOSE.len()))
}

fn is_key_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '\'' | '"' | '|')
}
