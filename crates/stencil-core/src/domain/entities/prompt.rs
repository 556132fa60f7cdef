//! Prompt declarations and the casing rules attached to them.
//!
//! A prompt asks for one value and stores it under its `key`. Casing rules
//! then fan that single answer out into more context entries:
//!
//! ```text
//! prompt key = "org-name", answer = "Acme Corp"
//!
//!   CasedIdentity(programming)        FixedKey { org-title, Title }
//!   ├── orgName    = acmeCorp         └── org-title = Acme Corp
//!   ├── OrgName    = AcmeCorp
//!   ├── org-name   = acme-corp   (replaces the raw answer)
//!   ├── org_name   = acme_corp
//!   └── ORG_NAME   = ACME_CORP
//! ```

use std::fmt;

use crate::domain::value_objects::{AnswerValue, Case, CaseSet};

/// One declared question in an archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    label: String,
    key: String,
    placeholder: Option<String>,
    help: Option<String>,
    defaults_with: Option<AnswerValue>,
    cased_as: Vec<CasingRule>,
}

impl PromptSpec {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            placeholder: None,
            help: None,
            defaults_with: None,
            cased_as: Vec::new(),
        }
    }

    /// Hint shown in the interactive prompt (e.g. `Acme Corp`).
    pub fn placeholder(mut self, hint: impl Into<String>) -> Self {
        self.placeholder = Some(hint.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn defaults_with(mut self, value: impl Into<AnswerValue>) -> Self {
        self.defaults_with = Some(value.into());
        self
    }

    /// Append a casing rule (accumulates).
    pub fn cased_as(mut self, rule: CasingRule) -> Self {
        self.cased_as.push(rule);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn placeholder_hint(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn default_value(&self) -> Option<&AnswerValue> {
        self.defaults_with.as_ref()
    }

    pub fn rules(&self) -> &[CasingRule] {
        &self.cased_as
    }

    /// Every key this prompt can put into the context, raw key first.
    pub fn declared_keys(&self) -> Vec<String> {
        let mut keys = vec![self.key.clone()];
        for rule in &self.cased_as {
            for key in rule.target_keys(&self.key) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

/// How a prompt's answer is fanned out into additional context keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasingRule {
    /// For each case, the key is the prompt key in that case and the value
    /// is the answer in that case.
    CasedIdentity(CaseSet),

    /// One explicitly named key holding the answer in one case.
    FixedKey { key: String, case: Case },
}

impl CasingRule {
    /// Keys this rule writes for a prompt whose key is `base_key`.
    pub fn target_keys(&self, base_key: &str) -> Vec<String> {
        match self {
            Self::CasedIdentity(set) => set.cases().iter().map(|c| c.apply(base_key)).collect(),
            Self::FixedKey { key, .. } => vec![key.clone()],
        }
    }

    /// `(key, value)` pairs derived from one answer.
    pub fn derive(&self, base_key: &str, value: &str) -> Vec<(String, String)> {
        match self {
            Self::CasedIdentity(set) => set
                .cases()
                .iter()
                .map(|c| (c.apply(base_key), c.apply(value)))
                .collect(),
            Self::FixedKey { key, case } => vec![(key.clone(), case.apply(value))],
        }
    }
}

impl fmt::Display for CasingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CasedIdentity(set) => write!(f, "cased identity ({set})"),
            Self::FixedKey { key, case } => write!(f, "fixed key '{key}' ({case})"),
        }
    }
}
