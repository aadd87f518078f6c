//! Per-token cleanup rules, keyed by token position.

use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Cleanup applied to a single token.
#[derive(Debug, Clone)]
pub enum TokenRule {
    Keep,
    /// Take the second `after`-delimited segment, then cut it at the first
    /// `before` (if given and present).
    ///
    /// `id;VAL123&rest` with `after = ";"` and `before = "&"` gives `VAL123`.
    Between {
        after: String,
        before: Option<String>,
    },
    /// Remove every occurrence of the listed characters.
    Strip { chars: Vec<char> },
    /// Keep the first capture group (or the whole match when the pattern has none).
    Capture { pattern: Regex },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("token {token:?} has no {delimiter:?} delimiter")]
    MissingDelimiter { token: String, delimiter: String },

    #[error("token {token:?} does not match /{pattern}/")]
    NoMatch { token: String, pattern: String },
}

impl TokenRule {
    pub fn between(after: impl Into<String>, before: impl Into<String>) -> Self {
        TokenRule::Between {
            after: after.into(),
            before: Some(before.into()),
        }
    }

    pub fn strip(chars: &str) -> Self {
        TokenRule::Strip {
            chars: chars.chars().collect(),
        }
    }

    pub fn apply(&self, token: &str) -> Result<String, RuleError> {
        match self {
            TokenRule::Keep => Ok(token.to_string()),
            TokenRule::Between { after, before } => {
                let segment = token.split(after.as_str()).nth(1).ok_or_else(|| {
                    RuleError::MissingDelimiter {
                        token: token.to_string(),
                        delimiter: after.clone(),
                    }
                })?;
                let segment = match before.as_deref() {
                    Some(before) if !before.is_empty() => {
                        segment.find(before).map_or(segment, |at| &segment[..at])
                    }
                    _ => segment,
                };
                Ok(segment.to_string())
            }
            TokenRule::Strip { chars } => Ok(token.chars().filter(|c| !chars.contains(c)).collect()),
            TokenRule::Capture { pattern } => {
                let caps = pattern.captures(token).ok_or_else(|| RuleError::NoMatch {
                    token: token.to_string(),
                    pattern: pattern.as_str().to_string(),
                })?;
                let m = caps.get(1).or_else(|| caps.get(0));
                Ok(m.map(|m| m.as_str()).unwrap_or_default().to_string())
            }
        }
    }
}

/// Token index -> rule. Tokens without a rule pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TokenRules {
    rules: BTreeMap<usize, TokenRule>,
}

impl TokenRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, index: usize, rule: TokenRule) -> Self {
        self.insert(index, rule);
        self
    }

    pub fn insert(&mut self, index: usize, rule: TokenRule) {
        self.rules.insert(index, rule);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.rules.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Apply the rules by position. A rule that fails on a malformed token
    /// leaves that token as it was.
    pub fn apply<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                let token = token.as_ref();
                match self.rules.get(&index) {
                    None => token.to_string(),
                    Some(rule) => rule.apply(token).unwrap_or_else(|err| {
                        warn!(index, %err, "token rule failed, keeping token unchanged");
                        token.to_string()
                    }),
                }
            })
            .collect()
    }
}
