//! The extraction pipeline: locate payload, clean it up, tokenize, apply
//! token rules, shape the result.

use crate::extract::{AnchorSpec, ESCAPED_NEWLINE, LocateError, PayloadLine, RawLog, TokenRules};
use serde::Deserialize;
use tracing::debug;

/// Whole-line cleanup applied to the payload before it is tokenized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCleanup {
    /// Literal substrings removed, in order.
    pub remove: Vec<String>,
    pub trim: bool,
}

impl LineCleanup {
    pub fn apply(&self, line: &str) -> String {
        let mut out = line.to_string();
        for needle in self.remove.iter().filter(|n| !n.is_empty()) {
            out = out.replace(needle.as_str(), "");
        }
        if self.trim {
            out.trim().to_string()
        } else {
            out
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Tokens rejoined with single spaces.
    #[default]
    Joined,
    /// The token sequence itself.
    Tokens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Message(String),
    Tokens(Vec<String>),
}

impl Extracted {
    /// Result used when no payload line could be located.
    pub fn empty(shape: OutputShape) -> Self {
        match shape {
            OutputShape::Joined => Extracted::Message(String::new()),
            OutputShape::Tokens => Extracted::Tokens(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Extracted::Message(m) => m.is_empty(),
            Extracted::Tokens(t) => t.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    pub anchor: AnchorSpec,
    pub separator: String,
    pub cleanup: LineCleanup,
    pub rules: TokenRules,
    pub shape: OutputShape,
    /// Token positions whose surrounding whitespace is logged. The tokens
    /// themselves are never trimmed.
    pub report_untrimmed: Vec<usize>,
}

impl Extractor {
    pub fn new(anchor: AnchorSpec) -> Self {
        Self {
            anchor,
            separator: ESCAPED_NEWLINE.to_string(),
            cleanup: LineCleanup::default(),
            rules: TokenRules::new(),
            shape: OutputShape::Joined,
            report_untrimmed: Vec::new(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_cleanup(mut self, cleanup: LineCleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn with_rules(mut self, rules: TokenRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_shape(mut self, shape: OutputShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_report_untrimmed(mut self, indices: Vec<usize>) -> Self {
        self.report_untrimmed = indices;
        self
    }

    /// Locate the raw payload line without any cleanup.
    pub fn locate<'a>(&self, text: &'a str) -> Result<PayloadLine<'a>, LocateError> {
        let log = RawLog::split(text, &self.separator);
        self.anchor.find_payload_line(&log)
    }

    /// Run the full pipeline. A missing anchor or a payload index past the
    /// end of the input yields the empty result for this shape.
    pub fn extract(&self, text: &str) -> Extracted {
        let payload = match self.locate(text) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%err, "no payload line, returning empty result");
                return Extracted::empty(self.shape);
            }
        };
        debug!(
            anchor_line = payload.anchor_index,
            payload_line = payload.index,
            "payload line located"
        );

        let cleaned = self.cleanup.apply(payload.text);
        let tokens: Vec<&str> = cleaned.split(' ').collect();
        self.report_untrimmed_tokens(&tokens);

        let tokens = self.rules.apply(&tokens);
        match self.shape {
            OutputShape::Joined => Extracted::Message(tokens.join(" ")),
            OutputShape::Tokens => Extracted::Tokens(tokens),
        }
    }

    fn report_untrimmed_tokens(&self, tokens: &[&str]) {
        for &index in &self.report_untrimmed {
            let Some(token) = tokens.get(index) else {
                continue;
            };
            if token.trim().len() != token.len() {
                debug!(index, token, "token has surrounding whitespace, left as is");
            }
        }
    }
}
