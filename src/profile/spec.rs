//! Profile files (JSON) describing a custom extraction.
//!
//! JSON shape:
//! {
//!   "name": "vm-tag-error",
//!   "anchor": "Execute get_vm_tag.py script",
//!   "offset": 3,                          // optional, default 3
//!   "separator": "\\n",                   // optional, default literal backslash-n
//!   "cleanup": {                          // optional
//!     "remove": ["&quot;", "\\"],
//!     "trim": true
//!   },
//!   "rules": {                            // optional, keyed by token index
//!     "2": { "kind": "between", "after": ";", "before": "&" },
//!     "6": { "kind": "strip", "chars": "\\" },
//!     "7": { "kind": "capture", "pattern": "code=(\\d+)" }
//!   },
//!   "shape": "joined",                    // "joined" | "tokens"
//!   "report_untrimmed": [1]               // optional
//! }
//!
//! Rule indices are strings because JSON object keys are; they are parsed and
//! validated when the profile is built.

use crate::Result;
use crate::extract::{
    AnchorSpec, DEFAULT_OFFSET, ESCAPED_NEWLINE, Extractor, LineCleanup, OutputShape, TokenRule,
    TokenRules,
};
use crate::profile::Profile;
use anyhow::{Context, bail};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    pub name: String,

    pub anchor: String,

    #[serde(default = "default_offset")]
    pub offset: usize,

    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub cleanup: CleanupSpec,

    #[serde(default)]
    pub rules: BTreeMap<String, RuleSpec>,

    #[serde(default)]
    pub shape: OutputShape,

    #[serde(default)]
    pub report_untrimmed: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupSpec {
    #[serde(default)]
    pub remove: Vec<String>,

    #[serde(default)]
    pub trim: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum RuleSpec {
    Keep,
    Between {
        after: String,
        #[serde(default)]
        before: Option<String>,
    },
    Strip {
        chars: String,
    },
    Capture {
        pattern: String,
    },
}

fn default_offset() -> usize {
    DEFAULT_OFFSET
}

fn default_separator() -> String {
    ESCAPED_NEWLINE.to_string()
}

impl RuleSpec {
    fn build(&self) -> Result<TokenRule> {
        let rule = match self {
            RuleSpec::Keep => TokenRule::Keep,
            RuleSpec::Between { after, before } => {
                if after.is_empty() {
                    bail!("between rule needs a non-empty `after` delimiter");
                }
                TokenRule::Between {
                    after: after.clone(),
                    before: before.clone().filter(|b| !b.is_empty()),
                }
            }
            RuleSpec::Strip { chars } => {
                if chars.is_empty() {
                    bail!("strip rule needs at least one character in `chars`");
                }
                TokenRule::strip(chars)
            }
            RuleSpec::Capture { pattern } => {
                let pattern = Regex::new(pattern)
                    .with_context(|| format!("bad capture pattern {:?}", pattern))?;
                TokenRule::Capture { pattern }
            }
        };
        Ok(rule)
    }
}

impl ProfileSpec {
    /// Validate the raw spec and build a runnable profile:
    /// - name, anchor and separator are non-empty
    /// - rule keys are token indices
    /// - each rule is well formed (capture patterns compile)
    pub fn validate_and_build(&self) -> Result<Profile> {
        if self.name.trim().is_empty() {
            bail!("profile name must not be empty");
        }
        if self.anchor.is_empty() {
            bail!("profile {}: anchor phrase must not be empty", self.name);
        }
        if self.separator.is_empty() {
            bail!("profile {}: separator must not be empty", self.name);
        }

        let mut rules = TokenRules::new();
        for (key, spec) in &self.rules {
            let index: usize = key.trim().parse().with_context(|| {
                format!("profile {}: rule key {:?} is not a token index", self.name, key)
            })?;
            let rule = spec
                .build()
                .with_context(|| format!("profile {}: rule for token {}", self.name, index))?;
            if rules.contains(index) {
                bail!(
                    "profile {}: duplicate rule for token {} (key {:?})",
                    self.name,
                    index,
                    key
                );
            }
            rules.insert(index, rule);
        }

        let cleanup = LineCleanup {
            remove: self.cleanup.remove.clone(),
            trim: self.cleanup.trim,
        };

        let extractor = Extractor::new(AnchorSpec::new(self.anchor.clone(), self.offset))
            .with_separator(self.separator.clone())
            .with_cleanup(cleanup)
            .with_rules(rules)
            .with_shape(self.shape)
            .with_report_untrimmed(self.report_untrimmed.clone());

        Ok(Profile {
            name: self.name.clone(),
            extractor,
        })
    }
}

/// Read, parse and validate a profile file.
pub fn load_profile_file(path: &str) -> Result<Profile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read profile file {}", path))?;
    let spec: ProfileSpec =
        serde_json::from_str(&text).with_context(|| format!("parse profile file {}", path))?;
    let profile = spec
        .validate_and_build()
        .with_context(|| format!("invalid profile file {}", path))?;
    debug!(path, name = %profile.name, rules = profile.extractor.rules.len(), "loaded profile");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extracted;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn parse(json: &str) -> ProfileSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn minimal_spec_uses_defaults() {
        let profile = parse(r#"{ "name": "min", "anchor": "MARK" }"#)
            .validate_and_build()
            .unwrap();

        let ex = &profile.extractor;
        assert_eq!(ex.anchor, AnchorSpec::new("MARK", 3));
        assert_eq!(ex.separator, "\\n");
        assert_eq!(ex.cleanup, LineCleanup::default());
        assert_eq!(ex.shape, OutputShape::Joined);
        assert_eq!(ex.rules.len(), 0);
    }

    #[test]
    fn full_spec_matches_error_message_builtin() {
        let profile = parse(
            r#"{
                "name": "custom",
                "anchor": "Execute get_vm_tag.py script",
                "rules": {
                    "2": { "kind": "between", "after": ";", "before": "&" },
                    "6": { "kind": "strip", "chars": "\\" }
                }
            }"#,
        )
        .validate_and_build()
        .unwrap();

        let raw = "Execute get_vm_tag.py script\\n1\\n2\\na b c;X&Y d e f g\\\\h";
        assert_eq!(
            profile.extractor.extract(raw),
            crate::profile::builtin::error_message().extractor.extract(raw)
        );
        assert_eq!(
            profile.extractor.extract(raw),
            Extracted::Message("a b X d e f gh".to_string())
        );
    }

    #[test]
    fn tokens_shape_and_capture_rule() {
        let profile = parse(
            r#"{
                "name": "codes",
                "anchor": "RESULT",
                "offset": 1,
                "separator": "|",
                "cleanup": { "remove": ["\""], "trim": true },
                "rules": { "1": { "kind": "capture", "pattern": "code=(\\d+)" } },
                "shape": "tokens"
            }"#,
        )
        .validate_and_build()
        .unwrap();

        assert_eq!(
            profile.extractor.extract("x|RESULT|  \"failed code=17\"  |y"),
            Extracted::Tokens(vec!["failed".to_string(), "17".to_string()])
        );
    }

    #[test]
    fn rejects_bad_specs() {
        let cases = [
            r#"{ "name": "", "anchor": "A" }"#,
            r#"{ "name": "n", "anchor": "" }"#,
            r#"{ "name": "n", "anchor": "A", "separator": "" }"#,
            r#"{ "name": "n", "anchor": "A", "rules": { "two": { "kind": "keep" } } }"#,
            r#"{ "name": "n", "anchor": "A", "rules": { "2": { "kind": "between", "after": "" } } }"#,
            r#"{ "name": "n", "anchor": "A", "rules": { "2": { "kind": "strip", "chars": "" } } }"#,
            r#"{ "name": "n", "anchor": "A", "rules": { "2": { "kind": "capture", "pattern": "(" } } }"#,
        ];
        for json in cases {
            assert!(
                parse(json).validate_and_build().is_err(),
                "expected rejection: {}",
                json
            );
        }
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let res: std::result::Result<ProfileSpec, _> =
            serde_json::from_str(r#"{ "name": "n", "anchor": "A", "ofset": 2 }"#);
        assert!(res.is_err());

        let res: std::result::Result<ProfileSpec, _> = serde_json::from_str(
            r#"{ "name": "n", "anchor": "A", "rules": { "1": { "kind": "upper" } } }"#,
        );
        assert!(res.is_err());

        let res: std::result::Result<ProfileSpec, _> = serde_json::from_str(
            r#"{ "name": "n", "anchor": "A",
                 "rules": { "2": { "kind": "between", "after": ";", "befor": "&" } } }"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn duplicate_rule_index_is_rejected() {
        let spec = parse(
            r#"{ "name": "dup", "anchor": "A",
                 "rules": { "2": { "kind": "keep" }, "02": { "kind": "strip", "chars": "x" } } }"#,
        );
        let err = spec.validate_and_build().unwrap_err();
        assert!(err.to_string().contains("duplicate rule for token 2"));
    }

    #[test]
    fn loads_profile_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "name": "from-file", "anchor": "MARK", "offset": 1, "shape": "tokens" }}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let profile = load_profile_file(path).unwrap();
        assert_eq!(profile.name, "from-file");
        assert_eq!(
            profile.extractor.extract("MARK\\na b"),
            Extracted::Tokens(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn missing_profile_file_reports_path() {
        let err = load_profile_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
