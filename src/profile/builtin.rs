//! Profiles for the automation job logs this tool was written for.

use crate::extract::{
    AnchorSpec, DEFAULT_OFFSET, Extractor, LineCleanup, OutputShape, TokenRule, TokenRules,
};
use crate::profile::Profile;

pub const ERROR_MESSAGE: &str = "error-message";
pub const JSON_RESULT: &str = "json-result";

/// Marker line printed before the VM tag lookup step.
pub const VM_TAG_ANCHOR: &str = "Execute get_vm_tag.py script";
/// Marker line printed before the JSON result step.
pub const JSON_OUTPUT_ANCHOR: &str = "Output result as JSON";

/// Error message from the VM tag lookup: token 2 carries an encoded value
/// (`name;VALUE&...`), token 6 is backslash-escaped.
pub fn error_message() -> Profile {
    let rules = TokenRules::new()
        .with(2, TokenRule::between(";", "&"))
        .with(6, TokenRule::strip("\\"));

    Profile {
        name: ERROR_MESSAGE.to_string(),
        extractor: Extractor::new(AnchorSpec::new(VM_TAG_ANCHOR, DEFAULT_OFFSET)).with_rules(rules),
    }
}

/// Result line of the JSON output step, HTML-quoted and backslash-escaped.
///
/// The second token is checked for surrounding whitespace but never trimmed.
pub fn json_result() -> Profile {
    let cleanup = LineCleanup {
        remove: vec!["&quot;".to_string(), "\\".to_string()],
        trim: true,
    };

    Profile {
        name: JSON_RESULT.to_string(),
        extractor: Extractor::new(AnchorSpec::new(JSON_OUTPUT_ANCHOR, DEFAULT_OFFSET))
            .with_cleanup(cleanup)
            .with_shape(OutputShape::Tokens)
            .with_report_untrimmed(vec![1]),
    }
}

pub fn all() -> Vec<Profile> {
    vec![error_message(), json_result()]
}

pub fn lookup(name: &str) -> Option<Profile> {
    all().into_iter().find(|p| p.name == name)
}
