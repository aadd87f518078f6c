//! Profile layer: named extraction configurations.
//!
//! A profile bundles the anchor, separator, cleanup, token rules and output
//! shape for one kind of log. Built-in profiles cover the automation logs we
//! know about; others can be loaded from a JSON file (see `spec`).

pub mod builtin;
pub mod spec;

pub use spec::{ProfileSpec, load_profile_file};

use crate::Result;
use crate::extract::Extractor;
use anyhow::{Context, bail};

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub extractor: Extractor,
}

impl Profile {
    /// Replace the anchor phrase and/or offset, e.g. from command-line flags.
    pub fn override_anchor(&mut self, phrase: Option<String>, offset: Option<usize>) -> Result<()> {
        if let Some(phrase) = phrase {
            if phrase.is_empty() {
                bail!("anchor phrase must not be empty");
            }
            self.extractor.anchor.phrase = phrase;
        }
        if let Some(offset) = offset {
            self.extractor.anchor.offset = offset;
        }
        Ok(())
    }
}

/// Pick the profile to run: a profile file wins over a built-in name; with
/// neither, the `error-message` built-in is used.
pub fn resolve(name: Option<&str>, file: Option<&str>) -> Result<Profile> {
    if let Some(path) = file {
        return load_profile_file(path);
    }
    let name = name.unwrap_or(builtin::ERROR_MESSAGE);
    builtin::lookup(name)
        .with_context(|| format!("unknown profile {:?} (try `profiles` to list them)", name))
}
