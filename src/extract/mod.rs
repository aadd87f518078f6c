//! Line-anchored field extraction from escaped log text.
//!
//! The upstream tooling serialises script output into one string, so the
//! "lines" we scan are separated by a literal `\n` (backslash + `n`), not by
//! real newlines.

pub mod anchor;
pub mod extractor;
pub mod lines;
pub mod rules;

pub use anchor::{AnchorSpec, DEFAULT_OFFSET, LocateError, PayloadLine};
pub use extractor::{Extracted, Extractor, LineCleanup, OutputShape};
pub use lines::{ESCAPED_NEWLINE, RawLog};
pub use rules::{TokenRule, TokenRules};
