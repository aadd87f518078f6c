//! Anchor lookup: find the marker line, then the payload line a fixed
//! number of lines below it.

use crate::extract::RawLog;
use thiserror::Error;

/// Number of lines between the anchor line and the payload line in the
/// automation output we parse.
pub const DEFAULT_OFFSET: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpec {
    /// Substring that marks the anchor line.
    pub phrase: String,
    /// Payload line index relative to the anchor line.
    pub offset: usize,
}

/// The located payload line plus where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLine<'a> {
    pub anchor_index: usize,
    pub index: usize,
    pub text: &'a str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("anchor phrase {phrase:?} not found in {lines} lines")]
    AnchorNotFound { phrase: String, lines: usize },

    #[error(
        "anchor at line {anchor_index} + offset {offset} is past the last line ({lines} lines)"
    )]
    OffsetOutOfRange {
        anchor_index: usize,
        offset: usize,
        lines: usize,
    },
}

impl AnchorSpec {
    pub fn new(phrase: impl Into<String>, offset: usize) -> Self {
        Self {
            phrase: phrase.into(),
            offset,
        }
    }

    /// Index of the first line containing the phrase. Later matches are ignored.
    pub fn find_anchor(&self, log: &RawLog<'_>) -> Option<usize> {
        log.lines()
            .iter()
            .position(|line| line.contains(self.phrase.as_str()))
    }

    pub fn find_payload_line<'a>(&self, log: &RawLog<'a>) -> Result<PayloadLine<'a>, LocateError> {
        let anchor_index = self
            .find_anchor(log)
            .ok_or_else(|| LocateError::AnchorNotFound {
                phrase: self.phrase.clone(),
                lines: log.len(),
            })?;

        let out_of_range = || LocateError::OffsetOutOfRange {
            anchor_index,
            offset: self.offset,
            lines: log.len(),
        };

        let index = anchor_index.checked_add(self.offset).ok_or_else(out_of_range)?;
        let text = log.get(index).ok_or_else(out_of_range)?;

        Ok(PayloadLine {
            anchor_index,
            index,
            text,
        })
    }
}
