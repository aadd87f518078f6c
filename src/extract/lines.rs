/// Line separator of the upstream log format: a backslash followed by `n`.
pub const ESCAPED_NEWLINE: &str = "\\n";

/// Input text split into lines. Borrows from the input.
#[derive(Debug, Clone)]
pub struct RawLog<'a> {
    lines: Vec<&'a str>,
}

impl<'a> RawLog<'a> {
    /// Split `text` on the literal `separator`. The separator must not be empty.
    pub fn split(text: &'a str, separator: &str) -> Self {
        Self {
            lines: text.split(separator).collect(),
        }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }
}
