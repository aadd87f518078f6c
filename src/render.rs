//! Output rendering. Each output shape keeps its own format: a joined message
//! is printed as plain text, a token sequence as a one-line JSON array.

use crate::extract::{Extracted, OutputShape};
use crate::profile::Profile;

pub fn render_extracted(out: &Extracted) -> anyhow::Result<String> {
    let mut text = match out {
        Extracted::Message(message) => message.clone(),
        Extracted::Tokens(tokens) => serde_json::to_string(tokens)?,
    };
    text.push('\n');
    Ok(text)
}

/// One line per profile: name, shape, offset, anchor phrase.
pub fn render_profile_table(profiles: &[Profile]) -> String {
    let width = profiles.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for p in profiles {
        let shape = match p.extractor.shape {
            OutputShape::Joined => "joined",
            OutputShape::Tokens => "tokens",
        };
        out.push_str(&format!(
            "{:<width$}  {:<6}  +{}  {:?}\n",
            p.name,
            shape,
            p.extractor.anchor.offset,
            p.extractor.anchor.phrase,
            width = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_renders_as_plain_line() {
        let out = Extracted::Message("foo bar VAL123".to_string());
        assert_eq!(render_extracted(&out).unwrap(), "foo bar VAL123\n");
    }

    #[test]
    fn empty_message_renders_as_empty_line() {
        let out = Extracted::Message(String::new());
        assert_eq!(render_extracted(&out).unwrap(), "\n");
    }

    #[test]
    fn tokens_render_as_json_array() {
        let out = Extracted::Tokens(vec!["result:".to_string(), "\"OK\"".to_string()]);
        assert_eq!(render_extracted(&out).unwrap(), "[\"result:\",\"\\\"OK\\\"\"]\n");
        assert_eq!(render_extracted(&Extracted::Tokens(vec![])).unwrap(), "[]\n");
    }

    #[test]
    fn profile_table_lists_builtins() {
        let table = render_profile_table(&builtin::all());
        assert_eq!(
            table,
            "error-message  joined  +3  \"Execute get_vm_tag.py script\"\n\
             json-result    tokens  +3  \"Output result as JSON\"\n"
        );
    }
}
