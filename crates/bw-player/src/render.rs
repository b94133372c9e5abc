//! Passage template rendering.

use crate::variables::VariableMap;

/// Substitute `{{name}}` placeholders with current variable values.
///
/// Whitespace inside the braces is ignored. Unknown names render as empty
/// text; an unterminated `{{` is kept as written.
pub fn render_content(content: &str, variables: &VariableMap) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let name = after[..close].trim();
                if let Some(value) = variables.get(name) {
                    out.push_str(&value.to_string());
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
