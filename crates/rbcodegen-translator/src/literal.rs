//! Ruby literal rendering.

/// Escapes a value for insertion into a Ruby double-quoted literal.
///
/// Besides `"` this covers backslashes, control characters and the
/// interpolation openers (`#{`, `#$`, `#@`).
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a Ruby double-quoted string literal.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Renders a Ruby single-quoted string literal.
pub fn quote_single(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Renders a Ruby array of double-quoted strings.
pub fn quote_list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}
