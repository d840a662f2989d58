//! Selector normalization.
//!
//! The recorder reports element addresses in several encodings:
//!
//! - internal reference tokens (`aria-ref=e7`), valid only inside the live session
//! - structured accessor calls (`getByRole('button', { name: 'Submit' })`), possibly chained
//! - attribute-style tokens (`role=button`, `data-testid=login`)
//! - raw engine selectors (`#login`, `xpath=//form`)
//!
//! [`normalize`] folds all of them into a [`Locator`], which renders either as a
//! Ruby locator expression or as a selector string for the positional API.

use crate::literal::quote;
use lazy_static::lazy_static;
use regex::Regex;

/// Prefix of the recorder's session-scoped element references.
pub const INTERNAL_REFERENCE_PREFIX: &str = "aria-ref=";

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
    static ref ENTRY_METHOD: Regex = Regex::new(r"^(getBy[A-Z][A-Za-z]*|locator|frameLocator)$").unwrap();
    static ref WORD_BOUNDARY: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref ATTRIBUTE: Regex =
        Regex::new(r"(?s)^(role|text|label|placeholder|title|data-testid)=(.+)$").unwrap();
    // Numbers, keywords and interpolation-free regex literals; nothing else is emitted bare.
    static ref BARE_LITERAL: Regex = Regex::new(
        r"^(-?[0-9]+(\.[0-9]+)?|true|false|null|undefined|/([^/\\\n#]|\\[^\n#])+/[dgimsuvy]*)$"
    )
    .unwrap();
}

pub fn is_internal_reference(selector: &str) -> bool {
    selector.trim_start().starts_with(INTERNAL_REFERENCE_PREFIX)
}

/// Attribute-style selector families with a dedicated locator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Role,
    Text,
    Label,
    Placeholder,
    Title,
    TestId,
}

impl AttributeKind {
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "role" => Some(AttributeKind::Role),
            "text" => Some(AttributeKind::Text),
            "label" => Some(AttributeKind::Label),
            "placeholder" => Some(AttributeKind::Placeholder),
            "title" => Some(AttributeKind::Title),
            "data-testid" => Some(AttributeKind::TestId),
            _ => None,
        }
    }

    /// Maps a (snake_case) accessor method back to its attribute family.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "get_by_role" => Some(AttributeKind::Role),
            "get_by_text" => Some(AttributeKind::Text),
            "get_by_label" => Some(AttributeKind::Label),
            "get_by_placeholder" => Some(AttributeKind::Placeholder),
            "get_by_title" => Some(AttributeKind::Title),
            "get_by_test_id" => Some(AttributeKind::TestId),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            AttributeKind::Role => "role",
            AttributeKind::Text => "text",
            AttributeKind::Label => "label",
            AttributeKind::Placeholder => "placeholder",
            AttributeKind::Title => "title",
            AttributeKind::TestId => "data-testid",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            AttributeKind::Role => "get_by_role",
            AttributeKind::Text => "get_by_text",
            AttributeKind::Label => "get_by_label",
            AttributeKind::Placeholder => "get_by_placeholder",
            AttributeKind::Title => "get_by_title",
            AttributeKind::TestId => "get_by_test_id",
        }
    }
}

/// One argument of an accessor call, already unescaped from its JS source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Str(String),
    /// Object literal; key order is preserved.
    Options(Vec<(String, Argument)>),
    Array(Vec<Argument>),
    /// Numbers, booleans, regex literals.
    Literal(String),
}

impl Argument {
    fn render(&self) -> String {
        match self {
            Argument::Str(s) => quote(s),
            Argument::Literal(s) => match s.as_str() {
                "undefined" | "null" => "nil".to_string(),
                _ => s.clone(),
            },
            Argument::Array(items) => {
                let items: Vec<String> = items.iter().map(Argument::render).collect();
                format!("[{}]", items.join(", "))
            }
            Argument::Options(entries) if entries.is_empty() => "{}".to_string(),
            Argument::Options(entries) => format!("{{ {} }}", render_entries(entries)),
        }
    }
}

fn render_entries(entries: &[(String, Argument)]) -> String {
    entries
        .iter()
        .map(|(key, value)| {
            if IDENTIFIER.is_match(key) {
                format!("{}: {}", key, value.render())
            } else {
                format!("{}: {}", quote(key), value.render())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorCall {
    /// Ruby method name (snake_case).
    pub method: String,
    pub args: Vec<Argument>,
}

impl AccessorCall {
    /// Trailing object literals become keyword arguments; empty ones vanish.
    fn render(&self) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .filter_map(|arg| match arg {
                Argument::Options(entries) if entries.is_empty() => None,
                Argument::Options(entries) => Some(render_entries(entries)),
                other => Some(other.render()),
            })
            .collect();
        if args.is_empty() {
            self.method.clone()
        } else {
            format!("{}({})", self.method, args.join(", "))
        }
    }
}

/// Canonical element address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// No selector was supplied.
    Empty,
    Attribute {
        kind: AttributeKind,
        value: String,
    },
    /// Accessor chain; `fallback` is the selector string used by the positional API.
    Accessor {
        calls: Vec<AccessorCall>,
        fallback: String,
    },
    /// Unresolved internal reference token, passed through verbatim.
    Reference(String),
    Raw(String),
}

impl Locator {
    /// Ruby locator expression rooted at `page`.
    pub fn expression(&self) -> String {
        match self {
            Locator::Empty => format!("page.locator({})", quote("")),
            Locator::Attribute { kind, value } => {
                format!("page.{}({})", kind.method(), quote(value))
            }
            Locator::Accessor { calls, .. } => {
                let chain: Vec<String> = calls.iter().map(AccessorCall::render).collect();
                format!("page.{}", chain.join("."))
            }
            Locator::Reference(selector) | Locator::Raw(selector) => {
                format!("page.locator({})", quote(selector))
            }
        }
    }

    /// Unquoted selector-engine string.
    pub fn selector(&self) -> String {
        match self {
            Locator::Empty => String::new(),
            Locator::Attribute { kind, value } => format!("{}={}", kind.prefix(), value),
            Locator::Accessor { fallback, .. } => fallback.clone(),
            Locator::Reference(selector) | Locator::Raw(selector) => selector.clone(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Locator::Reference(_))
    }
}

/// Normalizes a raw selector, preferring a resolved structured accessor when one is given.
///
/// Never fails: anything unrecognized becomes [`Locator::Raw`].
pub fn normalize(selector: Option<&str>, resolved: Option<&str>) -> Locator {
    let raw = selector.map(str::trim).filter(|s| !s.is_empty());
    let resolved = resolved.map(str::trim).filter(|s| !s.is_empty());

    if let Some(resolved) = resolved {
        if let Some(calls) = parse_chain(resolved) {
            return from_calls(calls, raw.unwrap_or(resolved));
        }
        if let Some(locator) = attribute(resolved) {
            return locator;
        }
    }

    // A resolution that is neither chain nor attribute still beats nothing.
    match raw.or(resolved) {
        None => Locator::Empty,
        Some(selector) => classify(selector),
    }
}

fn classify(selector: &str) -> Locator {
    if is_internal_reference(selector) {
        return Locator::Reference(selector.to_string());
    }
    if let Some(locator) = attribute(selector) {
        return locator;
    }
    if let Some(calls) = parse_chain(selector) {
        return from_calls(calls, selector);
    }
    Locator::Raw(selector.to_string())
}

fn attribute(selector: &str) -> Option<Locator> {
    let caps = ATTRIBUTE.captures(selector)?;
    let kind = AttributeKind::from_prefix(&caps[1])?;
    Some(Locator::Attribute {
        kind,
        value: caps[2].to_string(),
    })
}

/// A lone `getByX("value")` collapses to its attribute form.
fn from_calls(calls: Vec<AccessorCall>, fallback: &str) -> Locator {
    if let [call] = calls.as_slice() {
        if let (Some(kind), [Argument::Str(value)]) =
            (AttributeKind::from_method(&call.method), call.args.as_slice())
        {
            return Locator::Attribute {
                kind,
                value: value.clone(),
            };
        }
    }
    Locator::Accessor {
        calls,
        fallback: fallback.to_string(),
    }
}

/// `getByTestId` -> `get_by_test_id`
pub fn to_snake_case(name: &str) -> String {
    WORD_BOUNDARY.replace_all(name, "${1}_${2}").to_lowercase()
}

fn parse_chain(input: &str) -> Option<Vec<AccessorCall>> {
    let input = input.trim();
    let mut rest = input.strip_prefix("page.").unwrap_or(input);
    let mut calls = Vec::new();

    loop {
        let open = rest.find('(')?;
        let name = rest[..open].trim();
        let valid_name = if calls.is_empty() {
            ENTRY_METHOD.is_match(name)
        } else {
            IDENTIFIER.is_match(name)
        };
        if !valid_name {
            return None;
        }

        let close = closing_paren(rest, open)?;
        let args = split_top_level(&rest[open + 1..close], ',')
            .into_iter()
            .filter(|arg| !arg.trim().is_empty())
            .map(parse_argument)
            .collect::<Option<Vec<_>>>()?;
        calls.push(AccessorCall {
            method: to_snake_case(name),
            args,
        });

        rest = rest[close + 1..].trim_start();
        if rest.is_empty() {
            return Some(calls);
        }
        rest = rest.strip_prefix('.')?.trim_start();
    }
}

fn parse_argument(token: &str) -> Option<Argument> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(inner) = strip_quoted(token) {
        return Some(Argument::Str(unescape_js(inner)));
    }

    if let Some(inner) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        let mut entries = Vec::new();
        for entry in split_top_level(inner, ',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let colon = *top_level_indices(entry, ':').first()?;
            let key = entry[..colon].trim();
            let key = strip_quoted(key).map(unescape_js).unwrap_or_else(|| key.to_string());
            if key.is_empty() {
                return None;
            }
            entries.push((key, parse_argument(&entry[colon + 1..])?));
        }
        return Some(Argument::Options(entries));
    }

    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let items = split_top_level(inner, ',')
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(parse_argument)
            .collect::<Option<Vec<_>>>()?;
        return Some(Argument::Array(items));
    }

    BARE_LITERAL
        .is_match(token)
        .then(|| Argument::Literal(token.to_string()))
}

/// Inner text of a single string literal spanning the whole token.
fn strip_quoted(token: &str) -> Option<&str> {
    let quote = token.chars().next().filter(|c| matches!(c, '\'' | '"' | '`'))?;
    let mut escaped = false;
    for (idx, c) in token.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return (idx + c.len_utf8() == token.len()).then(|| &token[1..idx]);
        }
    }
    None
}

fn unescape_js(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(marker @ ('x' | 'u')) => match hex_escape(chars.as_str(), marker) {
                Some((decoded, len)) => {
                    out.push(decoded);
                    chars = chars.as_str()[len..].chars();
                }
                None => {
                    out.push('\\');
                    out.push(marker);
                }
            },
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// `\xHH`, `\uHHHH` or `\u{H..}` following the backslash and marker; returns the
/// character and the number of bytes consumed after the marker.
fn hex_escape(rest: &str, marker: char) -> Option<(char, usize)> {
    let (digits, len) = match marker {
        'x' => (rest.get(..2)?, 2),
        _ if rest.starts_with('{') => {
            let end = rest.find('}')?;
            (&rest[1..end], end + 1)
        }
        _ => (rest.get(..4)?, 4),
    };
    if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let decoded = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
    Some((decoded, len))
}

/// Byte offsets of `target` outside quotes and brackets.
fn top_level_indices(s: &str, target: char) -> Vec<usize> {
    let mut found = Vec::new();
    let mut depth = 0i32;
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in s.char_indices() {
        if let Some(q) = in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => in_quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == target && depth == 0 => found.push(idx),
            _ => {}
        }
    }
    found
}

fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for idx in top_level_indices(s, separator) {
        parts.push(&s[start..idx]);
        start = idx + separator.len_utf8();
    }
    parts.push(&s[start..]);
    parts
}

/// Offset of the `)` matching the `(` at `open`.
fn closing_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in s[open..].char_indices() {
        if let Some(q) = in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => in_quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (c == ')').then_some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}
