//! Message Module
//!
//! The part model shared by both directions of the message pipeline, and the
//! tokenizer turning catalog strings back into parts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A `{NAME}` token whose interior is a valid placeholder name.
static PLACEHOLDER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Z][A-Z0-9_]*)\}").expect("valid placeholder token regex"));

static PLACEHOLDER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid placeholder name regex"));

/// One piece of a message: literal text or a named placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    RawText { text: String },
    Placeholder { name: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::RawText { text: text.into() }
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Part::Placeholder { name: name.into() }
    }
}

/// A localizable message, as extracted from a template or read from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u64,
    pub meaning: String,
    pub desc: String,
    pub parts: Vec<Part>,
}

impl Message {
    /// Build a message from a catalog string, where placeholders are written
    /// as `{NAME}`.
    pub fn new(id: u64, content: &str) -> Self {
        Message {
            id,
            meaning: String::new(),
            desc: String::new(),
            parts: tokenize(content),
        }
    }

    /// The export form of the message: raw text verbatim, placeholders braced.
    pub fn placeholder_string(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::RawText { text } => out.push_str(text),
                Part::Placeholder { name } => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
        out
    }

    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::Placeholder { name } => Some(name.as_str()),
            Part::RawText { .. } => None,
        })
    }
}

/// Split a flat string into parts. Brace spans that do not hold a valid
/// placeholder name stay in the surrounding text, braces included.
pub fn tokenize(content: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_TOKEN.captures_iter(content) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if token.start() > last {
            parts.push(Part::text(&content[last..token.start()]));
        }
        parts.push(Part::placeholder(name.as_str()));
        last = token.end();
    }
    if last < content.len() {
        parts.push(Part::text(&content[last..]));
    }
    parts
}

pub fn is_valid_placeholder_name(name: &str) -> bool {
    PLACEHOLDER_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braces_around_lowercase_stay_text() {
        assert_eq!(tokenize("a {b} c"), vec![Part::text("a {b} c")]);
    }

    #[test]
    fn test_nested_open_brace_before_token() {
        assert_eq!(
            tokenize("{{XXX}, ...}"),
            vec![Part::text("{"), Part::placeholder("XXX"), Part::text(", ...}")]
        );
    }

    #[test]
    fn test_placeholder_string_restores_input() {
        let msg = Message::new(7, "x{A}{B} {c}.");
        assert_eq!(msg.placeholder_string(), "x{A}{B} {c}.");
        assert_eq!(msg.placeholder_names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_placeholder_name_pattern() {
        assert!(is_valid_placeholder_name("EGGS_1"));
        assert!(is_valid_placeholder_name("X"));
        assert!(!is_valid_placeholder_name("_X"));
        assert!(!is_valid_placeholder_name("1X"));
        assert!(!is_valid_placeholder_name("Xy"));
        assert!(!is_valid_placeholder_name(""));
    }
}
