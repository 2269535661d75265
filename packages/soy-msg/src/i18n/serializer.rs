//! Serializer Module
//!
//! Flattens a message body into its export string, its id string and its
//! part sequence, using the names from the placeholder pass.

use crate::ast::{MsgChild, MsgNode};
use crate::error::{MsgError, Result};
use crate::i18n::message::Part;
use crate::i18n::placeholder::{assign_placeholder_names, PlaceholderNames};
use indexmap::IndexMap;

/// Everything derived from one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedMsg {
    /// Export form, e.g. `{NAME} took a trip to {DESTINATION}.`
    pub placeholder_string: String,
    /// The exact string the message id is computed from.
    pub id_string: String,
    pub parts: Vec<Part>,
    pub placeholders: IndexMap<String, String>,
}

pub fn serialize_msg(body: &[MsgChild]) -> Result<SerializedMsg> {
    let names = assign_placeholder_names(body)?;

    let mut placeholder_string = String::new();
    Serializer::new(&names).write_body(body, true, &mut placeholder_string)?;

    // Plain messages are fingerprinted with bare placeholder names. Once a
    // plural or select is involved, every placeholder keeps its braces.
    let id_braces = body
        .iter()
        .any(|child| matches!(child, MsgChild::Plural(_) | MsgChild::Select(_)));
    let mut id_string = String::new();
    Serializer::new(&names).write_body(body, id_braces, &mut id_string)?;

    let mut parts = PartsWriter::default();
    Serializer::new(&names).write_body(body, true, &mut parts)?;

    Ok(SerializedMsg {
        placeholder_string,
        id_string,
        parts: parts.finish(),
        placeholders: names.into_sources(),
    })
}

/// The export form of a message node's body.
pub fn placeholder_string(msg: &MsgNode) -> Result<String> {
    Ok(serialize_msg(&msg.body)?.placeholder_string)
}

/// The string a message node's id is computed from.
pub fn id_string(msg: &MsgNode) -> Result<String> {
    Ok(serialize_msg(&msg.body)?.id_string)
}

trait MsgWriter {
    fn text(&mut self, text: &str);
    fn placeholder(&mut self, name: &str, braces: bool);
}

impl MsgWriter for String {
    fn text(&mut self, text: &str) {
        self.push_str(text);
    }

    fn placeholder(&mut self, name: &str, braces: bool) {
        if braces {
            self.push('{');
            self.push_str(name);
            self.push('}');
        } else {
            self.push_str(name);
        }
    }
}

/// Builds the part sequence, merging adjacent text.
#[derive(Default)]
struct PartsWriter {
    parts: Vec<Part>,
    text: String,
}

impl PartsWriter {
    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.parts.push(Part::text(std::mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Vec<Part> {
        self.flush();
        self.parts
    }
}

impl MsgWriter for PartsWriter {
    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn placeholder(&mut self, name: &str, _braces: bool) {
        self.flush();
        self.parts.push(Part::placeholder(name));
    }
}

/// Walks a body in the same order the placeholder pass numbered its sites.
struct Serializer<'a> {
    names: &'a PlaceholderNames,
    next: usize,
}

impl<'a> Serializer<'a> {
    fn new(names: &'a PlaceholderNames) -> Self {
        Serializer { names, next: 0 }
    }

    fn next_name(&mut self) -> Result<&'a str> {
        let index = self.next;
        self.next += 1;
        self.names
            .get(index)
            .ok_or(MsgError::UnassignedPlaceholder { index })
    }

    fn write_body<W: MsgWriter>(&mut self, body: &[MsgChild], braces: bool, out: &mut W) -> Result<()> {
        for child in body {
            match child {
                MsgChild::RawText(text) => out.text(text),
                MsgChild::Print(_) | MsgChild::Call(_) | MsgChild::Markup(_) => {
                    let name = self.next_name()?;
                    out.placeholder(name, braces);
                }
                MsgChild::Plural(plural) => {
                    let name = self.next_name()?;
                    out.text(&format!("{{{},plural,", name));
                    if plural.offset != 0 {
                        out.text(&format!("offset:{} ", plural.offset));
                    }
                    for case in &plural.cases {
                        out.text(&format!("={}{{", case.value));
                        self.write_body(&case.body, true, out)?;
                        out.text("}");
                    }
                    out.text("other{");
                    self.write_body(&plural.default, true, out)?;
                    out.text("}}");
                }
                MsgChild::Select(select) => {
                    let name = self.next_name()?;
                    out.text(&format!("{{{},select,", name));
                    for case in &select.cases {
                        out.text(&case.value);
                        out.text("{");
                        self.write_body(&case.body, true, out)?;
                        out.text("}");
                    }
                    out.text("other{");
                    self.write_body(&select.default, true, out)?;
                    out.text("}}");
                }
            }
        }
        Ok(())
    }
}
