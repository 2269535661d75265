//! Message Bundle Module
//!
//! A container for the messages of a processed registry, as handed to
//! extraction tools.

use crate::ast::{MsgNode, Node, Registry};
use crate::i18n::message::Message;
use indexmap::IndexMap;

/// Messages collected from templates, keyed by id. The first occurrence of an
/// id wins; later occurrences only add their template to `sources`.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: IndexMap<u64, Message>,
    sources: IndexMap<u64, Vec<String>>,
}

impl MessageBundle {
    pub fn new() -> Self {
        MessageBundle::default()
    }

    /// Collect every processed message node of a registry. Messages of
    /// templates whose processing was aborted carry no id and are skipped.
    pub fn from_registry(registry: &Registry) -> Self {
        let mut bundle = MessageBundle::new();
        for template in &registry.templates {
            bundle.update_from_node(&template.name, &template.node);
        }
        bundle
    }

    fn update_from_node(&mut self, template: &str, node: &Node) {
        if let Node::Msg(msg) = node {
            if msg.processed {
                self.add(template, msg);
            }
            return;
        }
        for child in node.children() {
            self.update_from_node(template, child);
        }
    }

    pub fn add(&mut self, template: &str, msg: &MsgNode) {
        self.messages
            .entry(msg.id)
            .or_insert_with(|| message_from_node(msg));
        let sources = self.sources.entry(msg.id).or_default();
        if !sources.iter().any(|s| s == template) {
            sources.push(template.to_string());
        }
    }

    pub fn get(&self, id: u64) -> Option<&Message> {
        self.messages.get(&id)
    }

    pub fn get_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    /// Templates a message was found in, in registry order.
    pub fn sources(&self, id: u64) -> &[String] {
        self.sources.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The message record for a processed message node.
pub fn message_from_node(msg: &MsgNode) -> Message {
    Message {
        id: msg.id,
        meaning: msg.meaning.clone(),
        desc: msg.desc.clone(),
        parts: msg.parts.clone(),
    }
}
