//! Message Ids Pass
//!
//! Computes the placeholder names and id of every `{msg}` node in a registry
//! and stores them on the node.

use crate::ast::{MsgNode, Node, Registry, Template};
use crate::config::ProcessOptions;
use crate::error::{Result, TemplateError};
use crate::i18n::digest::compute_msg_id;
use crate::i18n::serializer::serialize_msg;
use rayon::prelude::*;

/// Outcome of a pass over a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Number of message nodes processed in templates that completed.
    pub messages: usize,
    /// One entry per template whose processing was aborted.
    pub errors: Vec<TemplateError>,
}

impl ProcessResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Process every template of the registry, in registry order.
pub fn process_messages(registry: &mut Registry) -> ProcessResult {
    process_messages_with(registry, &ProcessOptions::default())
}

pub fn process_messages_with(registry: &mut Registry, options: &ProcessOptions) -> ProcessResult {
    let outcomes: Vec<std::result::Result<usize, TemplateError>> = if options.parallel {
        registry
            .templates
            .par_iter_mut()
            .map(process_template)
            .collect()
    } else {
        registry.templates.iter_mut().map(process_template).collect()
    };

    let mut result = ProcessResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(count) => result.messages += count,
            Err(error) => result.errors.push(error),
        }
    }
    tracing::debug!(
        templates = registry.templates.len(),
        messages = result.messages,
        failed = result.errors.len(),
        "processed messages"
    );
    result
}

/// A failing message aborts its template: no message of that template keeps
/// computed values, including the ones processed before the failure.
fn process_template(template: &mut Template) -> std::result::Result<usize, TemplateError> {
    let mut count = 0;
    if let Err(error) = process_node(&mut template.node, &mut count) {
        tracing::warn!(template = %template.name, %error, "aborting message processing");
        reset_node(&mut template.node);
        return Err(TemplateError::new(template.name.clone(), error));
    }
    Ok(count)
}

fn reset_node(node: &mut Node) {
    if let Node::Msg(msg) = node {
        msg.reset();
        return;
    }
    for child in node.children_mut() {
        reset_node(child);
    }
}

fn process_node(node: &mut Node, count: &mut usize) -> Result<()> {
    if let Node::Msg(msg) = node {
        set_placeholders_and_id(msg)?;
        *count += 1;
        return Ok(());
    }
    for child in node.children_mut() {
        process_node(child, count)?;
    }
    Ok(())
}

/// Compute and store the id, parts and placeholder map of one message node.
pub fn set_placeholders_and_id(msg: &mut MsgNode) -> Result<()> {
    let serialized = serialize_msg(&msg.body)?;
    msg.id = compute_msg_id(&serialized.id_string, &msg.meaning);
    msg.parts = serialized.parts;
    msg.placeholders = serialized.placeholders;
    msg.processed = true;
    tracing::trace!(id = msg.id, content = %serialized.placeholder_string, "message id");
    Ok(())
}
