//! Passes run over a loaded template registry.

pub mod message_ids;

pub use message_ids::{process_messages, process_messages_with, set_placeholders_and_id, ProcessResult};
