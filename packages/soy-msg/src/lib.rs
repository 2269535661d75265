#![deny(clippy::all)]

//! Message ids and placeholder maps for Soy `{msg}` nodes.
//!
//! The ids are the ones the other Soy implementations and their extraction
//! tools compute, so translations keyed by id carry over between them.

pub mod ast;
mod config;
mod error;
pub mod i18n;
pub mod passes;

// Re-exports
pub use config::ProcessOptions;
pub use error::{MsgError, Result, TemplateError};
pub use i18n::{compute_msg_id, fingerprint, tokenize, Message, MessageBundle, Part};
pub use passes::{process_messages, process_messages_with, set_placeholders_and_id, ProcessResult};
