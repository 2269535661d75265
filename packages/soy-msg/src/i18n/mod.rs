//! I18n Module
//!
//! Message identity and placeholder maps for `{msg}` nodes.

pub mod digest;
pub mod message;
pub mod message_bundle;
pub mod placeholder;
pub mod serializer;

// Re-export commonly used items
pub use digest::{compute_msg_id, fingerprint};
pub use message::{tokenize, Message, Part};
pub use message_bundle::MessageBundle;
pub use placeholder::{assign_placeholder_names, PlaceholderNames};
pub use serializer::{id_string, placeholder_string, serialize_msg, SerializedMsg};
