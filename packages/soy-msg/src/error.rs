//! Error types for the message passes.

use thiserror::Error;

/// A message body the parser should never have produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsgError {
    #[error("plural case {value} appears more than once")]
    DuplicatePluralCase { value: u32 },

    #[error("select case '{value}' appears more than once")]
    DuplicateSelectCase { value: String },

    #[error("invalid select case '{value}'")]
    InvalidSelectCase { value: String },

    #[error("phname '{phname}' does not yield a valid placeholder name")]
    InvalidPhname { phname: String },

    #[error("internal error: no placeholder name for site {index}")]
    UnassignedPlaceholder { index: usize },
}

/// A message failure, attributed to the template that was being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("template '{template}': {error}")]
pub struct TemplateError {
    pub template: String,
    #[source]
    pub error: MsgError,
}

impl TemplateError {
    pub fn new(template: impl Into<String>, error: MsgError) -> Self {
        Self {
            template: template.into(),
            error,
        }
    }
}

pub type Result<T> = std::result::Result<T, MsgError>;
