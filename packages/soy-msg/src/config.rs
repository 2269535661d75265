//! Options for the message passes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    /// Process templates on the rayon thread pool.
    pub parallel: bool,
}

impl ProcessOptions {
    pub fn parallel() -> Self {
        ProcessOptions { parallel: true }
    }
}
