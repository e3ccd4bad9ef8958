//! Correlation tokens for log tracing
//!
//! Every public operation is tagged with a [`Mark`] so that the start/end,
//! retry, and failure log entries of one logical call can be correlated.
//! Callers may pass their own mark to tie the client's logs into a wider
//! trace; when they pass `None` the facade generates a fresh one.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier attached to one logical operation.
///
/// Has no effect on behavior, only on traceability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark(Uuid);

impl Mark {
    /// Generate a fresh mark.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Mark {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
