//! Error types for document mutations.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors that can occur when mutating the document through the bridge.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DocumentError {
    /// The key does not name a live node (never existed, was removed, or
    /// was invalidated by a replace).
    #[error("unknown node key: {0}")]
    UnknownKey(SmolStr),
}

impl DocumentError {
    pub(crate) fn unknown_key(key: &crate::NodeKey) -> Self {
        Self::UnknownKey(SmolStr::new(key.as_str()))
    }
}
