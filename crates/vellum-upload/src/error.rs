//! Error type for collaborator failures.

use smol_str::SmolStr;
use thiserror::Error;

/// A failure reported by the file upload collaborator.
///
/// The message is opaque to this core: it is captured verbatim into machine
/// context and handed to the hosting UI for display, never interpreted.
/// Hosts that key translations off error codes (`upload_file.image_too_large`
/// and friends) get the code through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(SmolStr);

impl StoreError {
    pub fn msg(message: impl Into<SmolStr>) -> Self {
        Self(message.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
