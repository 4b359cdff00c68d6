//! Node identity and the node specs the upload machines construct.

use core::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use vellum_common::ImageDescriptor;

/// Opaque, stable key naming a node in the host-owned document tree.
///
/// A key remains valid for the lifetime of the node it names; replacing a
/// node invalidates the old key, and any later operation on that node must
/// use the key returned by the replace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey(SmolStr);

impl NodeKey {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        Self(SmolStr::new(key))
    }
}

/// A void, non-editable media node carrying its data opaquely.
///
/// These are the only node shapes the upload machines ever construct; the
/// host engine owns every other node type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeSpec {
    /// Inline image, carrying the descriptor as node data.
    Image(ImageDescriptor),
    /// Embedded video by URL.
    Video { url: String },
}

impl NodeSpec {
    /// The image descriptor, when this is an image node.
    pub fn as_image(&self) -> Option<&ImageDescriptor> {
        match self {
            NodeSpec::Image(desc) => Some(desc),
            NodeSpec::Video { .. } => None,
        }
    }
}
