//! vellum-document: mutation contract toward the host-owned rich-text document.
//!
//! This crate provides:
//! - `NodeKey` / `NodeSpec` - opaque node identity and the void media nodes
//!   the upload machines construct
//! - `DocumentBridge` - the insert/replace/remove-by-key contract the host's
//!   document engine implements
//! - `HandleTable` - stable logical handles that keep resolving to the
//!   current physical key across replaces
//! - `SimpleDocument` - in-memory reference implementation of the bridge
//!
//! The document model itself (schema, selection, undo) belongs to the host's
//! editing engine; nothing here touches it beyond these four operations.

mod bridge;
mod error;
mod handle;
mod node;

pub use bridge::{DocumentBridge, SimpleDocument};
pub use error::DocumentError;
pub use handle::{HandleTable, NodeHandle};
pub use node::{NodeKey, NodeSpec};
