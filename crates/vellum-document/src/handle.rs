//! Stable logical handles over unstable node keys.
//!
//! Replacing a node invalidates its key, but an edit session that started
//! before the replace still needs to target "that image". A `NodeHandle`
//! names the node logically; the `HandleTable` maps it to whatever the
//! current physical key is, rebound on every replace. Resolution happens
//! at the moment an operation runs, never at the moment a session starts.

use std::collections::HashMap;

use crate::bridge::DocumentBridge;
use crate::error::DocumentError;
use crate::node::{NodeKey, NodeSpec};

/// Stable logical identity of a tracked node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

/// Maps logical handles to current physical node keys.
#[derive(Debug, Default)]
pub struct HandleTable {
    entries: HashMap<NodeHandle, NodeKey>,
    next: u64,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a node, returning its logical handle.
    pub fn track(&mut self, key: NodeKey) -> NodeHandle {
        let handle = NodeHandle(self.next);
        self.next += 1;
        self.entries.insert(handle, key);
        handle
    }

    /// The current physical key for a handle, if the node is still tracked.
    pub fn resolve(&self, handle: NodeHandle) -> Option<&NodeKey> {
        self.entries.get(&handle)
    }

    /// Point a handle at a new physical key (after an external replace).
    pub fn rebind(&mut self, handle: NodeHandle, key: NodeKey) {
        self.entries.insert(handle, key);
    }

    /// Stop tracking a handle (the node was removed).
    pub fn forget(&mut self, handle: NodeHandle) {
        self.entries.remove(&handle);
    }

    /// Replace the node a handle currently names, rebinding the handle to
    /// the key the replace produced.
    ///
    /// Returns `Ok(None)` when the handle no longer resolves - the node was
    /// removed while the caller was busy, and there is nothing to replace.
    pub fn replace_tracked<D: DocumentBridge>(
        &mut self,
        doc: &mut D,
        handle: NodeHandle,
        spec: NodeSpec,
    ) -> Result<Option<NodeKey>, DocumentError> {
        let Some(key) = self.entries.get(&handle).cloned() else {
            tracing::warn!(target: "vellum::document", ?handle, "replace target vanished");
            return Ok(None);
        };

        let new_key = doc.replace_node(&key, spec)?;
        tracing::debug!(
            target: "vellum::document",
            ?handle,
            old_key = %key,
            new_key = %new_key,
            "rebound handle after replace"
        );
        self.entries.insert(handle, new_key.clone());
        Ok(Some(new_key))
    }
}
