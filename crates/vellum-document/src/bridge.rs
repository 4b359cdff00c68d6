//! The mutation contract toward the host's document engine, plus an
//! in-memory reference implementation.

use smol_str::format_smolstr;
use vellum_common::ImageDescriptor;

use crate::error::DocumentError;
use crate::node::{NodeKey, NodeSpec};

/// The only document-mutating operations the upload machines require.
///
/// All four are synchronous from the machines' point of view; the host
/// engine may internally batch or flush however it likes. Richer editing
/// (marks, block transforms, undo, selection) stays with the host engine.
pub trait DocumentBridge {
    /// Append a void image node at the current focus point.
    fn insert_image_node(&mut self, descriptor: &ImageDescriptor) -> NodeKey;

    /// Append a void video node at the current focus point.
    fn insert_video_node(&mut self, url: &str) -> NodeKey;

    /// Atomically substitute one node for another, preserving position.
    ///
    /// Invalidates `key`; the returned key names the new node.
    fn replace_node(&mut self, key: &NodeKey, spec: NodeSpec) -> Result<NodeKey, DocumentError>;

    /// Delete a node by key.
    fn remove_node(&mut self, key: &NodeKey) -> Result<(), DocumentError>;
}

impl<T: DocumentBridge + ?Sized> DocumentBridge for &mut T {
    fn insert_image_node(&mut self, descriptor: &ImageDescriptor) -> NodeKey {
        (**self).insert_image_node(descriptor)
    }

    fn insert_video_node(&mut self, url: &str) -> NodeKey {
        (**self).insert_video_node(url)
    }

    fn replace_node(&mut self, key: &NodeKey, spec: NodeSpec) -> Result<NodeKey, DocumentError> {
        (**self).replace_node(key, spec)
    }

    fn remove_node(&mut self, key: &NodeKey) -> Result<(), DocumentError> {
        (**self).remove_node(key)
    }
}

/// In-memory document: an ordered node list with a focus index.
///
/// Reference implementation of `DocumentBridge` for tests and for hosts
/// that have no engine of their own (a read-only viewer, say).
#[derive(Debug, Default)]
pub struct SimpleDocument {
    nodes: Vec<(NodeKey, NodeSpec)>,
    /// Insertion point; new nodes land here and push it forward.
    focus: usize,
    next_key: u64,
}

impl SimpleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn gen_key(&mut self) -> NodeKey {
        let key = NodeKey::new(format_smolstr!("node-{}", self.next_key));
        self.next_key += 1;
        key
    }

    fn position(&self, key: &NodeKey) -> Result<usize, DocumentError> {
        self.nodes
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| DocumentError::unknown_key(key))
    }

    fn insert(&mut self, spec: NodeSpec) -> NodeKey {
        let key = self.gen_key();
        self.nodes.insert(self.focus, (key.clone(), spec));
        self.focus += 1;
        key
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> &[(NodeKey, NodeSpec)] {
        &self.nodes
    }

    /// Look up a node's spec by key.
    pub fn get(&self, key: &NodeKey) -> Option<&NodeSpec> {
        self.nodes.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Move the insertion point. Clamped to the node count.
    pub fn set_focus(&mut self, focus: usize) {
        self.focus = focus.min(self.nodes.len());
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl DocumentBridge for SimpleDocument {
    fn insert_image_node(&mut self, descriptor: &ImageDescriptor) -> NodeKey {
        self.insert(NodeSpec::Image(descriptor.clone()))
    }

    fn insert_video_node(&mut self, url: &str) -> NodeKey {
        self.insert(NodeSpec::Video {
            url: url.to_string(),
        })
    }

    fn replace_node(&mut self, key: &NodeKey, spec: NodeSpec) -> Result<NodeKey, DocumentError> {
        let pos = self.position(key)?;
        let new_key = self.gen_key();
        self.nodes[pos] = (new_key.clone(), spec);
        Ok(new_key)
    }

    fn remove_node(&mut self, key: &NodeKey) -> Result<(), DocumentError> {
        let pos = self.position(key)?;
        self.nodes.remove(pos);
        if pos < self.focus {
            self.focus -= 1;
        }
        Ok(())
    }
}
