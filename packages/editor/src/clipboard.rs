use pagecraft_model::{deep_clone_with_fresh_ids, Node};

/// Single detached node held outside the tree.
///
/// The stored node is already a fresh-id clone of what was copied, and every
/// paste clones it again, so repeated pastes never share ids.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<Node>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard content with a clone of `node`
    pub fn copy(&mut self, node: &Node) {
        self.slot = Some(deep_clone_with_fresh_ids(node));
    }

    /// A fresh clone of the content, ready to insert
    pub fn paste(&self) -> Option<Node> {
        self.slot.as_ref().map(deep_clone_with_fresh_ids)
    }

    pub fn contents(&self) -> Option<&Node> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
