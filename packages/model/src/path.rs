//! # Path Addressing
//!
//! A [`Path`] locates a node by child indices, starting at the top-level
//! sequence. Paths are only meaningful against the snapshot they were
//! computed from; after a structural change they must be recomputed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::node::{Node, Tree};

/// Snapshot-relative sequence of child indices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last index (position within the parent's child list)
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the parent (empty for top-level nodes)
    pub fn parent(&self) -> Option<Path> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// Split into parent path and own index
    pub fn split_last(&self) -> Option<(Path, usize)> {
        let (last, rest) = self.0.split_last()?;
        Some((Path(rest.to_vec()), *last))
    }

    /// Path of the child at `index`
    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    /// True if `self` equals `ancestor` or lies beneath it
    pub fn starts_with(&self, ancestor: &Path) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    pub(crate) fn indices_mut(&mut self) -> &mut Vec<usize> {
        &mut self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}

/// Resolve `path` to the node it selects
pub fn resolve_path<'a>(tree: &'a Tree, path: &Path) -> Option<&'a Node> {
    let (parent, index) = path.split_last()?;
    resolve_child_list(tree, &parent)?
        .get(index)
        .map(|n| n.as_ref())
}

/// Resolve the child list that contains the node at `path`.
///
/// The node itself must exist; an empty path has no parent list.
pub fn resolve_parent_list<'a>(tree: &'a Tree, path: &Path) -> Option<&'a [Arc<Node>]> {
    let (parent, index) = path.split_last()?;
    let list = resolve_child_list(tree, &parent)?;
    if index < list.len() {
        Some(list)
    } else {
        None
    }
}

/// Resolve the child list owned by the node at `parent`, or the top-level
/// sequence for an empty path
pub fn resolve_child_list<'a>(tree: &'a Tree, parent: &Path) -> Option<&'a [Arc<Node>]> {
    let mut list: &[Arc<Node>] = &tree.nodes;
    for &index in parent.indices() {
        list = &list.get(index)?.children;
    }
    Some(list)
}

/// Depth-first pre-order search for the node with `id`
pub fn find_path_of(tree: &Tree, id: &str) -> Option<Path> {
    let mut path = Path::default();
    if search(&tree.nodes, id, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn search(list: &[Arc<Node>], id: &str, path: &mut Path) -> bool {
    for (index, node) in list.iter().enumerate() {
        path.indices_mut().push(index);
        if node.id == id || search(&node.children, id, path) {
            return true;
        }
        path.indices_mut().pop();
    }
    false
}
