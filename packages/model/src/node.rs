//! # Layout Nodes
//!
//! The tree is an ordered forest of [`Node`]s. Children are held behind
//! [`Arc`] so that a new snapshot shares every untouched subtree with the
//! snapshot it was derived from. Writers go through [`Arc::make_mut`], which
//! copies only the nodes on the path being edited.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::Path;
use crate::registry::ROOT_KIND;

/// Opaque, process-unique node identifier
pub type NodeId = String;

/// Property name → value, shape defined per component kind
pub type Properties = BTreeMap<String, Value>;

/// Style attribute name → value (with optional unit)
pub type Style = BTreeMap<String, StyleValue>;

/// A single style attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleValue {
    pub value: Value,

    /// Unit tag for numeric attributes ("px", "%", "rem", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl StyleValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            unit: None,
        }
    }

    pub fn with_unit(value: impl Into<Value>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: Some(unit.into()),
        }
    }
}

/// One visual element of the layout tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    /// Component kind identifier (looked up in the registry)
    pub kind: String,

    #[serde(default)]
    pub display_name: String,

    /// May hold children
    #[serde(default)]
    pub container: bool,

    /// May be resized interactively
    #[serde(default)]
    pub resizable: bool,

    #[serde(default)]
    pub properties: Properties,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

impl Node {
    /// Create a leaf node with no properties or style
    pub fn new(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            id: id.into(),
            display_name: kind.clone(),
            kind,
            container: false,
            resizable: false,
            properties: Properties::new(),
            style: Style::new(),
            children: Vec::new(),
        }
    }

    /// Mark this node as able to hold children
    pub fn as_container(mut self) -> Self {
        self.container = true;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: StyleValue) -> Self {
        self.style.insert(name.into(), value);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn is_root(&self) -> bool {
        self.kind == ROOT_KIND
    }

    /// Find a descendant (or self) by id
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

/// The top-level ordered sequence of nodes for one (route, viewport) pair.
///
/// Canonical form is a single `root` node; anything else is transient and is
/// folded back by [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub nodes: Vec<Arc<Node>>,
}

impl Tree {
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A canonical tree holding just `root`
    pub fn with_root(root: Node) -> Self {
        Self::new([root])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Exactly one top-level node, of kind `root`
    pub fn is_canonical(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].is_root()
    }

    /// The canonical root, if the tree is in canonical form
    pub fn root(&self) -> Option<&Node> {
        if self.is_canonical() {
            self.nodes.first().map(|n| n.as_ref())
        } else {
            None
        }
    }

    /// Path of the canonical root (`[0]`)
    pub fn root_path(&self) -> Path {
        Path::from([0])
    }

    /// Find a node by id anywhere in the tree
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find_map(|n| n.find(id))
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(|n| n.subtree_len()).sum()
    }

    /// Mutable access to the child list selected by `parent` (the top-level
    /// sequence for an empty path). Nodes along the way are unshared.
    pub fn child_list_mut(&mut self, parent: &Path) -> Option<&mut Vec<Arc<Node>>> {
        let mut list = &mut self.nodes;
        for &index in parent.indices() {
            let node = Arc::make_mut(list.get_mut(index)?);
            list = &mut node.children;
        }
        Some(list)
    }

    /// Mutable access to the node at `path`. Nodes along the way are unshared.
    pub fn node_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (parent, index) = path.split_last()?;
        let list = self.child_list_mut(&parent)?;
        list.get_mut(index).map(Arc::make_mut)
    }
}
