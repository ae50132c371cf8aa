//! # Structural Mutations
//!
//! Pure operations on layout trees. Every function takes a snapshot and
//! returns a new one; the input is never modified. Untouched subtrees are
//! shared between the two snapshots, and every node on the edited path is
//! a fresh copy.
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Parent path must resolve to a container (or be empty for the top level)
//! - Index is clamped to the child list, never an error
//!
//! ### Remove
//! - Splices the node (and its subtree) out and hands it back to the caller
//!
//! ### Move
//! - Destination is given in the coordinates of the tree *before* removal
//! - Dropping a node into itself or its own descendants is rejected
//! - All-or-nothing: a rejected move returns the original snapshot
//!
//! The total functions (`insert_at`, `remove_at`, `move_node`, ...) return
//! the input unchanged on rejection. The `try_*` forms report why.

use std::sync::Arc;

use pagecraft_model::{find_path_of, resolve_path, Node, NodeId, Path, Properties, Style, Tree};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Committable edits, as issued by the session and the placement protocol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a detached node into the child list at `parent`
    InsertNode {
        parent: Path,
        index: usize,
        node: Node,
    },

    /// Remove the node at `path` with its subtree
    RemoveNode { path: Path },

    /// Reparent/reorder the node at `from`
    MoveNode {
        from: Path,
        to_parent: Path,
        to_index: usize,
    },

    /// Merge a property patch into a node
    UpdateProperties { node_id: NodeId, patch: Properties },

    /// Merge a style patch into a node
    UpdateStyle { node_id: NodeId, patch: Style },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Path is empty")]
    EmptyPath,

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(Path),

    #[error("Node {0} cannot have children")]
    NotAContainer(NodeId),

    #[error("Cannot move a node into itself or its descendants")]
    CycleDetected,

    #[error("The root node cannot be removed")]
    CannotRemoveRoot,
}

impl Mutation {
    /// Apply to `tree`, producing the next snapshot
    pub fn apply(&self, tree: &Tree) -> Result<Tree, MutationError> {
        match self {
            Mutation::InsertNode { parent, index, node } => {
                try_insert_at(tree, parent, *index, node.clone())
            }
            Mutation::RemoveNode { path } => try_remove_at(tree, path).map(|(next, _)| next),
            Mutation::MoveNode {
                from,
                to_parent,
                to_index,
            } => try_move_node(tree, from, to_parent, *to_index),
            Mutation::UpdateProperties { node_id, patch } => {
                try_update_properties_by_id(tree, node_id, patch)
            }
            Mutation::UpdateStyle { node_id, patch } => try_update_style_by_id(tree, node_id, patch),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertNode { .. } => "insert",
            Mutation::RemoveNode { .. } => "remove",
            Mutation::MoveNode { .. } => "move",
            Mutation::UpdateProperties { .. } => "update-properties",
            Mutation::UpdateStyle { .. } => "update-style",
        }
    }
}

/// Insert `node` into the child list at `parent`, clamping `index`
pub fn try_insert_at(
    tree: &Tree,
    parent: &Path,
    index: usize,
    node: impl Into<Arc<Node>>,
) -> Result<Tree, MutationError> {
    if !parent.is_empty() {
        let target =
            resolve_path(tree, parent).ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
        if !target.container {
            return Err(MutationError::NotAContainer(target.id.clone()));
        }
    }

    let mut next = tree.clone();
    let list = next
        .child_list_mut(parent)
        .ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
    let index = index.min(list.len());
    list.insert(index, node.into());
    Ok(next)
}

pub fn insert_at(tree: &Tree, parent: &Path, index: usize, node: impl Into<Arc<Node>>) -> Tree {
    try_insert_at(tree, parent, index, node).unwrap_or_else(|e| rejected(tree, "insert", &e))
}

/// Splice out the node at `path`, returning the new tree and the detached node
pub fn try_remove_at(tree: &Tree, path: &Path) -> Result<(Tree, Arc<Node>), MutationError> {
    let (parent, index) = path.split_last().ok_or(MutationError::EmptyPath)?;

    let mut next = tree.clone();
    let list = next
        .child_list_mut(&parent)
        .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
    if index >= list.len() {
        return Err(MutationError::NodeNotFound(path.to_string()));
    }
    let removed = list.remove(index);
    Ok((next, removed))
}

pub fn remove_at(tree: &Tree, path: &Path) -> (Tree, Option<Arc<Node>>) {
    match try_remove_at(tree, path) {
        Ok((next, removed)) => (next, Some(removed)),
        Err(e) => (rejected(tree, "remove", &e), None),
    }
}

/// Translate a destination given in pre-removal coordinates into the
/// coordinates of the tree after the node at `from` has been spliced out
pub fn retarget(from: &Path, to_parent: &Path, to_index: usize) -> (Path, usize) {
    let Some((from_parent, removed)) = from.split_last() else {
        return (to_parent.clone(), to_index);
    };

    // same list: gaps after the removal point move down by one
    if *to_parent == from_parent {
        let index = if to_index > removed { to_index - 1 } else { to_index };
        return (to_parent.clone(), index);
    }

    // beneath a later sibling of the removed node
    let depth = from_parent.len();
    if to_parent.starts_with(&from_parent) && to_parent.len() > depth {
        let mut indices = to_parent.indices().to_vec();
        if indices[depth] > removed {
            indices[depth] -= 1;
        }
        return (Path::from(indices), to_index);
    }

    (to_parent.clone(), to_index)
}

/// Move the node at `from` into the child list at `to_parent`
pub fn try_move_node(
    tree: &Tree,
    from: &Path,
    to_parent: &Path,
    to_index: usize,
) -> Result<Tree, MutationError> {
    if from.is_empty() {
        return Err(MutationError::EmptyPath);
    }
    if to_parent.starts_with(from) {
        return Err(MutationError::CycleDetected);
    }

    let (detached, node) = try_remove_at(tree, from)?;
    let (to_parent, to_index) = retarget(from, to_parent, to_index);
    try_insert_at(&detached, &to_parent, to_index, node)
}

pub fn move_node(tree: &Tree, from: &Path, to_parent: &Path, to_index: usize) -> Tree {
    try_move_node(tree, from, to_parent, to_index).unwrap_or_else(|e| rejected(tree, "move", &e))
}

/// Merge `patch` into the properties of the node with `id`
pub fn try_update_properties_by_id(
    tree: &Tree,
    id: &str,
    patch: &Properties,
) -> Result<Tree, MutationError> {
    update_by_id(
        tree,
        id,
        |node| patch.iter().all(|(name, value)| node.properties.get(name) == Some(value)),
        |node| {
            node.properties
                .extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
        },
    )
}

pub fn update_properties_by_id(tree: &Tree, id: &str, patch: &Properties) -> Tree {
    try_update_properties_by_id(tree, id, patch)
        .unwrap_or_else(|e| rejected(tree, "update-properties", &e))
}

/// Merge `patch` into the style of the node with `id`
pub fn try_update_style_by_id(tree: &Tree, id: &str, patch: &Style) -> Result<Tree, MutationError> {
    update_by_id(
        tree,
        id,
        |node| patch.iter().all(|(name, value)| node.style.get(name) == Some(value)),
        |node| {
            node.style
                .extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
        },
    )
}

pub fn update_style_by_id(tree: &Tree, id: &str, patch: &Style) -> Tree {
    try_update_style_by_id(tree, id, patch).unwrap_or_else(|e| rejected(tree, "update-style", &e))
}

/// Copy-on-write edit of one node. When `is_noop` holds for the current node
/// the input snapshot is returned as-is.
fn update_by_id(
    tree: &Tree,
    id: &str,
    is_noop: impl Fn(&Node) -> bool,
    edit: impl FnOnce(&mut Node),
) -> Result<Tree, MutationError> {
    let not_found = || MutationError::NodeNotFound(id.to_string());
    let path = find_path_of(tree, id).ok_or_else(not_found)?;
    let current = resolve_path(tree, &path).ok_or_else(not_found)?;
    if is_noop(current) {
        return Ok(tree.clone());
    }

    let mut next = tree.clone();
    let node = next.node_mut(&path).ok_or_else(not_found)?;
    edit(node);
    Ok(next)
}

fn rejected(tree: &Tree, op: &str, error: &MutationError) -> Tree {
    debug!(op, error = %error, "Mutation rejected");
    tree.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::StyleValue;
    use serde_json::json;

    fn leaf(id: &str) -> Node {
        Node::new(id, "text")
    }

    fn container(id: &str, children: Vec<Node>) -> Node {
        Node::new(id, "section").as_container().with_children(children)
    }

    fn root(children: Vec<Node>) -> Tree {
        Tree::with_root(Node::new("root", "root").as_container().with_children(children))
    }

    fn child_ids(tree: &Tree, path: &Path) -> Vec<String> {
        let list = if path.is_empty() {
            &tree.nodes
        } else {
            &resolve_path(tree, path).unwrap().children
        };
        list.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveNode {
            from: Path::from([0, 1]),
            to_parent: Path::from([0, 0]),
            to_index: 2,
        };

        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json["type"], "moveNode");
        assert_eq!(json["from"], json!([0, 1]));

        let back: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(back, mutation);
    }

    #[test]
    fn test_insert_clamps_index() {
        let tree = root(vec![leaf("a")]);
        let next = insert_at(&tree, &Path::from([0]), 99, leaf("b"));
        assert_eq!(child_ids(&next, &Path::from([0])), vec!["a", "b"]);

        let next = insert_at(&next, &Path::from([0]), 0, leaf("c"));
        assert_eq!(child_ids(&next, &Path::from([0])), vec!["c", "a", "b"]);

        // input untouched
        assert_eq!(child_ids(&tree, &Path::from([0])), vec!["a"]);
    }

    #[test]
    fn test_insert_rejections() {
        let tree = root(vec![leaf("a")]);

        assert_eq!(
            try_insert_at(&tree, &Path::from([0, 4]), 0, leaf("x")),
            Err(MutationError::ParentNotFound(Path::from([0, 4])))
        );
        assert_eq!(
            try_insert_at(&tree, &Path::from([0, 0]), 0, leaf("x")),
            Err(MutationError::NotAContainer("a".to_string()))
        );
        assert_eq!(insert_at(&tree, &Path::from([0, 0]), 0, leaf("x")), tree);
    }

    #[test]
    fn test_insert_top_level() {
        let tree = root(vec![]);
        let next = insert_at(&tree, &Path::default(), 5, leaf("x"));
        assert_eq!(child_ids(&next, &Path::default()), vec!["root", "x"]);
    }

    #[test]
    fn test_remove_shifts_siblings() {
        let tree = root(vec![leaf("a"), leaf("b"), leaf("c")]);
        let (next, removed) = remove_at(&tree, &Path::from([0, 1]));

        assert_eq!(removed.unwrap().id, "b");
        assert_eq!(resolve_path(&next, &Path::from([0, 1])).unwrap().id, "c");
        assert_eq!(resolve_path(&tree, &Path::from([0, 1])).unwrap().id, "b");
    }

    #[test]
    fn test_remove_rejections() {
        let tree = root(vec![leaf("a")]);

        let (same, removed) = remove_at(&tree, &Path::default());
        assert!(removed.is_none());
        assert_eq!(same, tree);

        assert_eq!(
            try_remove_at(&tree, &Path::from([0, 3])).unwrap_err(),
            MutationError::NodeNotFound("[0, 3]".to_string())
        );
        assert!(remove_at(&tree, &Path::from([2, 0])).1.is_none());
    }

    #[test]
    fn test_retarget_rules() {
        // same list, later gap
        assert_eq!(
            retarget(&Path::from([0, 1]), &Path::from([0]), 3),
            (Path::from([0]), 2)
        );
        // same list, earlier gap
        assert_eq!(
            retarget(&Path::from([0, 1]), &Path::from([0]), 1),
            (Path::from([0]), 1)
        );
        // nested under a later sibling
        assert_eq!(
            retarget(&Path::from([0, 1]), &Path::from([0, 3, 0]), 0),
            (Path::from([0, 2, 0]), 0)
        );
        // nested under an earlier sibling
        assert_eq!(
            retarget(&Path::from([0, 2]), &Path::from([0, 1, 4]), 1),
            (Path::from([0, 1, 4]), 1)
        );
        // unrelated branch
        assert_eq!(
            retarget(&Path::from([0, 0, 2]), &Path::from([0, 1]), 0),
            (Path::from([0, 1]), 0)
        );
    }

    #[test]
    fn test_move_into_later_sibling() {
        let tree = root(vec![container("a", vec![]), container("b", vec![])]);
        let next = move_node(&tree, &Path::from([0, 0]), &Path::from([0, 1]), 0);

        assert_eq!(child_ids(&next, &Path::from([0])), vec!["b"]);
        assert_eq!(child_ids(&next, &Path::from([0, 0])), vec!["a"]);
    }

    #[test]
    fn test_move_within_same_list() {
        let tree = root(vec![leaf("a"), leaf("b"), leaf("c")]);

        let next = move_node(&tree, &Path::from([0, 0]), &Path::from([0]), 2);
        assert_eq!(child_ids(&next, &Path::from([0])), vec!["b", "a", "c"]);

        let next = move_node(&tree, &Path::from([0, 0]), &Path::from([0]), 3);
        assert_eq!(child_ids(&next, &Path::from([0])), vec!["b", "c", "a"]);

        let next = move_node(&tree, &Path::from([0, 2]), &Path::from([0]), 0);
        assert_eq!(child_ids(&next, &Path::from([0])), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_out_of_container() {
        let tree = root(vec![container("a", vec![leaf("a1"), leaf("a2")]), leaf("b")]);
        let next = move_node(&tree, &Path::from([0, 0, 1]), &Path::from([0]), 1);

        assert_eq!(child_ids(&next, &Path::from([0])), vec!["a", "a2", "b"]);
        assert_eq!(child_ids(&next, &Path::from([0, 0])), vec!["a1"]);
    }

    #[test]
    fn test_move_self_subtree_guard() {
        let tree = root(vec![container("a", vec![container("a1", vec![])])]);

        assert_eq!(
            try_move_node(&tree, &Path::from([0, 0]), &Path::from([0, 0]), 0),
            Err(MutationError::CycleDetected)
        );
        assert_eq!(
            try_move_node(&tree, &Path::from([0, 0]), &Path::from([0, 0, 0]), 0),
            Err(MutationError::CycleDetected)
        );
        assert_eq!(move_node(&tree, &Path::from([0, 0]), &Path::from([0, 0, 0]), 0), tree);
    }

    #[test]
    fn test_move_atomic_on_bad_target() {
        let tree = root(vec![leaf("a"), leaf("b")]);

        // target is a leaf: node must not be lost
        let next = move_node(&tree, &Path::from([0, 0]), &Path::from([0, 1]), 0);
        assert_eq!(next, tree);

        let next = move_node(&tree, &Path::from([0, 0]), &Path::from([0, 7]), 0);
        assert_eq!(next, tree);

        let next = move_node(&tree, &Path::from([0, 9]), &Path::from([0]), 0);
        assert_eq!(next, tree);
    }

    #[test]
    fn test_update_properties_shares_siblings() {
        let tree = root(vec![
            container("a", vec![leaf("a1")]),
            container("b", vec![leaf("b1")]),
        ]);
        let patch: Properties = [("content".to_string(), json!("Hello"))].into_iter().collect();

        let next = update_properties_by_id(&tree, "a1", &patch);

        assert_eq!(next.find("a1").unwrap().properties["content"], json!("Hello"));
        assert!(tree.find("a1").unwrap().properties.is_empty());
        assert!(!Arc::ptr_eq(&tree.nodes[0], &next.nodes[0]));
        assert!(!Arc::ptr_eq(&tree.nodes[0].children[0], &next.nodes[0].children[0]));
        assert!(Arc::ptr_eq(&tree.nodes[0].children[1], &next.nodes[0].children[1]));
    }

    #[test]
    fn test_update_noop_keeps_snapshot() {
        let tree = root(vec![leaf("a").with_property("content", "Hi")]);
        let patch: Properties = [("content".to_string(), json!("Hi"))].into_iter().collect();

        let next = update_properties_by_id(&tree, "a", &patch);
        assert!(Arc::ptr_eq(&tree.nodes[0], &next.nodes[0]));

        assert_eq!(
            try_update_properties_by_id(&tree, "ghost", &patch),
            Err(MutationError::NodeNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_update_style() {
        let tree = root(vec![leaf("a")]);
        let patch: Style = [("width".to_string(), StyleValue::with_unit(50, "%"))]
            .into_iter()
            .collect();

        let next = update_style_by_id(&tree, "a", &patch);
        assert_eq!(next.find("a").unwrap().style["width"].unit.as_deref(), Some("%"));
    }
}
