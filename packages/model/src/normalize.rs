//! # Normalization
//!
//! Collapses an arbitrary top-level sequence into canonical form: exactly one
//! node of kind `root` holding everything else.
//!
//! | Input                               | Output                                |
//! |-------------------------------------|---------------------------------------|
//! | `[]`                                | `[root[]]` (fresh root)               |
//! | `[A, B]` (first is not a root)      | `[root[A, B]]` (fresh root)           |
//! | `[root[X], A, B]`                   | `[root[X, A, B]]`                     |
//! | `[root[X]]`                         | unchanged                             |

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::ModelResult;
use crate::node::{Node, Tree};
use crate::registry::{ComponentRegistry, ROOT_KIND};

/// Normalize `tree`, failing only when a root must be synthesized and the
/// registry has no `root` descriptor
pub fn try_normalize(tree: &Tree, registry: &ComponentRegistry) -> ModelResult<Tree> {
    let Some(first) = tree.nodes.first() else {
        debug!("Synthesizing root for empty tree");
        let root = registry.create_node(ROOT_KIND)?;
        return Ok(Tree::with_root(root));
    };

    if !first.is_root() {
        debug!(top_level = tree.len(), "Wrapping top level in synthesized root");
        let mut root = registry.create_node(ROOT_KIND)?;
        root.children = tree.nodes.clone();
        return Ok(Tree::with_root(root));
    }

    if tree.len() > 1 {
        debug!(extra = tree.len() - 1, "Folding top-level siblings into root");
        let mut nodes = tree.nodes.clone();
        let extra = nodes.split_off(1);
        let root = Arc::make_mut(&mut nodes[0]);
        root.children.extend(extra);
        return Ok(Tree { nodes });
    }

    Ok(tree.clone())
}

/// Normalize `tree` into canonical form.
///
/// A registry without a `root` descriptor is a configuration error; the input
/// is then returned unchanged rather than inventing an inconsistent root.
pub fn normalize(tree: &Tree, registry: &ComponentRegistry) -> Tree {
    match try_normalize(tree, registry) {
        Ok(normalized) => normalized,
        Err(e) => {
            error!(error = %e, "Cannot normalize tree; registry has no root kind");
            tree.clone()
        }
    }
}

/// Re-derive `container` and `resizable` from the registry for every node of
/// a known kind. A `root` is always a container. Unchanged subtrees are
/// shared with the input.
pub fn sync_flags(tree: &Tree, registry: &ComponentRegistry) -> Tree {
    Tree {
        nodes: tree
            .nodes
            .iter()
            .map(|node| sync_node(node, registry))
            .collect(),
    }
}

fn sync_node(node: &Arc<Node>, registry: &ComponentRegistry) -> Arc<Node> {
    let children: Vec<Arc<Node>> = node
        .children
        .iter()
        .map(|child| sync_node(child, registry))
        .collect();

    let (container, resizable) = match registry.get(&node.kind) {
        Some(descriptor) => (descriptor.container || node.is_root(), descriptor.resizable),
        None => (node.container || node.is_root(), node.resizable),
    };

    let children_shared = children
        .iter()
        .zip(&node.children)
        .all(|(next, prev)| Arc::ptr_eq(next, prev));
    if children_shared && container == node.container && resizable == node.resizable {
        return Arc::clone(node);
    }

    debug!(id = %node.id, kind = %node.kind, container, resizable, "Synced node flags");
    let mut synced = node.as_ref().clone();
    synced.container = container;
    synced.resizable = resizable;
    synced.children = children;
    Arc::new(synced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn registry() -> ComponentRegistry {
        ComponentRegistry::builtin()
    }

    fn root(children: Vec<Node>) -> Node {
        Node::new("root", ROOT_KIND).as_container().with_children(children)
    }

    fn ids(tree: &Tree) -> Vec<String> {
        tree.nodes[0].children.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_empty_synthesizes_root() {
        let tree = normalize(&Tree::empty(), &registry());
        assert!(tree.is_canonical());
        assert!(tree.nodes[0].children.is_empty());
        assert!(tree.nodes[0].container);
    }

    #[test]
    fn test_missing_root_wraps_sequence() {
        let input = Tree::new([Node::new("a", "text"), Node::new("b", "text")]);
        let tree = normalize(&input, &registry());

        assert!(tree.is_canonical());
        assert_ne!(tree.nodes[0].id, "a");
        assert_eq!(ids(&tree), vec!["a", "b"]);
    }

    #[test]
    fn test_extra_siblings_folded_after_children() {
        let input = Tree::new([
            root(vec![Node::new("x", "text")]),
            Node::new("a", "text"),
            Node::new("b", "text"),
        ]);
        let tree = normalize(&input, &registry());

        assert!(tree.is_canonical());
        assert_eq!(tree.nodes[0].id, "root");
        assert_eq!(ids(&tree), vec!["x", "a", "b"]);
    }

    #[test]
    fn test_canonical_unchanged() {
        let input = Tree::with_root(root(vec![Node::new("x", "text")]));
        let tree = normalize(&input, &registry());
        assert_eq!(tree, input);
        assert!(Arc::ptr_eq(&tree.nodes[0], &input.nodes[0]));
    }

    #[test]
    fn test_idempotent() {
        let input = Tree::new([Node::new("a", "text")]);
        let once = normalize(&input, &registry());
        let twice = normalize(&once, &registry());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_root_descriptor_degrades() {
        let empty_registry = ComponentRegistry::new();
        let input = Tree::new([Node::new("a", "text")]);

        assert!(try_normalize(&input, &empty_registry).is_err());
        assert_eq!(normalize(&input, &empty_registry), input);

        // folding needs no registry lookup
        let foldable = Tree::new([root(vec![]), Node::new("a", "text")]);
        assert!(normalize(&foldable, &empty_registry).is_canonical());
    }

    #[test]
    fn test_sync_flags_restores_container() {
        let bare: Tree = serde_json::from_str(
            r#"[{ "id": "r1", "kind": "root", "children": [
                { "id": "s1", "kind": "section" },
                { "id": "i1", "kind": "image" },
                { "id": "x1", "kind": "widget" }
            ] }]"#,
        )
        .unwrap();
        assert!(!bare.nodes[0].container);

        let synced = sync_flags(&bare, &registry());
        let root = synced.root().unwrap();
        assert!(root.container);
        assert!(root.children[0].container);
        assert!(!root.children[1].container);
        assert!(root.children[1].resizable);
        // unknown kinds keep what they were stored with
        assert!(Arc::ptr_eq(&bare.nodes[0].children[2], &root.children[2]));
    }

    #[test]
    fn test_sync_flags_shares_synced_tree() {
        let tree = normalize(&Tree::empty(), &registry());
        let synced = sync_flags(&tree, &registry());
        assert!(Arc::ptr_eq(&tree.nodes[0], &synced.nodes[0]));
    }

    #[test]
    fn test_root_is_container_without_registry_entry() {
        let bare = Tree::with_root(Node::new("r", ROOT_KIND));
        let synced = sync_flags(&bare, &ComponentRegistry::new());
        assert!(synced.nodes[0].container);
    }
}
