use crate::node::{Node, Tree};
use crate::path::Path;

/// Visitor pattern for traversing layout trees immutably
///
/// Default implementations walk the entire tree in depth-first pre-order.
/// Override `visit_node` to act on each node; call [`walk_node`] from the
/// override to keep descending.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, tree: &Tree) {
        walk_tree(self, tree);
    }

    fn visit_node(&mut self, node: &Node, path: &Path) {
        walk_node(self, node, path);
    }
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &Tree) {
    for (index, node) in tree.nodes.iter().enumerate() {
        visitor.visit_node(node, &Path::from([index]));
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node, path: &Path) {
    for (index, child) in node.children.iter().enumerate() {
        visitor.visit_node(child, &path.child(index));
    }
}

/// Collects every node id in pre-order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_node(&mut self, node: &Node, path: &Path) {
        self.ids.push(node.id.clone());
        walk_node(self, node, path);
    }
}

/// All ids in `tree`, pre-order
pub fn collect_ids(tree: &Tree) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_tree(tree);
    collector.ids
}

/// All ids in the subtree rooted at `node`, including its own
pub fn collect_subtree_ids(node: &Node) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_node(node, &Path::default());
    collector.ids
}
