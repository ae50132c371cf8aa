//! Structural checks over a layout tree.

use std::collections::HashSet;

use crate::node::{Node, Tree};
use crate::path::Path;
use crate::visitor::{walk_node, Visitor};

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Top level is not a single `root` node
    NotCanonical { top_level: usize },

    /// Two nodes share an id
    DuplicateId { id: String, path: Path },

    /// A non-container node has children
    LeafWithChildren { id: String, path: Path },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::NotCanonical { top_level } => {
                write!(f, "tree is not canonical ({} top-level nodes)", top_level)
            }
            Violation::DuplicateId { id, path } => write!(f, "duplicate id {} at {}", id, path),
            Violation::LeafWithChildren { id, path } => {
                write!(f, "non-container {} at {} has children", id, path)
            }
        }
    }
}

#[derive(Default)]
struct Validator {
    seen: HashSet<String>,
    violations: Vec<Violation>,
}

impl Visitor for Validator {
    fn visit_node(&mut self, node: &Node, path: &Path) {
        if !self.seen.insert(node.id.clone()) {
            self.violations.push(Violation::DuplicateId {
                id: node.id.clone(),
                path: path.clone(),
            });
        }
        if !node.container && !node.children.is_empty() {
            self.violations.push(Violation::LeafWithChildren {
                id: node.id.clone(),
                path: path.clone(),
            });
        }
        walk_node(self, node, path);
    }
}

/// Report every invariant the tree breaks (empty when valid)
pub fn validate(tree: &Tree) -> Vec<Violation> {
    let mut validator = Validator::default();
    if !tree.is_canonical() {
        validator.violations.push(Violation::NotCanonical {
            top_level: tree.len(),
        });
    }
    validator.visit_tree(tree);
    validator.violations
}
