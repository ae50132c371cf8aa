//! # Undo/Redo History
//!
//! Linear snapshot history for one tree.
//!
//! ## Design
//!
//! - Every committed mutation records the tree state *before* it was applied
//! - Undo swaps the current tree for the most recent snapshot and keeps the
//!   current one for redo
//! - New commits clear the redo stack (no branching)
//! - Batches fold several commits into a single undo step
//!
//! Snapshots share structure with each other, so keeping many of them costs
//! roughly the size of what changed between them.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//!
//! let next = insert_at(&tree, &parent, 0, node);
//! history.record(tree.clone(), Some("Insert text"));
//! tree = next;
//!
//! if let Some(previous) = history.undo(&tree) {
//!     tree = previous;
//! }
//! ```

use pagecraft_model::Tree;

/// One undo (or redo) step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: Tree,
    pub description: Option<String>,
}

#[derive(Debug)]
struct Batch {
    description: Option<String>,
    recorded: bool,
}

/// Undo/redo stacks of whole-tree snapshots
#[derive(Debug)]
pub struct History {
    /// Snapshots before each commit (most recent last)
    past: Vec<HistoryEntry>,

    /// Snapshots that were undone (most recent last)
    future: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    current_batch: Option<Batch>,
}

impl History {
    /// Create a history with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record the snapshot taken just before a committed mutation
    pub fn record(&mut self, prior: Tree, description: Option<&str>) {
        // new action invalidates future
        self.future.clear();

        let description = match &mut self.current_batch {
            Some(batch) => {
                // only the state before the first commit of a batch matters
                if batch.recorded {
                    return;
                }
                batch.recorded = true;
                batch.description.clone().or(description.map(str::to_string))
            }
            None => description.map(str::to_string),
        };

        self.push_past(HistoryEntry {
            snapshot: prior,
            description,
        });
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push(entry);

        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.remove(0);
        }
    }

    /// Start a batch: commits until `end_batch` undo as one step
    pub fn begin_batch(&mut self, description: Option<&str>) {
        self.current_batch = Some(Batch {
            description: description.map(str::to_string),
            recorded: false,
        });
    }

    pub fn end_batch(&mut self) {
        self.current_batch = None;
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Step back: returns the snapshot to make current, keeping `current`
    /// for redo. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &Tree) -> Option<Tree> {
        let entry = self.past.pop()?;
        self.reopen_batch();
        self.future.push(HistoryEntry {
            snapshot: current.clone(),
            description: entry.description.clone(),
        });
        Some(entry.snapshot)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: &Tree) -> Option<Tree> {
        let entry = self.future.pop()?;
        self.reopen_batch();
        self.past.push(HistoryEntry {
            snapshot: current.clone(),
            description: entry.description.clone(),
        });
        Some(entry.snapshot)
    }

    /// After stepping inside a batch, the next commit starts a fresh entry
    fn reopen_batch(&mut self) {
        if let Some(batch) = &mut self.current_batch {
            batch.recorded = false;
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Drop all history (e.g. after the document is replaced)
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.current_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.past.last().and_then(|e| e.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.future.last().and_then(|e| e.description.as_deref())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::Node;

    fn tree(label: &str) -> Tree {
        Tree::with_root(Node::new("root", "root").with_display_name(label))
    }

    fn label(tree: &Tree) -> &str {
        &tree.nodes[0].display_name
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_swap_snapshots() {
        let mut history = History::new();
        let v0 = tree("v0");
        let v1 = tree("v1");

        history.record(v0.clone(), Some("Rename"));
        assert_eq!(history.undo_description(), Some("Rename"));

        let undone = history.undo(&v1).unwrap();
        assert_eq!(label(&undone), "v0");
        assert_eq!(history.redo_levels(), 1);
        assert_eq!(history.redo_description(), Some("Rename"));

        let redone = history.redo(&undone).unwrap();
        assert_eq!(label(&redone), "v1");
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::new();
        let current = tree("v0");
        assert!(history.undo(&current).is_none());
        assert!(history.redo(&current).is_none());
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = History::new();
        history.record(tree("v0"), None);
        history.undo(&tree("v1"));
        assert_eq!(history.redo_levels(), 1);

        history.record(tree("v0"), None);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_batched_records() {
        let mut history = History::new();

        history.begin_batch(Some("Restyle"));
        history.record(tree("v0"), Some("width"));
        history.record(tree("v1"), Some("height"));
        history.end_batch();

        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.undo_description(), Some("Restyle"));

        let undone = history.undo(&tree("v2")).unwrap();
        assert_eq!(label(&undone), "v0");
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut history = History::with_max_levels(2);
        for i in 0..3 {
            history.record(tree(&format!("v{}", i)), None);
        }
        assert_eq!(history.undo_levels(), 2);

        let undone = history.undo(&tree("v3")).unwrap();
        assert_eq!(label(&undone), "v2");
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record(tree("v0"), None);
        history.undo(&tree("v1"));
        history.record(tree("v0"), None);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_inside_batch() {
        let mut history = History::new();
        history.begin_batch(Some("Experiment"));
        history.record(tree("v0"), None);

        let undone = history.undo(&tree("v1")).unwrap();
        assert_eq!(label(&undone), "v0");
        assert!(history.can_redo());

        // next commit inside the same batch still lands in history
        history.record(tree("v0"), None);
        history.record(tree("v2"), None);
        history.end_batch();

        assert!(!history.can_redo());
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.undo_description(), Some("Experiment"));
        let undone = history.undo(&tree("v3")).unwrap();
        assert_eq!(label(&undone), "v0");
    }
}
