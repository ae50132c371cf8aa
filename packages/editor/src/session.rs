//! # Edit Session
//!
//! One editor's view of one tree: the current snapshot, its undo history,
//! the clipboard, the selection and the drag gesture in flight.
//!
//! Every committing operation goes through [`EditSession::commit`], which
//! applies the mutation, normalizes the result and records the prior
//! snapshot. A rejected mutation leaves tree and history untouched and is
//! reported as an error the caller is free to ignore.

use std::sync::Arc;

use pagecraft_model::{
    find_path_of, normalize, resolve_path, sync_flags, ComponentRegistry, Node, NodeId, Path,
    Properties, Style, Tree,
};
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::history::History;
use crate::mutations::{Mutation, MutationError};
use crate::placement::{PlacementCommit, PlacementSession};
use crate::EditorError;

pub struct EditSession {
    tree: Tree,
    history: History,
    clipboard: Clipboard,

    /// Selected node, held by id so it survives structural edits
    selection: Option<NodeId>,

    placement: PlacementSession,
    registry: Arc<ComponentRegistry>,

    /// Increments on every change of the current tree
    version: u64,
}

impl EditSession {
    pub fn new(tree: Tree, registry: Arc<ComponentRegistry>) -> Self {
        Self::with_config(tree, registry, &EditorConfig::default())
    }

    pub fn with_config(tree: Tree, registry: Arc<ComponentRegistry>, config: &EditorConfig) -> Self {
        let tree = normalize(&sync_flags(&tree, &registry), &registry);
        Self {
            tree,
            history: History::with_max_levels(config.history_limit),
            clipboard: Clipboard::new(),
            selection: None,
            placement: PlacementSession::new(),
            registry,
            version: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn placement(&self) -> &PlacementSession {
        &self.placement
    }

    pub fn placement_mut(&mut self) -> &mut PlacementSession {
        &mut self.placement
    }

    // ── Selection ──────────────────────────────────────────────────────

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Select by id; returns false (and clears) if the id is not in the tree
    pub fn select(&mut self, id: &str) -> bool {
        if self.tree.find(id).is_some() {
            self.selection = Some(id.to_string());
            true
        } else {
            self.selection = None;
            false
        }
    }

    pub fn select_path(&mut self, path: &Path) -> bool {
        self.selection = resolve_path(&self.tree, path).map(|n| n.id.clone());
        self.selection.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_path(&self) -> Option<Path> {
        self.selection
            .as_deref()
            .and_then(|id| find_path_of(&self.tree, id))
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.as_deref().and_then(|id| self.tree.find(id))
    }

    fn prune_selection(&mut self) {
        if let Some(id) = &self.selection {
            if self.tree.find(id).is_none() {
                self.selection = None;
            }
        }
    }

    // ── Commits ────────────────────────────────────────────────────────

    /// Apply `mutation` as one undoable step
    pub fn commit(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        if let Mutation::RemoveNode { path } = &mutation {
            if self.is_root_path(path) {
                warn!("Refusing to remove the root node");
                return Err(MutationError::CannotRemoveRoot.into());
            }
        }

        let next = match mutation.apply(&self.tree) {
            Ok(next) => normalize(&next, &self.registry),
            Err(e) => {
                warn!(op = mutation.name(), error = %e, "Mutation rejected");
                return Err(e.into());
            }
        };

        if next == self.tree {
            debug!(op = mutation.name(), "Mutation left tree unchanged");
            return Ok(());
        }

        let prior = std::mem::replace(&mut self.tree, next);
        self.history.record(prior, Some(mutation.name()));
        self.version += 1;
        self.prune_selection();

        debug!(op = mutation.name(), version = self.version, "Mutation committed");
        Ok(())
    }

    fn is_root_path(&self, path: &Path) -> bool {
        self.tree.is_canonical() && *path == self.tree.root_path()
    }

    /// Create a node of `kind` from the registry and insert it
    pub fn insert_kind(&mut self, parent: &Path, index: usize, kind: &str) -> Result<NodeId, EditorError> {
        let node = self.registry.create_node(kind)?;
        let id = node.id.clone();
        self.insert_node(parent, index, node)?;
        Ok(id)
    }

    pub fn insert_node(&mut self, parent: &Path, index: usize, node: Node) -> Result<(), EditorError> {
        self.commit(Mutation::InsertNode {
            parent: parent.clone(),
            index,
            node,
        })
    }

    pub fn remove(&mut self, path: &Path) -> Result<(), EditorError> {
        self.commit(Mutation::RemoveNode { path: path.clone() })
    }

    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        let path = self.selected_path().ok_or(EditorError::NothingSelected)?;
        self.remove(&path)
    }

    pub fn move_node(&mut self, from: &Path, to_parent: &Path, to_index: usize) -> Result<(), EditorError> {
        self.commit(Mutation::MoveNode {
            from: from.clone(),
            to_parent: to_parent.clone(),
            to_index,
        })
    }

    pub fn update_properties(&mut self, id: &str, patch: Properties) -> Result<(), EditorError> {
        self.commit(Mutation::UpdateProperties {
            node_id: id.to_string(),
            patch,
        })
    }

    pub fn update_style(&mut self, id: &str, patch: Style) -> Result<(), EditorError> {
        self.commit(Mutation::UpdateStyle {
            node_id: id.to_string(),
            patch,
        })
    }

    // ── Clipboard ──────────────────────────────────────────────────────

    /// Put a fresh-id clone of the selection on the clipboard
    pub fn copy(&mut self) -> Result<(), EditorError> {
        let node = self
            .selection
            .as_deref()
            .and_then(|id| self.tree.find(id))
            .ok_or(EditorError::NothingSelected)?;
        self.clipboard.copy(node);
        Ok(())
    }

    /// Copy, then remove the selection. The copy survives a rejected remove.
    pub fn cut(&mut self) -> Result<(), EditorError> {
        self.copy()?;
        self.delete_selected()
    }

    /// Insert a fresh clone of the clipboard: as last child of a selected
    /// container, after a selected leaf, or at the end of the top level
    pub fn paste(&mut self) -> Result<NodeId, EditorError> {
        let node = self.clipboard.paste().ok_or(EditorError::ClipboardEmpty)?;
        let id = node.id.clone();

        let (parent, index) = match self.selected_path() {
            Some(path) => match resolve_path(&self.tree, &path) {
                Some(selected) if selected.container => {
                    let len = selected.children.len();
                    (path, len)
                }
                _ => match path.split_last() {
                    Some((parent, index)) => (parent, index + 1),
                    None => (Path::default(), self.tree.len()),
                },
            },
            None => (Path::default(), self.tree.len()),
        };

        self.insert_node(&parent, index, node)?;
        self.selection = Some(id.clone());
        Ok(id)
    }

    // ── History ────────────────────────────────────────────────────────

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.tree) else {
            return false;
        };
        self.tree = previous;
        self.version += 1;
        self.prune_selection();
        debug!(version = self.version, "Undo");
        true
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.tree) else {
            return false;
        };
        self.tree = next;
        self.version += 1;
        self.prune_selection();
        debug!(version = self.version, "Redo");
        true
    }

    pub fn begin_batch(&mut self, description: &str) {
        self.history.begin_batch(Some(description));
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    /// Swap in a whole new tree (e.g. loaded from storage). History is reset.
    pub fn replace_tree(&mut self, tree: Tree) {
        self.tree = normalize(&sync_flags(&tree, &self.registry), &self.registry);
        self.history.clear();
        self.selection = None;
        self.placement.cancel();
        self.version += 1;
        info!(nodes = self.tree.node_count(), "Tree replaced");
    }

    // ── Placement ──────────────────────────────────────────────────────

    /// Finish the drag gesture. Returns whether anything was committed.
    pub fn release_placement(&mut self) -> Result<bool, EditorError> {
        match self.placement.release() {
            Some(commit) => {
                self.apply_placement(commit)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn apply_placement(&mut self, commit: PlacementCommit) -> Result<(), EditorError> {
        match commit {
            PlacementCommit::Insert {
                parent,
                index,
                component_kind,
            } => {
                let id = self.insert_kind(&parent, index, &component_kind)?;
                self.selection = Some(id);
                Ok(())
            }
            PlacementCommit::Move {
                from,
                to_parent,
                to_index,
            } => self.move_node(&from, &to_parent, to_index),
        }
    }
}
