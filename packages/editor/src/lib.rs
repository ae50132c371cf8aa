//! # Pagecraft Editor
//!
//! Editing engine for page layouts built on `pagecraft-model`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: nodes, paths, registry, normalize    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: snapshots in, snapshots out         │
//! │  - Pure structural mutations                │
//! │  - Undo/redo history and clipboard          │
//! │  - Drag/drop placement protocol             │
//! │  - Document persistence with debounce       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are immutable**: every edit yields a new tree that shares
//!    untouched subtrees with the old one
//! 2. **Canonical after every commit**: the session normalizes what it stores
//! 3. **Rejections are silent to history**: a refused edit changes nothing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{EditSession, EditorConfig};
//!
//! let mut session = EditSession::with_config(tree, registry, &EditorConfig::default());
//!
//! let root = session.tree().root_path();
//! let id = session.insert_kind(&root, 0, "text")?;
//! session.select(&id);
//! session.copy()?;
//! session.paste()?;
//!
//! session.undo();
//! ```

mod clipboard;
mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod payload;
mod placement;
mod session;

pub use clipboard::Clipboard;
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use history::{History, HistoryEntry};
pub use mutations::{
    insert_at, move_node, remove_at, retarget, try_insert_at, try_move_node, try_remove_at,
    try_update_properties_by_id, try_update_style_by_id, update_properties_by_id,
    update_style_by_id, Mutation, MutationError,
};
pub use payload::{read_payload, write_payload, DataTransfer, DragPayload, PayloadError, PAYLOAD_MIME, TEXT_MIME};
pub use placement::{
    insertion_index, Axis, Bounds, DropTarget, PlacementCommit, PlacementSession, PlacementState,
    Point,
};
pub use session::EditSession;

// Re-export common model types for convenience
pub use pagecraft_model::{ComponentRegistry, Node, NodeId, Path, Tree};
