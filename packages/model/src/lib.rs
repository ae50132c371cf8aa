//! # Pagecraft Model
//!
//! Data model for the page-layout editor: an ordered tree of visual nodes,
//! position-based paths into it, and the rule that keeps the top level in
//! canonical single-root form.
//!
//! ```text
//! Tree ─┬─ root ─┬─ section ─┬─ text
//!       │        │           └─ image
//!       │        └─ button
//!       └─ (nothing else: canonical form)
//! ```
//!
//! Snapshots share untouched subtrees through `Arc`, so cloning a [`Tree`]
//! is cheap and edits copy only the nodes on the edited path.

pub mod document;
pub mod error;
pub mod id_generator;
pub mod node;
pub mod normalize;
pub mod path;
pub mod registry;
pub mod validate;
pub mod visitor;

pub use document::{PageBucket, PageDocument, PageMetadata, Viewport, ViewportTrees};
pub use error::{ModelError, ModelResult};
pub use id_generator::{deep_clone_with_fresh_ids, new_id, IdGenerator};
pub use node::{Node, NodeId, Properties, Style, StyleValue, Tree};
pub use normalize::{normalize, sync_flags, try_normalize};
pub use path::{find_path_of, resolve_child_list, resolve_parent_list, resolve_path, Path};
pub use registry::{ComponentDescriptor, ComponentRegistry, StyleAttribute, ROOT_KIND};
pub use validate::{validate, Violation};
pub use visitor::{collect_ids, collect_subtree_ids, walk_node, walk_tree, Visitor};
