//! # Document Handle
//!
//! A Document wraps one [`PageDocument`] (every route, every viewport) and
//! its persistence state. Documents can be:
//! - **Memory-backed**: for tests and scratch documents
//! - **File-backed**: saved to disk once edits settle
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Normalize → Edit (EditSession) → commit_tree → save_if_due
//!   ↓        ↓               ↓                 ↓            ↓
//! File   canonical      snapshots          dirty mark     File
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pagecraft_model::{ComponentRegistry, PageDocument, Tree, Viewport};
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::session::EditSession;
use crate::EditorError;

#[derive(Debug)]
pub struct Document {
    /// Path to the backing file (if any)
    pub path: PathBuf,

    /// Increments on each committed tree
    pub version: u64,

    content: PageDocument,
    storage: DocumentStorage,

    /// Quiet period before a dirty document is due for saving
    debounce: Duration,
}

#[derive(Debug)]
pub enum DocumentStorage {
    Memory,

    File {
        dirty: bool,
        last_change: Option<Instant>,
    },
}

impl Document {
    /// Memory-backed document around existing content
    pub fn from_document(path: PathBuf, content: PageDocument, config: &EditorConfig) -> Self {
        Self {
            path,
            version: 0,
            content,
            storage: DocumentStorage::Memory,
            debounce: config.autosave_debounce(),
        }
    }

    /// Load from disk and bring every tree into canonical form
    pub fn load(
        path: PathBuf,
        registry: &ComponentRegistry,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let mut content = PageDocument::from_json(&source)?;
        let normalized = content.normalize_all(registry);
        if normalized > 0 {
            info!(path = %path.display(), trees = normalized, "Normalized trees on load");
        }

        Ok(Self {
            path,
            version: 0,
            content,
            storage: DocumentStorage::File {
                dirty: normalized > 0,
                last_change: None,
            },
            debounce: config.autosave_debounce(),
        })
    }

    pub fn content(&self) -> &PageDocument {
        &self.content
    }

    pub fn tree(&self, route: &str, viewport: Viewport) -> Result<&Tree, EditorError> {
        Ok(self.content.tree(route, viewport)?)
    }

    /// Start editing one bucket entry
    pub fn open_session(
        &self,
        route: &str,
        viewport: Viewport,
        registry: Arc<ComponentRegistry>,
        config: &EditorConfig,
    ) -> Result<EditSession, EditorError> {
        let tree = self.tree(route, viewport)?.clone();
        Ok(EditSession::with_config(tree, registry, config))
    }

    /// Store an edited tree back into its bucket entry
    pub fn commit_tree(
        &mut self,
        route: &str,
        viewport: Viewport,
        tree: Tree,
        now: Instant,
    ) -> Result<u64, EditorError> {
        if self.content.tree(route, viewport)? == &tree {
            return Ok(self.version);
        }

        self.content.set_tree(route, viewport, tree)?;
        self.version += 1;
        self.mark_dirty(now);

        debug!(route, %viewport, version = self.version, "Tree committed");
        Ok(self.version)
    }

    /// Record a change at `now`; restarts the debounce period
    pub fn mark_dirty(&mut self, now: Instant) {
        if let DocumentStorage::File { dirty, last_change } = &mut self.storage {
            *dirty = true;
            *last_change = Some(now);
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { dirty: true, .. })
    }

    /// Dirty, and no change for at least the debounce period
    pub fn flush_due(&self, now: Instant) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty: true, last_change } => match last_change {
                Some(at) => now.saturating_duration_since(*at) >= self.debounce,
                None => true,
            },
            _ => false,
        }
    }

    /// Write to disk (file-backed only)
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::File { dirty, last_change } => {
                std::fs::write(&self.path, self.content.to_json()?)?;
                *dirty = false;
                *last_change = None;
                info!(path = %self.path.display(), version = self.version, "Document saved");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Save if the debounce period has elapsed. Returns whether it saved.
    pub fn save_if_due(&mut self, now: Instant) -> Result<bool, EditorError> {
        if !self.flush_due(now) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{Node, PageMetadata};

    fn sample() -> PageDocument {
        let mut doc = PageDocument::new();
        doc.add_page("/", PageMetadata::default()).trees.desktop =
            Tree::with_root(Node::new("root", "root").as_container());
        doc
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = Document::from_document(
            PathBuf::from("page.json"),
            sample(),
            &EditorConfig::default(),
        );
        let tree = Tree::with_root(
            Node::new("root", "root")
                .as_container()
                .with_children([Node::new("t", "text")]),
        );
        assert_eq!(doc.commit_tree("/", Viewport::Desktop, tree, Instant::now()).unwrap(), 1);
        assert!(!doc.is_dirty());
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_unknown_route() {
        let mut doc = Document::from_document(
            PathBuf::from("page.json"),
            sample(),
            &EditorConfig::default(),
        );
        assert!(doc.tree("/missing", Viewport::Desktop).is_err());
        assert!(doc
            .commit_tree("/missing", Viewport::Mobile, Tree::empty(), Instant::now())
            .is_err());
    }

    #[test]
    fn test_load_normalizes_and_debounces() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.json");
        let mut content = sample();
        content.pages.get_mut("/").unwrap().trees.mobile = Tree::new([Node::new("loose", "text")]);
        std::fs::write(&file, content.to_json().unwrap()).unwrap();

        let registry = ComponentRegistry::builtin();
        let config = EditorConfig {
            autosave_debounce_ms: 500,
            ..EditorConfig::default()
        };
        let mut doc = Document::load(file.clone(), &registry, &config).unwrap();

        // mobile was loose and tablet empty
        assert!(doc.is_dirty());
        assert!(doc.tree("/", Viewport::Mobile).unwrap().is_canonical());
        assert!(doc.tree("/", Viewport::Tablet).unwrap().is_canonical());
        doc.save().unwrap();
        assert!(!doc.is_dirty());

        let start = Instant::now();
        let mut session = doc
            .open_session("/", Viewport::Desktop, Arc::new(registry), &config)
            .unwrap();
        let root = session.tree().root_path();
        session.insert_kind(&root, 0, "text").unwrap();
        doc.commit_tree("/", Viewport::Desktop, session.tree().clone(), start)
            .unwrap();

        assert!(doc.is_dirty());
        assert!(!doc.flush_due(start + Duration::from_millis(100)));
        assert!(!doc.save_if_due(start + Duration::from_millis(100)).unwrap());
        assert!(doc.save_if_due(start + Duration::from_millis(600)).unwrap());
        assert!(!doc.is_dirty());

        let reloaded = PageDocument::from_json(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(
            reloaded.tree("/", Viewport::Desktop).unwrap().node_count(),
            2
        );
    }

    #[test]
    fn test_debounce_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.json");
        std::fs::write(&file, sample().to_json().unwrap()).unwrap();

        let registry = ComponentRegistry::builtin();
        let quick = EditorConfig {
            autosave_debounce_ms: 50,
            ..EditorConfig::default()
        };
        let slow = EditorConfig {
            autosave_debounce_ms: 2_000,
            ..EditorConfig::default()
        };
        let mut fast_doc = Document::load(file.clone(), &registry, &quick).unwrap();
        let mut slow_doc = Document::load(file, &registry, &slow).unwrap();

        let start = Instant::now();
        fast_doc.mark_dirty(start);
        slow_doc.mark_dirty(start);

        let later = start + Duration::from_millis(100);
        assert!(fast_doc.flush_due(later));
        assert!(!slow_doc.flush_due(later));
        assert!(slow_doc.flush_due(start + Duration::from_millis(2_000)));
    }
}
