use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crc32fast::Hasher;

use crate::node::{Node, NodeId};

/// Derive an id seed from arbitrary text using CRC32
pub fn get_seed(source: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Seed shared by every id minted in this process.
///
/// The full start-up time in nanoseconds plus the process id, so ids from a
/// previous session (loaded from disk) never collide with fresh ones.
pub fn session_seed() -> &'static str {
    static SEED: OnceLock<String> = OnceLock::new();
    SEED.get_or_init(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{:x}{:08x}", nanos, std::process::id())
    })
}

/// Sequential ID generator: `<seed>-<count>`
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(source: &str) -> Self {
        Self {
            seed: get_seed(source),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

/// Mint a process-unique node id
pub fn new_id() -> NodeId {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}-{}", session_seed(), count)
}

/// Copy `node` and its whole subtree, giving every copy a fresh id
pub fn deep_clone_with_fresh_ids(node: &Node) -> Node {
    Node {
        id: new_id(),
        kind: node.kind.clone(),
        display_name: node.display_name.clone(),
        container: node.container,
        resizable: node.resizable,
        properties: node.properties.clone(),
        style: node.style.clone(),
        children: node
            .children
            .iter()
            .map(|child| Arc::new(deep_clone_with_fresh_ids(child)))
            .collect(),
    }
}
