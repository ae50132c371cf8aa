//! # Placement Session
//!
//! Turns one pointer drag gesture into at most one structural commit.
//!
//! ```text
//! Idle ──begin──▶ Dragging ──hover──▶ Hovering ──hover──▶ Hovering
//!  ▲                 │  ▲                │
//!  │                 │  └─────leave──────┤
//!  ├─release/cancel──┘                   │
//!  └───────────release (→ commit)────────┘
//! ```
//!
//! The session never touches a tree. The candidate drop target is advisory
//! (it drives the insertion indicator) until `release` hands back a single
//! [`PlacementCommit`] for the edit session to apply.

use pagecraft_model::Path;
use tracing::{debug, warn};

use crate::payload::{read_payload, DataTransfer, DragPayload, PayloadError};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounds of a child element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Primary axis of a container's child list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Children stacked top to bottom
    Vertical,
    /// Children laid out left to right
    Horizontal,
}

/// Gap index for `pointer` among `children`: the first child whose midpoint
/// on the primary axis lies beyond the pointer, or append
pub fn insertion_index(axis: Axis, pointer: Point, children: &[Bounds]) -> usize {
    children
        .iter()
        .position(|bounds| match axis {
            Axis::Vertical => bounds.mid_y() > pointer.y,
            Axis::Horizontal => bounds.mid_x() > pointer.x,
        })
        .unwrap_or(children.len())
}

/// Candidate destination while hovering a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub parent: Path,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlacementState {
    #[default]
    Idle,
    Dragging {
        payload: DragPayload,
    },
    Hovering {
        payload: DragPayload,
        target: DropTarget,
    },
}

/// The one edit a completed gesture asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementCommit {
    /// Create a node of `component_kind` at the target
    Insert {
        parent: Path,
        index: usize,
        component_kind: String,
    },
    /// Move the dragged node to the target
    Move {
        from: Path,
        to_parent: Path,
        to_index: usize,
    },
}

#[derive(Debug, Default)]
pub struct PlacementSession {
    state: PlacementState,
}

impl PlacementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, PlacementState::Idle)
    }

    /// The advisory drop target, if hovering
    pub fn candidate(&self) -> Option<&DropTarget> {
        match &self.state {
            PlacementState::Hovering { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Start a gesture. Ignored (returns false) while one is in flight.
    pub fn begin(&mut self, payload: DragPayload) -> bool {
        if self.is_active() {
            warn!("Drag started while another gesture is in flight");
            return false;
        }
        debug!(?payload, "Drag started");
        self.state = PlacementState::Dragging { payload };
        true
    }

    /// Start a gesture from a native data transfer
    pub fn begin_from_transfer(&mut self, transfer: &DataTransfer) -> Result<bool, PayloadError> {
        let payload = read_payload(transfer)?;
        Ok(self.begin(payload))
    }

    /// Pointer is over the container at `container`; recompute the candidate
    /// insertion index from the children's on-screen bounds
    pub fn hover(
        &mut self,
        container: &Path,
        axis: Axis,
        pointer: Point,
        children: &[Bounds],
    ) -> Option<usize> {
        let payload = match std::mem::take(&mut self.state) {
            PlacementState::Idle => return None,
            PlacementState::Dragging { payload } | PlacementState::Hovering { payload, .. } => {
                payload
            }
        };

        let index = insertion_index(axis, pointer, children);
        self.state = PlacementState::Hovering {
            payload,
            target: DropTarget {
                parent: container.clone(),
                index,
            },
        };
        Some(index)
    }

    /// Pointer left every candidate container
    pub fn leave(&mut self) {
        if let PlacementState::Hovering { payload, .. } = std::mem::take(&mut self.state) {
            self.state = PlacementState::Dragging { payload };
        }
    }

    /// Release the pointer. Yields the commit when over a valid target;
    /// otherwise the gesture ends with nothing to apply.
    pub fn release(&mut self) -> Option<PlacementCommit> {
        match std::mem::take(&mut self.state) {
            PlacementState::Hovering { payload, target } => {
                let commit = match payload {
                    DragPayload::PaletteEntry { component_kind } => PlacementCommit::Insert {
                        parent: target.parent,
                        index: target.index,
                        component_kind,
                    },
                    DragPayload::ExistingNode { path } => PlacementCommit::Move {
                        from: path,
                        to_parent: target.parent,
                        to_index: target.index,
                    },
                };
                debug!(?commit, "Drop committed");
                Some(commit)
            }
            PlacementState::Dragging { .. } => {
                debug!("Drop outside any target");
                None
            }
            PlacementState::Idle => None,
        }
    }

    /// Abort the gesture without committing anything
    pub fn cancel(&mut self) {
        self.state = PlacementState::Idle;
    }
}
