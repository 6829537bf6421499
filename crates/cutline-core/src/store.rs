//! Timeline Store
//!
//! Transient interaction state shared by the controllers and every widget
//! that renders previews: ghosts, the floating ghost, the insertion index,
//! magnetic previews, and the live drag descriptor. All mutation happens on
//! the UI thread; widgets re-read the store each frame.

use std::collections::HashMap;

use crate::gaps::PreviewItem;
use crate::item::ItemKind;

/// Which part of an item a gesture manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// Move the whole item
    Move,
    /// Drag the left edge
    ResizeStart,
    /// Drag the right edge
    ResizeEnd,
}

/// Immutable snapshot of one item captured at gesture start.
///
/// Multi-selection drags move every snapshot by the same deltas, so the
/// original geometry has to survive the whole gesture.
#[derive(Debug, Clone)]
pub struct DragSnapshot {
    /// Item id
    pub id: String,
    /// Start position when the gesture began
    pub start: f64,
    /// Duration when the gesture began
    pub duration: f64,
    /// Row index when the gesture began
    pub row: usize,
    /// Content kind
    pub kind: ItemKind,
    /// Media offset when the gesture began
    pub media_start: Option<f64>,
    /// Source duration, if bounded
    pub media_src_duration: Option<f64>,
    /// Playback speed
    pub speed: f64,
}

/// Live descriptor of the active gesture.
#[derive(Debug, Clone)]
pub struct DragInfo {
    /// Pointer x at gesture start, in content pixels
    pub start_x: f32,
    /// Pointer y at gesture start, in content pixels
    pub start_y: f32,
    /// Primary item's start position at gesture start
    pub start_position: f64,
    /// Primary item's duration at gesture start
    pub start_duration: f64,
    /// Primary item's row at gesture start
    pub start_row: usize,
    /// What the gesture does
    pub action: DragAction,
    /// Id of the item under the pointer
    pub primary_id: String,
    /// Snapshots of every item taking part
    pub snapshots: Vec<DragSnapshot>,
    /// Primary item's current (snapped, validated) start
    pub current_start: f64,
    /// Primary item's current duration
    pub current_duration: f64,
}

/// A non-committed preview of one dragged item, in composition-relative
/// percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    /// Left edge as a percentage of the composition duration
    pub left_pct: f64,
    /// Width as a percentage of the composition duration
    pub width_pct: f64,
    /// Top edge as a percentage of the track stack height
    pub top_pct: f64,
    /// Whether releasing here would commit
    pub valid: bool,
}

/// Cursor-attached preview shown near track boundaries while a new-track
/// insertion is the drop candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingGhost {
    /// Pointer x in content pixels
    pub x: f32,
    /// Pointer y in content pixels
    pub y: f32,
    /// Ghost width in pixels
    pub width: f32,
    /// Whether releasing here would commit
    pub valid: bool,
    /// Label of the dragged item
    pub label: Option<String>,
}

/// Reflowed layout of the target magnetic track during a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticPreview {
    /// Target track id
    pub track_id: String,
    /// Projected item positions, including the insertion shift
    pub items: Vec<PreviewItem>,
}

/// The time span the primary dragged item currently occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPosition {
    /// Current start in seconds
    pub start: f64,
    /// Current end in seconds
    pub end: f64,
}

/// Payload of an item dragged in from an external palette.
///
/// Mirrors the JSON attached to the host's drag transfer:
/// `{"isNewItem": true, "type": "audio", "label": ..., "duration": ...}`.
/// Durations are seconds for every kind, audio included.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemPayload {
    /// Marks the payload as a palette drag
    pub is_new_item: bool,
    /// Kind of the item to create
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Free-form payload forwarded to the created item
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// State of an external palette drag hovering the timeline.
#[derive(Debug, Clone)]
pub struct NewItemDragState {
    /// Parsed payload
    pub payload: NewItemPayload,
    /// Last hover position in content pixels
    pub position: Option<(f32, f32)>,
}

/// Partial item override applied while a gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePreview {
    /// Overridden start, if any
    pub start: Option<f64>,
    /// Overridden end, if any
    pub end: Option<f64>,
}

/// Process-wide mutable interaction state.
///
/// Controllers write, widgets read. [`TimelineStore::reset_drag_state`]
/// clears everything a finished or cancelled gesture may have left behind.
#[derive(Debug, Default)]
pub struct TimelineStore {
    /// Time under the cursor for the hover marker, in seconds
    pub ghost_marker_position: Option<f64>,
    /// An item drag/resize gesture is active
    pub is_dragging: bool,
    /// The playhead is being scrubbed
    pub is_playhead_dragging: bool,
    /// A context menu is open (suppresses marquee)
    pub is_context_menu_open: bool,
    /// Id of the item under the active gesture
    pub dragged_item_id: Option<String>,
    /// Track-aligned ghosts, one per dragged item
    pub ghost_elements: Option<Vec<Ghost>>,
    /// Cursor-attached ghost near a track boundary
    pub floating_ghost: Option<FloatingGhost>,
    /// Whether releasing now would commit
    pub is_valid_drop: bool,
    /// Live gesture descriptor
    pub drag_info: Option<DragInfo>,
    /// External palette drag state
    pub new_item_drag: Option<NewItemDragState>,
    /// Per-item overrides applied while dragging
    pub live_preview_updates: HashMap<String, LivePreview>,
    /// Row index for a pending new-track insertion
    pub insertion_index: Option<usize>,
    /// Reflow preview for the target magnetic track
    pub magnetic_preview: Option<MagneticPreview>,
    /// Current span of the primary dragged item
    pub current_drag_position: Option<DragPosition>,
}

impl TimelineStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hover time for the ghost marker.
    pub fn set_ghost_marker(&mut self, position: Option<f64>) {
        self.ghost_marker_position = position;
    }

    /// Begin an item gesture.
    pub fn begin_drag(&mut self, item_id: String, info: DragInfo) {
        self.is_dragging = true;
        self.dragged_item_id = Some(item_id);
        self.drag_info = Some(info);
        self.is_valid_drop = true;
    }

    /// Replace the ghost list.
    pub fn set_ghosts(&mut self, ghosts: Option<Vec<Ghost>>) {
        self.ghost_elements = ghosts;
    }

    /// Replace the floating ghost.
    pub fn set_floating_ghost(&mut self, ghost: Option<FloatingGhost>) {
        self.floating_ghost = ghost;
    }

    /// Replace the magnetic preview.
    pub fn set_magnetic_preview(&mut self, preview: Option<MagneticPreview>) {
        self.magnetic_preview = preview;
    }

    /// Set the pending new-track insertion row.
    pub fn set_insertion_index(&mut self, index: Option<usize>) {
        self.insertion_index = index;
    }

    /// Clear everything an item or palette gesture may have set.
    pub fn reset_drag_state(&mut self) {
        self.is_dragging = false;
        self.dragged_item_id = None;
        self.ghost_elements = None;
        self.floating_ghost = None;
        self.is_valid_drop = false;
        self.drag_info = None;
        self.new_item_drag = None;
        self.live_preview_updates.clear();
        self.insertion_index = None;
        self.magnetic_preview = None;
        self.current_drag_position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_drag_fields() {
        let mut store = TimelineStore::new();
        store.begin_drag(
            "a".into(),
            DragInfo {
                start_x: 10.0,
                start_y: 20.0,
                start_position: 1.0,
                start_duration: 2.0,
                start_row: 0,
                action: DragAction::Move,
                primary_id: "a".into(),
                snapshots: Vec::new(),
                current_start: 1.0,
                current_duration: 2.0,
            },
        );
        store.set_insertion_index(Some(1));
        store.ghost_marker_position = Some(3.0);

        store.reset_drag_state();

        assert!(!store.is_dragging);
        assert!(store.drag_info.is_none());
        assert!(store.insertion_index.is_none());
        assert!(store.ghost_elements.is_none());
        // The hover marker is not drag state and survives a reset.
        assert_eq!(store.ghost_marker_position, Some(3.0));
    }
}
