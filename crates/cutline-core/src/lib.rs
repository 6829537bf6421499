//! Headless core of the Cutline video editing timeline
//!
//! The data model and interaction engines behind the timeline widgets:
//! - Tracks/items model with overlap and magnetic-layout invariants
//! - Drag, marquee, and zoom state machines with snapping
//! - Batched undo/redo history
//! - Thumbnail sprite and waveform peak derivation pipelines
//!
//! Nothing in this crate touches egui; the `cutline` crate renders on top.

#![warn(missing_docs)]

pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod gaps;
pub mod history;
pub mod item;
pub mod marquee;
pub mod media;
pub mod overlay;
pub mod snap;
pub mod store;
pub mod thumbs;
pub mod time;
pub mod tracks;
pub mod waveform;
pub mod zoom;

// Re-exports
pub use config::{TimelineConfig, ZoomConfig};
pub use drag::{DragCommit, DragController, DragGeometry};
pub use editor::{TimelineEditor, TimelineEvent};
pub use error::MediaError;
pub use gaps::{
    apply_magnetic_insertion, can_fit_at_position, close_gaps, find_best_position_for_new_item,
    find_gaps, magnetic_insertion_preview, push_items_during_resize, Gap, MagneticInsertion,
    PreviewItem, ResizeOutcome,
};
pub use history::HistoryEngine;
pub use item::{composition_end, Item, ItemKind, Track};
pub use marquee::{MarqueeController, MarqueeRect};
pub use media::{AbortToken, AudioProvider, DecodedAudio, FrameImage, FrameSource};
pub use overlay::{
    diff_overlays, transform_overlays_to_tracks, transform_tracks_to_overlays, Overlay,
    OverlayDiff, OverlayHost, PlayerHost,
};
pub use snap::{collect_edges, guideline_candidates, snap_to_grid_and_edges, Guideline};
pub use store::{
    DragAction, DragInfo, DragPosition, DragSnapshot, FloatingGhost, Ghost, LivePreview,
    MagneticPreview, NewItemDragState, NewItemPayload, TimelineStore,
};
pub use thumbs::{sprite_cache_key, thumbnail_interval, SpriteRect, SpriteSheet, ThumbnailCache};
pub use time::{
    content_width, frame_to_time, major_tick_interval, minor_tick_interval, time_to_frame,
    viewport_duration,
};
pub use tracks::{
    tracks_structurally_equal, ItemPlacement, NewItemOptions, TrackSpawn, TracksModel,
};
pub use waveform::{extract_peaks, WaveformPeaks, WaveformProcessor};
pub use zoom::{SliderDragState, ZoomController};
