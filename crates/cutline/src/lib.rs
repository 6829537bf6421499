//! Video editing timeline widgets for egui
//!
//! Renders the `cutline-core` editor state: multi-track lanes with drag
//! editing, snapping and magnetic layout, a graduated time ruler, playhead
//! and transport, zoom control, and per-kind item bodies (video thumbnail
//! strips, audio waveforms, text labels).
//!
//! The application owns a [`cutline_core::TimelineEditor`] and shows it
//! through [`TimelineView`] each frame.

#![warn(missing_docs)]

pub mod ext;
pub mod item_content;
pub mod previews;
pub mod ruler;
pub mod theme;
pub mod timeline;
pub mod track_header;
pub mod track_view;
pub mod transport;
pub mod zoom_control;

pub(crate) mod playhead;

// Re-exports
pub use ext::CutlineContextExt;
pub use item_content::{item_color, ItemContentRegistry, ItemPaintContext, ItemRenderer};
pub use ruler::{format_tick, TimeRuler, TimeRulerResponse};
pub use theme::{ColorPalette, Spacing, Theme};
pub use timeline::{TimelineView, TimelineViewResponse};
pub use track_header::{TrackHeader, TrackHeaderResponse};
pub use track_view::{LaneAction, TrackLane, TrackLaneResponse};
pub use transport::{Transport, TransportResponse};
pub use zoom_control::{ZoomControl, ZoomControlResponse};
