//! Timeline Configuration
//!
//! Tunable geometry, snapping, and zoom constants shared by the core
//! controllers and the widget layer.

use serde::{Deserialize, Serialize};

/// Zoom bounds and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Smallest allowed scale
    pub min: f64,
    /// Largest allowed scale
    pub max: f64,
    /// Scale applied on reset
    pub default: f64,
    /// Base step for button/keyboard zoom
    pub step: f64,
    /// Base step for wheel zoom
    pub wheel_step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 30.0,
            default: 1.0,
            step: 0.15,
            wheel_step: 0.1,
        }
    }
}

/// Configuration for the timeline core and widgets.
///
/// The defaults match a 30 fps composition with 48 px rows. Construct with
/// [`TimelineConfig::default`] and override fields as needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Frames per second used for frame/seconds conversion
    pub fps: u32,
    /// Vertical size of one track row, in pixels
    pub track_height: f32,
    /// Height of the item box within a row, in pixels
    pub track_item_height: f32,
    /// Width of the left track-handle column, in pixels
    pub handle_width: f32,
    /// Height of the top time ruler, in pixels
    pub markers_height: f32,
    /// Resize floor, in seconds
    pub min_item_duration: f64,
    /// Split floor for each resulting segment, in seconds
    pub min_split_segment: f64,
    /// Slack when validating against source-media duration, in seconds
    pub duration_tolerance: f64,
    /// Grid snapping quantum, in seconds
    pub grid_size: f64,
    /// Distance within which item edges capture a snapped value, in seconds
    pub edge_snap_tolerance: f64,
    /// Remove tracks that end up empty after an edit
    pub auto_remove_empty_tracks: bool,
    /// Zoom bounds and steps
    pub zoom: ZoomConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            track_height: 48.0,
            track_item_height: 40.0,
            handle_width: 94.0,
            markers_height: 40.0,
            min_item_duration: crate::item::MIN_ITEM_DURATION,
            min_split_segment: crate::item::MIN_SPLIT_SEGMENT,
            duration_tolerance: crate::item::DURATION_TOLERANCE,
            grid_size: 0.1,
            edge_snap_tolerance: 0.05,
            auto_remove_empty_tracks: true,
            zoom: ZoomConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimelineConfig::default();
        assert_eq!(config.fps, 30);
        assert_eq!(config.track_height, 48.0);
        assert_eq!(config.zoom.max, 30.0);
        assert!((config.grid_size - 0.1).abs() < 1e-9);
    }
}
