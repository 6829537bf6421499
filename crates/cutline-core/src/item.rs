//! Timeline Data Model
//!
//! Tracks and the media items placed on them. Items live on a seconds-based
//! time axis; frame conversion happens at the editor boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum duration of any item, in seconds.
pub const MIN_ITEM_DURATION: f64 = 0.1;

/// Minimum duration of each half when splitting an item, in seconds.
pub const MIN_SPLIT_SEGMENT: f64 = 0.016;

/// Slack allowed when comparing a clip's length against its source media.
pub const DURATION_TOLERANCE: f64 = 0.05;

/// Generate a fresh stable id for an item or track.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The kind of content an item carries.
///
/// Determines which renderer draws the item body and whether source-media
/// bounds apply when resizing (video and audio only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Styled text block
    Text,
    /// Still image
    Image,
    /// Video clip with thumbnail strip
    Video,
    /// Audio clip with waveform
    Audio,
    /// Caption segment
    Caption,
    /// Sticker graphic
    Sticker,
    /// Painted shape
    Shape,
    /// Blur region
    Blur,
}

impl ItemKind {
    /// Whether items of this kind reference a bounded media source.
    #[must_use]
    pub const fn has_media_source(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

/// A clip on the timeline occupying `[start, end)` seconds on one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier
    pub id: String,
    /// Id of the containing track
    pub track_id: String,
    /// Start position in seconds
    pub start: f64,
    /// End position in seconds
    pub end: f64,
    /// Display label
    pub label: Option<String>,
    /// Content kind
    pub kind: ItemKind,
    /// Display color as RGB
    pub color: Option<[u8; 3]>,
    /// Free-form payload carried through untouched
    #[serde(default)]
    pub data: serde_json::Value,
    /// Offset into the source media, in timeline seconds
    pub media_start: Option<f64>,
    /// End offset into the source media, in timeline seconds
    pub media_end: Option<f64>,
    /// Total duration of the source media, in seconds
    pub media_src_duration: Option<f64>,
    /// Playback speed multiplier
    pub speed: f64,
}

impl Item {
    /// Create a new item with a fresh id.
    pub fn new(kind: ItemKind, track_id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: new_id(),
            track_id: track_id.into(),
            start,
            end,
            label: None,
            kind,
            color: None,
            data: serde_json::Value::Null,
            media_start: None,
            media_end: None,
            media_src_duration: None,
            speed: 1.0,
        }
    }

    /// Set the item id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the display color
    #[must_use]
    pub const fn color(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the free-form payload
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Set source-media metadata
    #[must_use]
    pub const fn media(mut self, media_start: f64, media_src_duration: f64) -> Self {
        self.media_start = Some(media_start);
        self.media_src_duration = Some(media_src_duration);
        self
    }

    /// Set the playback speed multiplier
    #[must_use]
    pub const fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Duration of the item in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// The longest this clip may be, given its source media and speed.
    ///
    /// `None` when the item has no bounded source (text, images, ...).
    #[must_use]
    pub fn max_duration(&self) -> Option<f64> {
        if !self.kind.has_media_source() {
            return None;
        }
        let src = self.media_src_duration?;
        let media_start = self.media_start.unwrap_or(0.0);
        let speed = if self.speed > 0.0 { self.speed } else { 1.0 };
        Some((src / speed - media_start).max(0.0))
    }

    /// Whether `[start, end)` of this item intersects `[other.start, other.end)`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A horizontal row of time-ordered items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Items on this track, kept sorted by start
    pub items: Vec<Item>,
    /// When set, items are kept contiguous from zero with no gaps
    pub magnetic: bool,
    /// Whether the track renders in the composition
    pub visible: bool,
    /// Whether the track's audio is muted
    pub muted: bool,
}

impl Track {
    /// Create a new empty track with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: new_id(),
            name: None,
            items: Vec::new(),
            magnetic: false,
            visible: true,
            muted: false,
        }
    }

    /// Set the track id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the magnetic flag
    #[must_use]
    pub const fn magnetic(mut self, magnetic: bool) -> Self {
        self.magnetic = magnetic;
        self
    }

    /// Add an item, fixing its `track_id` to this track.
    #[must_use]
    pub fn item(mut self, mut item: Item) -> Self {
        item.track_id = self.id.clone();
        self.items.push(item);
        self
    }

    /// Sort items by start position.
    pub fn sort_items(&mut self) {
        self.items
            .sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));
    }

    /// End of the last item, or 0 for an empty track.
    #[must_use]
    pub fn content_end(&self) -> f64 {
        self.items.iter().fold(0.0, |acc, i| acc.max(i.end))
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest item end across all tracks.
#[must_use]
pub fn composition_end(tracks: &[Track]) -> f64 {
    tracks.iter().fold(0.0, |acc, t| acc.max(t.content_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_duration() {
        let item = Item::new(ItemKind::Video, "t0", 1.0, 3.5);
        assert!((item.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_max_duration_respects_speed_and_offset() {
        let item = Item::new(ItemKind::Video, "t0", 0.0, 2.0)
            .media(2.0, 10.0)
            .speed(2.0);
        // 10s of source at 2x covers 5s of timeline, minus the 2s offset.
        assert!((item.max_duration().unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_duration_none_for_text() {
        let item = Item::new(ItemKind::Text, "t0", 0.0, 2.0);
        assert!(item.max_duration().is_none());
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = Item::new(ItemKind::Text, "t0", 0.0, 2.0);
        let b = Item::new(ItemKind::Text, "t0", 2.0, 4.0);
        let c = Item::new(ItemKind::Text, "t0", 1.9, 2.1);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_track_builder_fixes_track_id() {
        let track = Track::new().id("t0").item(Item::new(ItemKind::Text, "elsewhere", 0.0, 1.0));
        assert_eq!(track.items[0].track_id, "t0");
    }

    #[test]
    fn test_composition_end() {
        let tracks = vec![
            Track::new().id("a").item(Item::new(ItemKind::Text, "a", 0.0, 4.0)),
            Track::new().id("b").item(Item::new(ItemKind::Text, "b", 1.0, 9.5)),
        ];
        assert!((composition_end(&tracks) - 9.5).abs() < 1e-9);
    }
}
