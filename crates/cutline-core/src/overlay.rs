//! Overlay Bridge
//!
//! Translation boundary between the editor's external overlay list and the
//! internal tracks model. Overlays speak frames and row indices; items speak
//! seconds and track ids. The bridge also computes the add/change/remove
//! diff handed to the host after a commit.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemKind, Track};
use crate::time::{frame_to_time, time_to_frame};

/// One element of the host's composition, on the frame/row axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Stable identifier, shared with the timeline item
    pub id: String,
    /// First frame of the overlay
    pub from: i64,
    /// Length in frames
    pub duration_in_frames: i64,
    /// Row index, top to bottom
    pub row: usize,
    /// Content kind
    pub kind: ItemKind,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Display color
    #[serde(default)]
    pub color: Option<[u8; 3]>,
    /// Playback speed multiplier
    #[serde(default)]
    pub speed: Option<f64>,
    /// Offset into the video source, in seconds
    #[serde(default)]
    pub video_start_time: Option<f64>,
    /// Offset into the audio source, in frames
    #[serde(default)]
    pub start_from_sound: Option<i64>,
    /// Source media duration in seconds
    #[serde(default)]
    pub media_duration: Option<f64>,
    /// Everything else the host attaches; carried through untouched
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Added/changed/removed overlays after a timeline commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayDiff {
    /// Overlays not present before
    pub added: Vec<Overlay>,
    /// Overlays whose content changed
    pub changed: Vec<Overlay>,
    /// Ids that disappeared
    pub removed: Vec<String>,
}

impl OverlayDiff {
    /// Whether the diff carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Playback collaborator: the preview player the timeline drives.
pub trait PlayerHost {
    /// Jump to a frame.
    fn seek_to(&mut self, frame: i64);
    /// Start playback.
    fn play(&mut self);
    /// Pause playback.
    fn pause(&mut self);
    /// The frame currently displayed.
    fn current_frame(&self) -> i64;
}

/// Composition collaborator: receives overlay diffs after commits.
pub trait OverlayHost {
    /// Apply a batch of overlay changes.
    fn apply(&mut self, diff: OverlayDiff);
}

/// Build tracks from an overlay list.
///
/// Rows map to track indices; empty in-between rows become empty tracks so
/// indices stay aligned. Items within a row are sorted by start.
#[must_use]
pub fn transform_overlays_to_tracks(overlays: &[Overlay], fps: u32) -> Vec<Track> {
    let row_count = overlays.iter().map(|o| o.row + 1).max().unwrap_or(1);
    let mut tracks: Vec<Track> = (0..row_count)
        .map(|row| Track::new().id(format!("track-{row}")))
        .collect();

    for overlay in overlays {
        let track_id = tracks[overlay.row].id.clone();
        let start = frame_to_time(overlay.from, fps);
        let end = frame_to_time(overlay.from + overlay.duration_in_frames, fps);
        let media_start = match overlay.kind {
            ItemKind::Video => overlay.video_start_time,
            ItemKind::Audio => overlay.start_from_sound.map(|f| frame_to_time(f, fps)),
            _ => None,
        };
        let mut item = Item::new(overlay.kind, track_id, start, end).id(overlay.id.clone());
        item.label = overlay.label.clone();
        item.color = overlay.color;
        item.speed = overlay.speed.unwrap_or(1.0);
        item.media_start = media_start;
        item.media_src_duration = overlay.media_duration;
        item.data = overlay.data.clone();
        tracks[overlay.row].items.push(item);
    }

    for track in &mut tracks {
        track.sort_items();
    }
    tracks
}

/// Project tracks back to overlays, merging over the host's current state.
///
/// `base` overlays supply every field the timeline does not own, so edits
/// the host made concurrently (styling, effects) survive a timeline commit;
/// only geometry, kind, and media offsets are overwritten.
#[must_use]
pub fn transform_tracks_to_overlays(tracks: &[Track], fps: u32, base: &[Overlay]) -> Vec<Overlay> {
    let mut overlays = Vec::new();
    for (row, track) in tracks.iter().enumerate() {
        for item in &track.items {
            let from = time_to_frame(item.start, fps);
            let duration_in_frames = (time_to_frame(item.end, fps) - from).max(1);

            let mut overlay = base
                .iter()
                .find(|o| o.id == item.id)
                .cloned()
                .unwrap_or_else(|| Overlay {
                    id: item.id.clone(),
                    from,
                    duration_in_frames,
                    row,
                    kind: item.kind,
                    label: None,
                    color: None,
                    speed: None,
                    video_start_time: None,
                    start_from_sound: None,
                    media_duration: None,
                    data: item.data.clone(),
                });

            overlay.from = from;
            overlay.duration_in_frames = duration_in_frames;
            overlay.row = row;
            overlay.kind = item.kind;
            overlay.label = item.label.clone();
            overlay.color = item.color;
            overlay.speed = if (item.speed - 1.0).abs() > f64::EPSILON {
                Some(item.speed)
            } else {
                overlay.speed.filter(|s| (*s - 1.0).abs() < f64::EPSILON)
            };
            overlay.media_duration = item.media_src_duration;
            match item.kind {
                ItemKind::Video => {
                    overlay.video_start_time = item.media_start;
                }
                ItemKind::Audio => {
                    overlay.start_from_sound = item.media_start.map(|t| time_to_frame(t, fps));
                }
                _ => {}
            }
            overlays.push(overlay);
        }
    }
    overlays
}

/// Compute the add/change/remove diff between two overlay lists.
#[must_use]
pub fn diff_overlays(old: &[Overlay], new: &[Overlay]) -> OverlayDiff {
    let mut diff = OverlayDiff::default();
    for overlay in new {
        match old.iter().find(|o| o.id == overlay.id) {
            None => diff.added.push(overlay.clone()),
            Some(previous) if previous != overlay => diff.changed.push(overlay.clone()),
            Some(_) => {}
        }
    }
    for overlay in old {
        if !new.iter().any(|o| o.id == overlay.id) {
            diff.removed.push(overlay.id.clone());
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(id: &str, from: i64, frames: i64, row: usize, kind: ItemKind) -> Overlay {
        Overlay {
            id: id.into(),
            from,
            duration_in_frames: frames,
            row,
            kind,
            label: Some(format!("{id} label")),
            color: Some([10, 20, 30]),
            speed: None,
            video_start_time: None,
            start_from_sound: None,
            media_duration: None,
            data: serde_json::json!({"styles": {"opacity": 1.0}}),
        }
    }

    #[test]
    fn test_overlays_to_tracks_rows_and_sorting() {
        let overlays = vec![
            overlay("b", 60, 30, 0, ItemKind::Text),
            overlay("a", 0, 30, 0, ItemKind::Text),
            overlay("c", 0, 60, 2, ItemKind::Image),
        ];
        let tracks = transform_overlays_to_tracks(&overlays, 30);
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].items[0].id, "a");
        assert_eq!(tracks[0].items[1].id, "b");
        assert!(tracks[1].items.is_empty());
        assert!((tracks[2].items[0].end - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_media_offsets_convert_per_kind() {
        let mut video = overlay("v", 0, 30, 0, ItemKind::Video);
        video.video_start_time = Some(2.5);
        video.media_duration = Some(30.0);
        let mut audio = overlay("s", 0, 30, 1, ItemKind::Audio);
        audio.start_from_sound = Some(45);

        let tracks = transform_overlays_to_tracks(&[video, audio], 30);
        assert!((tracks[0].items[0].media_start.unwrap() - 2.5).abs() < 1e-9);
        // 45 frames at 30 fps is 1.5 s.
        assert!((tracks[1].items[0].media_start.unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_preserves_overlays() {
        let mut video = overlay("v", 30, 90, 0, ItemKind::Video);
        video.video_start_time = Some(1.0);
        video.media_duration = Some(60.0);
        let mut audio = overlay("s", 15, 45, 1, ItemKind::Audio);
        audio.start_from_sound = Some(30);
        let text = overlay("t", 0, 120, 1, ItemKind::Text);
        let source = vec![video, audio, text];

        let tracks = transform_overlays_to_tracks(&source, 30);
        let mut round_tripped = transform_tracks_to_overlays(&tracks, 30, &source);

        round_tripped.sort_by(|a, b| a.id.cmp(&b.id));
        let mut expected = source;
        expected.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(round_tripped, expected);
    }

    #[test]
    fn test_export_merges_over_current_host_state() {
        let source = vec![overlay("a", 0, 30, 0, ItemKind::Text)];
        let mut tracks = transform_overlays_to_tracks(&source, 30);
        tracks[0].items[0].start = 2.0;
        tracks[0].items[0].end = 3.0;

        // The host restyled the overlay while the timeline edit was pending.
        let mut host_state = source;
        host_state[0].data = serde_json::json!({"styles": {"opacity": 0.5}});

        let exported = transform_tracks_to_overlays(&tracks, 30, &host_state);
        assert_eq!(exported[0].from, 60);
        assert_eq!(exported[0].duration_in_frames, 30);
        assert_eq!(exported[0].data, serde_json::json!({"styles": {"opacity": 0.5}}));
    }

    #[test]
    fn test_diff_overlays() {
        let old = vec![overlay("a", 0, 30, 0, ItemKind::Text), overlay("b", 30, 30, 0, ItemKind::Text)];
        let mut changed = overlay("a", 0, 30, 0, ItemKind::Text);
        changed.from = 60;
        let new = vec![changed.clone(), overlay("c", 90, 30, 1, ItemKind::Image)];

        let diff = diff_overlays(&old, &new);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].id, "c");
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].from, 60);
        assert_eq!(diff.removed, vec!["b".to_string()]);
        assert!(diff_overlays(&new, &new).is_empty());
    }
}
