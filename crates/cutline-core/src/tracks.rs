//! Tracks Model
//!
//! The authoritative tracks/items list and every mutating operation on it.
//! Mutations either succeed completely or leave the model unchanged; nothing
//! here panics or returns errors across the public surface. Invalid requests
//! are clamped or refused with a logged warning.

use crate::config::TimelineConfig;
use crate::gaps::{
    apply_magnetic_insertion, close_gaps, find_best_position_for_new_item,
    magnetic_insertion_preview, push_items_during_resize,
};
use crate::item::{new_id, Item, ItemKind, Track};
use crate::time::frame_to_time;

/// Where one relocated item lands inside [`TracksModel::create_tracks_with_items`].
#[derive(Debug, Clone)]
pub struct ItemPlacement {
    /// Id of an existing item to relocate
    pub item_id: String,
    /// New start in seconds
    pub start: f64,
    /// New end in seconds
    pub end: f64,
}

/// One new track and the items it receives.
#[derive(Debug, Clone, Default)]
pub struct TrackSpawn {
    /// Items moved onto the spawned track
    pub items: Vec<ItemPlacement>,
}

/// Options for [`TracksModel::add_new_item`].
#[derive(Debug, Clone)]
pub struct NewItemOptions {
    /// Kind of item to create
    pub kind: ItemKind,
    /// Display label
    pub label: Option<String>,
    /// Duration in seconds; defaults to 5 s
    pub duration: Option<f64>,
    /// Display color
    pub color: Option<[u8; 3]>,
    /// Free-form payload
    pub data: Option<serde_json::Value>,
    /// Preferred track index
    pub pref_track: Option<usize>,
    /// Preferred start position
    pub pref_start: Option<f64>,
}

impl NewItemOptions {
    /// Options for a new item of the given kind with defaults everywhere else.
    #[must_use]
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            label: None,
            duration: None,
            color: None,
            data: None,
            pref_track: None,
            pref_start: None,
        }
    }
}

const DEFAULT_NEW_ITEM_DURATION: f64 = 5.0;

/// The authoritative list of tracks and items.
///
/// All mutating operations live here so the invariants hold globally:
/// non-magnetic tracks stay overlap-free, magnetic tracks stay gap-free, and
/// at least one track always exists.
#[derive(Debug, Clone)]
pub struct TracksModel {
    tracks: Vec<Track>,
    config: TimelineConfig,
}

impl TracksModel {
    /// Create a model with a single empty track.
    #[must_use]
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            tracks: vec![Track::new()],
            config,
        }
    }

    /// Create a model from existing tracks.
    ///
    /// An empty list gets a fresh empty track; magnetic tracks are compacted
    /// and every track is sorted.
    #[must_use]
    pub fn from_tracks(mut tracks: Vec<Track>, config: TimelineConfig) -> Self {
        if tracks.is_empty() {
            tracks.push(Track::new());
        }
        for track in &mut tracks {
            track.sort_items();
            if track.magnetic {
                track.items = close_gaps(&track.items);
            }
        }
        Self { tracks, config }
    }

    /// The current tracks, top to bottom.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Replace the whole tracks list (undo/redo and external sync).
    pub fn set_tracks(&mut self, mut tracks: Vec<Track>) {
        if tracks.is_empty() {
            tracks.push(Track::new());
        }
        for track in &mut tracks {
            track.sort_items();
        }
        self.tracks = tracks;
    }

    /// Index of the track with the given id.
    #[must_use]
    pub fn track_index(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Locate an item as (track index, item index).
    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<(usize, usize)> {
        for (ti, track) in self.tracks.iter().enumerate() {
            if let Some(ii) = track.items.iter().position(|i| i.id == item_id) {
                return Some((ti, ii));
            }
        }
        None
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        let (ti, ii) = self.find_item(item_id)?;
        Some(&self.tracks[ti].items[ii])
    }

    /// Move an item to a new position, possibly on another track.
    ///
    /// Magnetic targets reflow around the insertion point; magnetic sources
    /// are re-compacted. Returns `false` (model unchanged) when either id is
    /// unknown.
    pub fn move_item(&mut self, item_id: &str, new_start: f64, new_end: f64, new_track_id: &str) -> bool {
        let Some(target_idx) = self.track_index(new_track_id) else {
            log::warn!("move_item: unknown target track {new_track_id}");
            return false;
        };
        let Some((source_idx, item_idx)) = self.find_item(item_id) else {
            log::warn!("move_item: unknown item {item_id}");
            return false;
        };

        let source_was_magnetic = self.tracks[source_idx].magnetic;
        let mut item = self.tracks[source_idx].items.remove(item_idx);
        item.track_id = new_track_id.to_string();
        item.start = new_start.max(0.0);
        item.end = item.start + (new_end - new_start).max(self.config.min_item_duration);

        let target = &mut self.tracks[target_idx];
        if target.magnetic {
            let insertion = magnetic_insertion_preview(&target.items, item.duration(), item.start);
            target.items = apply_magnetic_insertion(&target.items, item, &insertion);
        } else {
            target.items.push(item);
            target.sort_items();
        }

        if source_was_magnetic && source_idx != target_idx {
            let source = &mut self.tracks[source_idx];
            source.items = close_gaps(&source.items);
        }

        self.apply_auto_remove();
        true
    }

    /// Resize an item in place.
    ///
    /// Magnetic tracks change the item's duration and re-compact; normal
    /// tracks push neighbors out of the way. Source-media bounds are
    /// enforced in both paths.
    pub fn resize_item(&mut self, item_id: &str, new_start: f64, new_end: f64) -> bool {
        let Some((track_idx, item_idx)) = self.find_item(item_id) else {
            log::warn!("resize_item: unknown item {item_id}");
            return false;
        };

        let track = &mut self.tracks[track_idx];
        if track.magnetic {
            let item = &mut track.items[item_idx];
            let delta_left = new_start - item.start;
            if item.kind.has_media_source() {
                let media_start = item.media_start.unwrap_or(0.0);
                item.media_start = Some((media_start + delta_left).max(0.0));
            }
            let mut duration = (new_end - new_start).max(self.config.min_item_duration);
            if let Some(max) = item.max_duration() {
                if duration > max + self.config.duration_tolerance {
                    duration = max;
                }
            }
            item.start = new_start.max(0.0);
            item.end = item.start + duration;
            track.items = close_gaps(&track.items);
            true
        } else if let Some(outcome) = push_items_during_resize(&track.items, item_id, new_start, new_end)
        {
            track.items = outcome.items;
            true
        } else {
            false
        }
    }

    /// Split an item at a timeline position.
    ///
    /// Both halves must satisfy the minimum segment duration, otherwise the
    /// split is refused. Returns the id of the right-hand item.
    pub fn split_item(&mut self, item_id: &str, time: f64) -> Option<String> {
        let (track_idx, item_idx) = self.find_item(item_id).or_else(|| {
            log::warn!("split_item: unknown item {item_id}");
            None
        })?;

        let item = &self.tracks[track_idx].items[item_idx];
        let left_len = time - item.start;
        let right_len = item.end - time;
        if left_len < self.config.min_split_segment || right_len < self.config.min_split_segment {
            log::warn!("split_item: segment below minimum at {time:.3}s");
            return None;
        }

        let mut right = item.clone();
        right.id = new_id();
        right.start = time;
        if right.kind.has_media_source() {
            let media_start = right.media_start.unwrap_or(0.0);
            right.media_start = Some(media_start + left_len);
        }
        let right_id = right.id.clone();

        let track = &mut self.tracks[track_idx];
        track.items[item_idx].end = time;
        track.items.insert(item_idx + 1, right);
        track.sort_items();
        Some(right_id)
    }

    /// Delete the given items wherever they are.
    pub fn delete_items(&mut self, item_ids: &[String]) -> bool {
        let mut changed = false;
        for track in &mut self.tracks {
            let before = track.items.len();
            track.items.retain(|i| !item_ids.contains(&i.id));
            if track.items.len() != before {
                changed = true;
                if track.magnetic {
                    track.items = close_gaps(&track.items);
                }
            }
        }
        if changed {
            self.apply_auto_remove();
        }
        changed
    }

    /// Duplicate the given items, placing each copy near its original.
    ///
    /// Returns the ids of the new items in input order.
    pub fn duplicate_items(&mut self, item_ids: &[String]) -> Vec<String> {
        let mut created = Vec::new();
        for item_id in item_ids {
            let Some((track_idx, item_idx)) = self.find_item(item_id) else {
                log::warn!("duplicate_items: unknown item {item_id}");
                continue;
            };
            let original = self.tracks[track_idx].items[item_idx].clone();
            let duration = original.duration();
            let (target_idx, start) = find_best_position_for_new_item(
                &self.tracks,
                duration,
                Some(original.end),
                Some(track_idx),
                Some(original.end),
            );

            let mut copy = original;
            copy.id = new_id();
            copy.start = start;
            copy.end = start + duration;
            copy.track_id = self.tracks[target_idx].id.clone();
            created.push(copy.id.clone());

            let target = &mut self.tracks[target_idx];
            if target.magnetic {
                let insertion = magnetic_insertion_preview(&target.items, duration, start);
                target.items = apply_magnetic_insertion(&target.items, copy, &insertion);
            } else {
                target.items.push(copy);
                target.sort_items();
            }
        }
        created
    }

    /// Insert an empty track, returning its id. The index is clamped.
    pub fn insert_track_at(&mut self, index: usize) -> String {
        let track = Track::new();
        let id = track.id.clone();
        let index = index.min(self.tracks.len());
        self.tracks.insert(index, track);
        id
    }

    /// Insert several empty tracks, returning their ids top to bottom.
    pub fn insert_multiple_tracks_at(&mut self, index: usize, count: usize) -> Vec<String> {
        let mut index = index.min(self.tracks.len());
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.insert_track_at(index));
            index += 1;
        }
        ids
    }

    /// Atomically relocate items onto freshly inserted tracks.
    ///
    /// All listed items are removed first, then the new tracks are built and
    /// inserted in one step, so a transiently empty source track can not be
    /// auto-removed out from under the insertion index.
    pub fn create_tracks_with_items(&mut self, index: usize, spawns: &[TrackSpawn]) -> Vec<String> {
        let mut originals: Vec<Vec<(Item, f64, f64)>> = Vec::with_capacity(spawns.len());
        for spawn in spawns {
            let mut group = Vec::with_capacity(spawn.items.len());
            for placement in &spawn.items {
                let Some((ti, ii)) = self.find_item(&placement.item_id) else {
                    log::warn!("create_tracks_with_items: unknown item {}", placement.item_id);
                    continue;
                };
                let item = self.tracks[ti].items.remove(ii);
                group.push((item, placement.start, placement.end));
            }
            originals.push(group);
        }

        let index = index.min(self.tracks.len());
        let mut new_ids = Vec::with_capacity(originals.len());
        for (offset, group) in originals.into_iter().enumerate() {
            let mut track = Track::new();
            for (mut item, start, end) in group {
                item.track_id = track.id.clone();
                item.start = start.max(0.0);
                item.end = item.start + (end - start).max(self.config.min_item_duration);
                track.items.push(item);
            }
            track.sort_items();
            new_ids.push(track.id.clone());
            self.tracks.insert(index + offset, track);
        }

        self.apply_auto_remove();
        new_ids
    }

    /// Move a track to a new row. No-op when indices are equal or invalid.
    pub fn reorder_track(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.tracks.len() || to >= self.tracks.len() {
            return false;
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        true
    }

    /// Delete a track by id, keeping at least one track alive.
    pub fn delete_track(&mut self, track_id: &str) -> bool {
        let Some(index) = self.track_index(track_id) else {
            return false;
        };
        self.tracks.remove(index);
        if self.tracks.is_empty() {
            self.tracks.push(Track::new());
        }
        true
    }

    /// Show or hide a track in the composition.
    pub fn set_track_visible(&mut self, track_id: &str, visible: bool) -> bool {
        let Some(index) = self.track_index(track_id) else {
            return false;
        };
        let track = &mut self.tracks[index];
        let changed = track.visible != visible;
        track.visible = visible;
        changed
    }

    /// Mute or unmute a track's audio.
    pub fn set_track_muted(&mut self, track_id: &str, muted: bool) -> bool {
        let Some(index) = self.track_index(track_id) else {
            return false;
        };
        let track = &mut self.tracks[index];
        let changed = track.muted != muted;
        track.muted = muted;
        changed
    }

    /// Flip a track's magnetic flag, compacting when enabling.
    pub fn toggle_magnetic(&mut self, track_id: &str) -> bool {
        let Some(index) = self.track_index(track_id) else {
            return false;
        };
        let track = &mut self.tracks[index];
        track.magnetic = !track.magnetic;
        if track.magnetic {
            track.items = close_gaps(&track.items);
        }
        true
    }

    /// Create a new item near the playhead, returning its id.
    pub fn add_new_item(&mut self, options: NewItemOptions, current_frame: i64, fps: u32) -> String {
        let duration = options
            .duration
            .unwrap_or(DEFAULT_NEW_ITEM_DURATION)
            .max(self.config.min_item_duration);
        let current_time = frame_to_time(current_frame, fps);
        let (track_idx, start) = find_best_position_for_new_item(
            &self.tracks,
            duration,
            Some(current_time),
            options.pref_track,
            options.pref_start,
        );

        let mut item = Item::new(options.kind, self.tracks[track_idx].id.clone(), start, start + duration);
        item.label = options.label;
        item.color = options.color;
        if let Some(data) = options.data {
            item.data = data;
        }
        let id = item.id.clone();

        let target = &mut self.tracks[track_idx];
        if target.magnetic {
            let insertion = magnetic_insertion_preview(&target.items, duration, start);
            target.items = apply_magnetic_insertion(&target.items, item, &insertion);
        } else {
            target.items.push(item);
            target.sort_items();
        }
        id
    }

    /// Drop empty tracks when configured to, always keeping at least one.
    fn apply_auto_remove(&mut self) {
        if !self.config.auto_remove_empty_tracks {
            return;
        }
        if self.tracks.iter().all(|t| t.items.is_empty()) {
            self.tracks.truncate(1);
            return;
        }
        self.tracks.retain(|t| !t.items.is_empty());
    }
}

/// Structural equality over (track id, item id/start/end/track id).
///
/// Flags and labels are ignored; this is the identity used to decide whether
/// an operation actually changed the layout.
#[must_use]
pub fn tracks_structurally_equal(a: &[Track], b: &[Track]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(ta, tb)| {
            ta.id == tb.id
                && ta.items.len() == tb.items.len()
                && ta.items.iter().zip(&tb.items).all(|(ia, ib)| {
                    ia.id == ib.id
                        && ia.track_id == ib.track_id
                        && (ia.start - ib.start).abs() < 1e-9
                        && (ia.end - ib.end).abs() < 1e-9
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, track: &str, start: f64, end: f64) -> Item {
        Item::new(ItemKind::Text, track, start, end).id(id)
    }

    fn model(tracks: Vec<Track>) -> TracksModel {
        TracksModel::from_tracks(tracks, TimelineConfig::default())
    }

    #[test]
    fn test_move_item_across_tracks() {
        let mut m = model(vec![
            Track::new().id("t0").item(item("a", "t0", 0.0, 2.0)),
            Track::new().id("t1").item(item("b", "t1", 0.0, 1.0)),
        ]);
        assert!(m.move_item("a", 3.0, 5.0, "t1"));
        let t1 = &m.tracks()[m.track_index("t1").unwrap()];
        assert_eq!(t1.items.len(), 2);
        assert_eq!(t1.items[1].id, "a");
        assert_eq!(t1.items[1].track_id, "t1");
        // The emptied source track is auto-removed.
        assert!(m.track_index("t0").is_none());
    }

    #[test]
    fn test_move_item_unknown_target_is_noop() {
        let mut m = model(vec![Track::new().id("t0").item(item("a", "t0", 0.0, 2.0))]);
        let before = m.tracks().to_vec();
        assert!(!m.move_item("a", 1.0, 3.0, "nope"));
        assert!(tracks_structurally_equal(&before, m.tracks()));
    }

    #[test]
    fn test_move_onto_magnetic_reflows() {
        // Dropping X (1 s) intended at 3.1 lands after B; C shifts right.
        let mut m = model(vec![
            Track::new()
                .id("t0")
                .magnetic(true)
                .item(item("a", "t0", 0.0, 2.0))
                .item(item("b", "t0", 2.0, 5.0))
                .item(item("c", "t0", 5.0, 6.0)),
            Track::new().id("t1").item(item("x", "t1", 0.0, 1.0)),
        ]);
        assert!(m.move_item("x", 3.1, 4.1, "t0"));
        let t0 = &m.tracks()[0];
        let layout: Vec<(&str, f64, f64)> =
            t0.items.iter().map(|i| (i.id.as_str(), i.start, i.end)).collect();
        assert_eq!(layout[0], ("a", 0.0, 2.0));
        assert_eq!(layout[1].0, "b");
        assert_eq!(layout[2].0, "x");
        assert!((layout[2].1 - 5.0).abs() < 1e-9);
        assert_eq!(layout[3].0, "c");
        assert!((layout[3].1 - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_off_magnetic_closes_source() {
        let mut m = model(vec![
            Track::new()
                .id("t0")
                .magnetic(true)
                .item(item("a", "t0", 0.0, 2.0))
                .item(item("b", "t0", 2.0, 3.0)),
            Track::new().id("t1").item(item("z", "t1", 9.0, 10.0)),
        ]);
        assert!(m.move_item("a", 5.0, 7.0, "t1"));
        let t0 = &m.tracks()[0];
        assert_eq!(t0.items.len(), 1);
        assert!((t0.items[0].start - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_pushes_neighbors() {
        let mut m = model(vec![Track::new()
            .id("t0")
            .item(item("a", "t0", 0.0, 2.0))
            .item(item("b", "t0", 3.0, 4.0))
            .item(item("c", "t0", 5.0, 6.0))]);
        assert!(m.resize_item("a", 0.0, 3.5));
        let t0 = &m.tracks()[0];
        assert!((t0.items[0].end - 3.5).abs() < 1e-9);
        assert!((t0.items[1].start - 3.5).abs() < 1e-9);
        assert!((t0.items[2].start - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_magnetic_keeps_layout_contiguous() {
        let mut m = model(vec![Track::new()
            .id("t0")
            .magnetic(true)
            .item(item("a", "t0", 0.0, 2.0))
            .item(item("b", "t0", 2.0, 4.0))]);
        assert!(m.resize_item("a", 0.0, 3.0));
        let t0 = &m.tracks()[0];
        assert!((t0.items[0].end - 3.0).abs() < 1e-9);
        assert!((t0.items[1].start - 3.0).abs() < 1e-9);
        assert!((t0.items[1].end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_item() {
        let mut m = model(vec![Track::new().id("t0").item(
            Item::new(ItemKind::Video, "t0", 0.0, 4.0).id("a").media(1.0, 30.0),
        )]);
        let right_id = m.split_item("a", 2.5).unwrap();
        let t0 = &m.tracks()[0];
        assert_eq!(t0.items.len(), 2);
        assert!((t0.items[0].end - 2.5).abs() < 1e-9);
        assert_eq!(t0.items[1].id, right_id);
        assert!((t0.items[1].start - 2.5).abs() < 1e-9);
        assert!((t0.items[1].end - 4.0).abs() < 1e-9);
        assert!((t0.items[1].media_start.unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_split_below_minimum_rejected() {
        let mut m = model(vec![Track::new().id("t0").item(item("a", "t0", 0.0, 4.0))]);
        assert!(m.split_item("a", 0.01).is_none());
        assert_eq!(m.tracks()[0].items.len(), 1);
    }

    #[test]
    fn test_delete_items_compacts_magnetic() {
        let mut m = model(vec![
            Track::new()
                .id("t0")
                .magnetic(true)
                .item(item("a", "t0", 0.0, 2.0))
                .item(item("b", "t0", 2.0, 3.0))
                .item(item("c", "t0", 3.0, 5.0)),
            Track::new().id("t1").item(item("z", "t1", 0.0, 1.0)),
        ]);
        assert!(m.delete_items(&["b".to_string()]));
        let t0 = &m.tracks()[0];
        assert_eq!(t0.items.len(), 2);
        assert!((t0.items[1].start - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_delete_last_items_keeps_one_track() {
        let mut m = model(vec![Track::new().id("t0").item(item("a", "t0", 0.0, 2.0))]);
        assert!(m.delete_items(&["a".to_string()]));
        assert_eq!(m.tracks().len(), 1);
    }

    #[test]
    fn test_create_tracks_with_items_is_atomic() {
        let mut m = model(vec![
            Track::new().id("t0").item(item("a", "t0", 0.0, 2.0)),
            Track::new().id("t1").item(item("b", "t1", 1.0, 2.0)),
        ]);
        let spawns = vec![
            TrackSpawn {
                items: vec![ItemPlacement { item_id: "a".into(), start: 4.0, end: 6.0 }],
            },
            TrackSpawn {
                items: vec![ItemPlacement { item_id: "b".into(), start: 5.0, end: 6.0 }],
            },
        ];
        let ids = m.create_tracks_with_items(0, &spawns);
        assert_eq!(ids.len(), 2);
        assert_eq!(m.tracks().len(), 2);
        assert_eq!(m.tracks()[0].id, ids[0]);
        assert_eq!(m.tracks()[1].id, ids[1]);
        assert!((m.tracks()[0].items[0].start - 4.0).abs() < 1e-9);
        assert_eq!(m.tracks()[0].items[0].track_id, ids[0]);
    }

    #[test]
    fn test_reorder_track() {
        let mut m = model(vec![
            Track::new().id("t0").item(item("a", "t0", 0.0, 1.0)),
            Track::new().id("t1").item(item("b", "t1", 0.0, 1.0)),
            Track::new().id("t2").item(item("c", "t2", 0.0, 1.0)),
        ]);
        assert!(m.reorder_track(0, 2));
        let ids: Vec<&str> = m.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t0"]);
        assert!(!m.reorder_track(1, 1));
        assert!(!m.reorder_track(0, 9));
    }

    #[test]
    fn test_delete_track_replaces_last() {
        let mut m = model(vec![Track::new().id("t0")]);
        assert!(m.delete_track("t0"));
        assert_eq!(m.tracks().len(), 1);
        assert_ne!(m.tracks()[0].id, "t0");
    }

    #[test]
    fn test_toggle_magnetic_compacts() {
        let mut m = model(vec![Track::new()
            .id("t0")
            .item(item("a", "t0", 1.0, 2.0))
            .item(item("b", "t0", 4.0, 5.0))]);
        assert!(m.toggle_magnetic("t0"));
        let t0 = &m.tracks()[0];
        assert!(t0.magnetic);
        assert!((t0.items[0].start - 0.0).abs() < 1e-9);
        assert!((t0.items[1].start - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_new_item_at_playhead() {
        let mut m = model(vec![Track::new().id("t0").item(item("a", "t0", 0.0, 2.0))]);
        // Frame 90 at 30 fps is t = 3 s, which is free on t0.
        let id = m.add_new_item(NewItemOptions::new(ItemKind::Image), 90, 30);
        let added = m.item(&id).unwrap();
        assert!((added.start - 3.0).abs() < 1e-9);
        assert!((added.duration() - 5.0).abs() < 1e-9);
    }

    /// Assert the global layout invariants on every track.
    fn assert_invariants(m: &TracksModel) {
        assert!(!m.tracks().is_empty());
        for track in m.tracks() {
            let mut cursor = 0.0;
            for (i, item) in track.items.iter().enumerate() {
                assert!(item.start >= -1e-9, "negative start on {}", item.id);
                assert!(
                    item.duration() >= crate::item::MIN_ITEM_DURATION - 1e-9,
                    "{} below minimum duration",
                    item.id
                );
                if let Some(max) = item.max_duration() {
                    assert!(
                        item.duration() <= max + crate::item::DURATION_TOLERANCE + 1e-9,
                        "{} exceeds its source",
                        item.id
                    );
                }
                if track.magnetic {
                    assert!(
                        (item.start - cursor).abs() < 1e-6,
                        "gap before {} on magnetic track",
                        item.id
                    );
                    cursor = item.end;
                } else if i > 0 {
                    assert!(
                        item.start >= track.items[i - 1].end - 1e-9,
                        "{} overlaps its predecessor",
                        item.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_invariants_hold_through_edit_sequence() {
        let mut m = model(vec![
            Track::new()
                .id("t0")
                .item(item("a", "t0", 0.0, 2.0))
                .item(item("b", "t0", 3.0, 5.0)),
            Track::new()
                .id("t1")
                .magnetic(true)
                .item(item("m1", "t1", 0.0, 1.5))
                .item(item("m2", "t1", 1.5, 4.0)),
            Track::new().id("t2").item(
                Item::new(ItemKind::Video, "t2", 0.0, 3.0).id("v").media(0.0, 4.0),
            ),
        ]);
        assert_invariants(&m);

        m.resize_item("v", 0.0, 10.0);
        assert_invariants(&m);

        m.move_item("a", 3.9, 5.9, "t1");
        assert_invariants(&m);

        m.split_item("m2", 2.0);
        assert_invariants(&m);

        m.toggle_magnetic("t0");
        assert_invariants(&m);

        m.delete_items(&["b".to_string()]);
        assert_invariants(&m);

        m.add_new_item(NewItemOptions::new(ItemKind::Audio), 0, 30);
        assert_invariants(&m);

        let spawns = vec![TrackSpawn {
            items: vec![ItemPlacement { item_id: "v".into(), start: 1.0, end: 4.0 }],
        }];
        m.create_tracks_with_items(0, &spawns);
        assert_invariants(&m);
    }

    #[test]
    fn test_structural_equality_ignores_flags() {
        let a = vec![Track::new().id("t0").item(item("a", "t0", 0.0, 1.0))];
        let mut b = a.clone();
        b[0].muted = true;
        assert!(tracks_structurally_equal(&a, &b));
        b[0].items[0].start = 0.5;
        assert!(!tracks_structurally_equal(&a, &b));
    }
}
