//! Timeline Editor
//!
//! The top-level facade the application talks to. Owns the tracks model,
//! history, transient store, zoom state, and selection; exposes commands for
//! every user-visible edit; and bridges to the host's overlay list and
//! player. Widgets call commands, the host drains [`TimelineEvent`]s.

use std::collections::HashSet;

use crate::config::TimelineConfig;
use crate::drag::{DragCommit, DragController, DragGeometry};
use crate::history::HistoryEngine;
use crate::item::{composition_end, Track};
use crate::marquee::MarqueeController;
use crate::overlay::{
    diff_overlays, transform_overlays_to_tracks, transform_tracks_to_overlays, Overlay,
    OverlayDiff, OverlayHost, PlayerHost,
};
use crate::store::{NewItemDragState, NewItemPayload, TimelineStore};
use crate::time::{frame_to_time, time_to_frame};
use crate::tracks::{NewItemOptions, TracksModel};
use crate::zoom::ZoomController;

/// How long incoming overlay syncs are ignored after a timeline commit, in
/// seconds. Covers debounced downstream writes echoing the commit back.
const UPDATE_GUARD_WINDOW: f64 = 0.3;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// An item was moved
    ItemMoved {
        /// Item id
        id: String,
    },
    /// An item was resized
    ItemResized {
        /// Item id
        id: String,
    },
    /// The selection changed
    SelectionChanged(Vec<String>),
    /// Items were deleted
    ItemsDeleted(Vec<String>),
    /// Items were duplicated
    ItemsDuplicated {
        /// Ids of the duplicated sources
        sources: Vec<String>,
        /// Ids of the created copies
        created: Vec<String>,
    },
    /// An item was split in two
    ItemSplit {
        /// Left-hand (original) id
        id: String,
        /// Right-hand (new) id
        right_id: String,
        /// Split position in seconds
        at: f64,
    },
    /// The tracks list changed in some way
    TracksChanged,
    /// A new item was created
    NewItemAdded {
        /// Id of the created item
        id: String,
    },
    /// The playhead moved
    FrameChanged(i64),
    /// Playback was started
    Play,
    /// Playback was paused
    Pause,
    /// Seek to the composition start
    SeekToStart,
    /// Seek to the composition end
    SeekToEnd,
}

/// The timeline's orchestrating facade.
pub struct TimelineEditor {
    /// Configuration shared with the widgets
    pub config: TimelineConfig,
    /// Transient drag/preview state
    pub store: TimelineStore,
    /// Zoom and scroll state
    pub zoom: ZoomController,
    /// Item drag state machine
    pub drag: DragController,
    /// Rectangle selection state machine
    pub marquee: MarqueeController,
    model: TracksModel,
    history: HistoryEngine,
    selection: HashSet<String>,
    split_mode: bool,
    current_frame: i64,
    playing: bool,
    overlays: Vec<Overlay>,
    external_duration: Option<f64>,
    events: Vec<TimelineEvent>,
    guard_until: f64,
}

impl TimelineEditor {
    /// Create an editor with an empty composition.
    #[must_use]
    pub fn new(config: TimelineConfig) -> Self {
        let model = TracksModel::new(config.clone());
        let history = HistoryEngine::new(model.tracks().to_vec());
        Self {
            zoom: ZoomController::new(config.zoom),
            drag: DragController::new(config.clone()),
            marquee: MarqueeController::new(),
            store: TimelineStore::new(),
            model,
            history,
            selection: HashSet::new(),
            split_mode: false,
            current_frame: 0,
            playing: false,
            overlays: Vec::new(),
            external_duration: None,
            events: Vec::new(),
            guard_until: f64::NEG_INFINITY,
            config,
        }
    }

    /// The current tracks.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        self.model.tracks()
    }

    /// The model, for controllers that need read access.
    #[must_use]
    pub fn model(&self) -> &TracksModel {
        &self.model
    }

    /// Current playhead frame.
    #[must_use]
    pub fn current_frame(&self) -> i64 {
        self.current_frame
    }

    /// Whether playback is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether split mode is armed.
    #[must_use]
    pub fn split_mode(&self) -> bool {
        self.split_mode
    }

    /// Arm or disarm split mode.
    pub fn set_split_mode(&mut self, on: bool) {
        self.split_mode = on;
    }

    /// The selected item ids.
    #[must_use]
    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    /// Selected ids in a stable order, for multi-drag.
    #[must_use]
    pub fn selection_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selection.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Composition duration: the furthest item end, or the externally
    /// supplied total, whichever is larger.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        let content = composition_end(self.model.tracks());
        self.external_duration.unwrap_or(0.0).max(content).max(1.0)
    }

    /// Supply the host's composition duration.
    pub fn set_external_duration(&mut self, seconds: Option<f64>) {
        self.external_duration = seconds;
    }

    /// Whether undo has anything to pop.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo has anything to pop.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the frame clock: expire history batches. Call every frame.
    pub fn tick(&mut self, now: f64) {
        self.history.tick(now);
    }

    // ----- overlay bridge -----

    /// Adopt the host's overlay list.
    ///
    /// Ignored while the re-entrancy guard is armed, so a commit echoing
    /// back through the host does not clobber newer timeline state. Track
    /// flags (magnetic, visibility, mute) are preserved by row.
    pub fn set_overlays(&mut self, overlays: Vec<Overlay>, now: f64) {
        if now < self.guard_until {
            return;
        }
        let previous = self.model.tracks().to_vec();
        let mut tracks = transform_overlays_to_tracks(&overlays, self.config.fps);
        for (row, track) in tracks.iter_mut().enumerate() {
            if let Some(prior) = previous.get(row) {
                track.id = prior.id.clone();
                track.name = prior.name.clone();
                track.magnetic = prior.magnetic;
                track.visible = prior.visible;
                track.muted = prior.muted;
                for item in &mut track.items {
                    item.track_id = track.id.clone();
                }
            }
        }
        self.model.set_tracks(tracks);
        self.overlays = overlays;
        self.history.sync_present(self.model.tracks());
    }

    /// Project the current tracks to overlays and compute the host diff.
    ///
    /// Updates the remembered host state, so the next call only reports
    /// newer changes.
    pub fn take_overlay_diff(&mut self) -> OverlayDiff {
        let exported = transform_tracks_to_overlays(self.model.tracks(), self.config.fps, &self.overlays);
        let diff = diff_overlays(&self.overlays, &exported);
        self.overlays = exported;
        diff
    }

    /// Push the pending overlay diff into the host.
    pub fn sync_overlays_to_host(&mut self, host: &mut dyn OverlayHost) {
        let diff = self.take_overlay_diff();
        if !diff.is_empty() {
            host.apply(diff);
        }
    }

    // ----- commands -----

    /// Begin an item drag gesture at content position `(x, y)`.
    pub fn start_drag(
        &mut self,
        geometry: &DragGeometry,
        item_id: &str,
        x: f32,
        y: f32,
        action: crate::store::DragAction,
    ) {
        let selected = self.selection_vec();
        self.drag
            .on_start(&self.model, &mut self.store, geometry, item_id, x, y, action, &selected);
    }

    /// Feed a pointer move into the active drag gesture.
    pub fn update_drag(&mut self, geometry: &DragGeometry, x: f32, y: f32, now: f64) {
        self.drag
            .on_move(&self.model, &mut self.store, geometry, x, y, now);
    }

    /// Begin a marquee gesture at content position `(x, y)`.
    pub fn begin_marquee(&mut self, x: f32, y: f32, additive: bool) {
        self.marquee.begin(x, y, additive, &mut self.selection);
    }

    /// Feed a pointer move into the active marquee gesture.
    pub fn update_marquee(&mut self, x: f32, y: f32, now: f64, geometry: &DragGeometry) {
        let before = self.selection.clone();
        self.marquee.update(
            x,
            y,
            now,
            self.model.tracks(),
            geometry.timeline_width,
            geometry.total_duration,
            geometry.track_height,
            &mut self.selection,
        );
        if before != self.selection {
            self.events
                .push(TimelineEvent::SelectionChanged(self.selection_vec()));
        }
    }

    /// Finish the marquee gesture.
    pub fn end_marquee(&mut self) {
        self.marquee.end();
    }

    /// Finish a drag gesture and record it.
    pub fn end_drag(&mut self, geometry: &DragGeometry, now: f64) -> DragCommit {
        let gesture = self.store.drag_info.as_ref().map(|info| {
            let ids: Vec<String> = info.snapshots.iter().map(|s| s.id.clone()).collect();
            (info.action, ids)
        });
        let commit = self.drag.on_end(&mut self.model, &mut self.store, geometry);
        if commit != DragCommit::Discarded {
            if let Some((action, ids)) = gesture {
                for id in ids {
                    self.events.push(match action {
                        crate::store::DragAction::Move => TimelineEvent::ItemMoved { id },
                        _ => TimelineEvent::ItemResized { id },
                    });
                }
            }
            self.after_commit(now);
        }
        commit
    }

    /// Move an item programmatically.
    pub fn move_item(&mut self, id: &str, start: f64, end: f64, track_id: &str, now: f64) -> bool {
        let moved = self.model.move_item(id, start, end, track_id);
        if moved {
            self.events.push(TimelineEvent::ItemMoved { id: id.to_string() });
            self.after_commit(now);
        }
        moved
    }

    /// Resize an item programmatically.
    pub fn resize_item(&mut self, id: &str, start: f64, end: f64, now: f64) -> bool {
        let resized = self.model.resize_item(id, start, end);
        if resized {
            self.events.push(TimelineEvent::ItemResized { id: id.to_string() });
            self.after_commit(now);
        }
        resized
    }

    /// Split an item at a timeline position.
    pub fn split_item(&mut self, id: &str, at: f64, now: f64) -> Option<String> {
        let right_id = self.model.split_item(id, at)?;
        self.events.push(TimelineEvent::ItemSplit {
            id: id.to_string(),
            right_id: right_id.clone(),
            at,
        });
        self.after_commit(now);
        Some(right_id)
    }

    /// Split every selected item under the playhead.
    pub fn split_selected_at_playhead(&mut self, now: f64) {
        let at = frame_to_time(self.current_frame, self.config.fps);
        for id in self.selection_vec() {
            self.split_item(&id, at, now);
        }
    }

    /// Delete the selected items.
    pub fn delete_selected(&mut self, now: f64) {
        let ids = self.selection_vec();
        if ids.is_empty() {
            return;
        }
        if self.model.delete_items(&ids) {
            self.selection.clear();
            self.events.push(TimelineEvent::ItemsDeleted(ids));
            self.events.push(TimelineEvent::SelectionChanged(Vec::new()));
            self.after_commit(now);
        }
    }

    /// Duplicate the selected items.
    pub fn duplicate_selected(&mut self, now: f64) {
        let sources = self.selection_vec();
        if sources.is_empty() {
            return;
        }
        let created = self.model.duplicate_items(&sources);
        if !created.is_empty() {
            self.events.push(TimelineEvent::ItemsDuplicated { sources, created });
            self.after_commit(now);
        }
    }

    /// Delete a whole track, clearing any selection inside it first.
    pub fn delete_track(&mut self, track_id: &str, now: f64) {
        if let Some(index) = self.model.track_index(track_id) {
            let doomed: Vec<String> =
                self.model.tracks()[index].items.iter().map(|i| i.id.clone()).collect();
            let before = self.selection.len();
            self.selection.retain(|id| !doomed.contains(id));
            if self.selection.len() != before {
                self.events.push(TimelineEvent::SelectionChanged(self.selection_vec()));
            }
        }
        if self.model.delete_track(track_id) {
            self.after_commit(now);
        }
    }

    /// Flip a track's magnetic flag.
    pub fn toggle_magnetic(&mut self, track_id: &str, now: f64) {
        if self.model.toggle_magnetic(track_id) {
            self.after_commit(now);
        }
    }

    /// Show or hide a track.
    pub fn set_track_visible(&mut self, track_id: &str, visible: bool, now: f64) {
        if self.model.set_track_visible(track_id, visible) {
            self.after_commit(now);
        }
    }

    /// Mute or unmute a track.
    pub fn set_track_muted(&mut self, track_id: &str, muted: bool, now: f64) {
        if self.model.set_track_muted(track_id, muted) {
            self.after_commit(now);
        }
    }

    /// Move a track to another row.
    pub fn reorder_track(&mut self, from: usize, to: usize, now: f64) {
        if self.model.reorder_track(from, to) {
            self.after_commit(now);
        }
    }

    /// Insert an empty track at a row.
    pub fn insert_track_at(&mut self, index: usize, now: f64) -> String {
        let id = self.model.insert_track_at(index);
        self.after_commit(now);
        id
    }

    /// Create a new item near the playhead.
    pub fn add_new_item(&mut self, options: NewItemOptions, now: f64) -> String {
        let id = self
            .model
            .add_new_item(options, self.current_frame, self.config.fps);
        self.events.push(TimelineEvent::NewItemAdded { id: id.clone() });
        self.after_commit(now);
        id
    }

    /// Handle a palette drag payload dropped at content position `(x, y)`.
    ///
    /// The payload is the JSON attached to the browser/system drag transfer.
    /// A parse failure warns and ignores the drop.
    pub fn drop_new_item(
        &mut self,
        payload_json: &str,
        x: f32,
        y: f32,
        geometry: &DragGeometry,
        now: f64,
    ) -> Option<String> {
        let payload: NewItemPayload = match serde_json::from_str(payload_json) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("ignoring undecodable drop payload: {err}");
                return None;
            }
        };
        if !payload.is_new_item {
            return None;
        }

        let drop_time = if geometry.timeline_width > 0.0 {
            f64::from(x) / f64::from(geometry.timeline_width) * geometry.total_duration
        } else {
            0.0
        };
        let drop_row = if geometry.track_height > 0.0 {
            ((y / geometry.track_height).floor().max(0.0) as usize)
                .min(self.model.tracks().len().saturating_sub(1))
        } else {
            0
        };

        let mut options = NewItemOptions::new(payload.kind);
        options.label = payload.label.clone();
        options.duration = payload.duration;
        options.data = payload.data.clone();

        if let Some(index) = self.store.insertion_index {
            let track_id = self.model.insert_track_at(index);
            options.pref_track = self.model.track_index(&track_id);
            options.pref_start = Some(drop_time.max(0.0));
        } else {
            options.pref_track = Some(drop_row);
            options.pref_start = Some(drop_time.max(0.0));
        }

        self.store.new_item_drag = None;
        self.store.set_insertion_index(None);
        let id = self
            .model
            .add_new_item(options, self.current_frame, self.config.fps);
        self.events.push(TimelineEvent::NewItemAdded { id: id.clone() });
        self.after_commit(now);
        Some(id)
    }

    /// Track an external palette drag hovering the timeline.
    pub fn hover_new_item(&mut self, payload: NewItemPayload, x: f32, y: f32) {
        self.store.new_item_drag = Some(NewItemDragState { payload, position: Some((x, y)) });
    }

    /// Undo the latest history entry.
    pub fn undo(&mut self, now: f64) {
        if let Some(tracks) = self.history.undo() {
            self.model.set_tracks(tracks);
            self.prune_selection();
            self.events.push(TimelineEvent::TracksChanged);
            self.guard_until = now + UPDATE_GUARD_WINDOW;
        }
    }

    /// Redo the next history entry.
    pub fn redo(&mut self, now: f64) {
        if let Some(tracks) = self.history.redo() {
            self.model.set_tracks(tracks);
            self.prune_selection();
            self.events.push(TimelineEvent::TracksChanged);
            self.guard_until = now + UPDATE_GUARD_WINDOW;
        }
    }

    // ----- selection -----

    /// Plain or modifier click on an item.
    ///
    /// With a multi-select modifier the item toggles; otherwise it becomes
    /// the only selected item.
    pub fn click_item(&mut self, id: &str, multi: bool) {
        if multi {
            if !self.selection.remove(id) {
                self.selection.insert(id.to_string());
            }
        } else {
            self.selection.clear();
            self.selection.insert(id.to_string());
        }
        self.events.push(TimelineEvent::SelectionChanged(self.selection_vec()));
    }

    /// Right-click selection: keep a multi-selection that already contains
    /// the target, otherwise select only the target.
    pub fn context_click_item(&mut self, id: &str) {
        if !self.selection.contains(id) {
            self.selection.clear();
            self.selection.insert(id.to_string());
            self.events.push(TimelineEvent::SelectionChanged(self.selection_vec()));
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.push(TimelineEvent::SelectionChanged(Vec::new()));
        }
    }

    /// Replace the selection (marquee updates).
    pub fn set_selection(&mut self, ids: HashSet<String>) {
        if ids != self.selection {
            self.selection = ids;
            self.events.push(TimelineEvent::SelectionChanged(self.selection_vec()));
        }
    }

    /// Mutable selection for the marquee controller.
    pub fn selection_mut(&mut self) -> &mut HashSet<String> {
        &mut self.selection
    }

    // ----- playback -----

    /// Jump the playhead to a frame.
    pub fn seek_to_frame(&mut self, frame: i64) {
        let frame = frame.max(0);
        if frame != self.current_frame {
            self.current_frame = frame;
            self.events.push(TimelineEvent::FrameChanged(frame));
        }
    }

    /// Jump the playhead to a time in seconds.
    pub fn seek_to_time(&mut self, time: f64) {
        self.seek_to_frame(time_to_frame(time.max(0.0), self.config.fps));
    }

    /// Start or stop playback.
    pub fn toggle_playback(&mut self) {
        self.playing = !self.playing;
        self.events.push(if self.playing { TimelineEvent::Play } else { TimelineEvent::Pause });
    }

    /// Seek to the start of the composition.
    pub fn seek_to_start(&mut self) {
        self.seek_to_frame(0);
        self.events.push(TimelineEvent::SeekToStart);
    }

    /// Seek to the end of the composition.
    pub fn seek_to_end(&mut self) {
        let end = composition_end(self.model.tracks());
        self.seek_to_time(end);
        self.events.push(TimelineEvent::SeekToEnd);
    }

    /// Adopt the player's frame during playback.
    pub fn observe_player(&mut self, player: &dyn PlayerHost) {
        let frame = player.current_frame();
        if frame != self.current_frame {
            self.current_frame = frame;
        }
    }

    /// Push playback intent into the player.
    pub fn drive_player(&self, player: &mut dyn PlayerHost, events: &[TimelineEvent]) {
        for event in events {
            match event {
                TimelineEvent::FrameChanged(frame) => player.seek_to(*frame),
                TimelineEvent::Play => player.play(),
                TimelineEvent::Pause => player.pause(),
                TimelineEvent::SeekToStart => player.seek_to(0),
                TimelineEvent::SeekToEnd => {
                    let end = composition_end(self.model.tracks());
                    player.seek_to(time_to_frame(end, self.config.fps));
                }
                _ => {}
            }
        }
    }

    // ----- internals -----

    fn after_commit(&mut self, now: f64) {
        self.history.on_tracks_committed(self.model.tracks(), now);
        self.events.push(TimelineEvent::TracksChanged);
        self.guard_until = now + UPDATE_GUARD_WINDOW;
    }

    fn prune_selection(&mut self) {
        let live: HashSet<String> = self
            .model
            .tracks()
            .iter()
            .flat_map(|t| t.items.iter().map(|i| i.id.clone()))
            .collect();
        let before = self.selection.len();
        self.selection.retain(|id| live.contains(id));
        if self.selection.len() != before {
            self.events.push(TimelineEvent::SelectionChanged(self.selection_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::overlay::Overlay;

    fn overlay(id: &str, from: i64, frames: i64, row: usize) -> Overlay {
        Overlay {
            id: id.into(),
            from,
            duration_in_frames: frames,
            row,
            kind: ItemKind::Text,
            label: None,
            color: None,
            speed: None,
            video_start_time: None,
            start_from_sound: None,
            media_duration: None,
            data: serde_json::Value::Null,
        }
    }

    fn editor_with_items() -> TimelineEditor {
        let mut editor = TimelineEditor::new(TimelineConfig::default());
        editor.set_overlays(vec![overlay("a", 0, 60, 0), overlay("b", 90, 60, 0)], 0.0);
        editor
    }

    #[test]
    fn test_set_overlays_builds_tracks() {
        let editor = editor_with_items();
        assert_eq!(editor.tracks().len(), 1);
        assert_eq!(editor.tracks()[0].items.len(), 2);
        assert!((editor.tracks()[0].items[0].end - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_commit_guard_blocks_echoed_sync() {
        let mut editor = editor_with_items();
        let track_id = editor.tracks()[0].id.clone();
        assert!(editor.move_item("a", 4.0, 6.0, &track_id, 10.0));

        // The host echoes the stale overlay list right after the commit.
        editor.set_overlays(vec![overlay("a", 0, 60, 0), overlay("b", 90, 60, 0)], 10.1);
        assert!((editor.model().item("a").unwrap().start - 4.0).abs() < 1e-9);

        // After the guard expires the sync is adopted again.
        editor.set_overlays(vec![overlay("a", 0, 60, 0), overlay("b", 90, 60, 0)], 11.0);
        assert!((editor.model().item("a").unwrap().start - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_diff_after_edit() {
        let mut editor = editor_with_items();
        // Prime the remembered host state.
        let _ = editor.take_overlay_diff();
        let track_id = editor.tracks()[0].id.clone();
        editor.move_item("a", 4.0, 6.0, &track_id, 10.0);
        let diff = editor.take_overlay_diff();
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].id, "a");
        assert_eq!(diff.changed[0].from, 120);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut editor = editor_with_items();
        let track_id = editor.tracks()[0].id.clone();
        editor.move_item("a", 4.0, 6.0, &track_id, 10.0);
        editor.tick(10.5);
        assert!(editor.can_undo());

        editor.undo(11.0);
        assert!((editor.model().item("a").unwrap().start - 0.0).abs() < 1e-9);
        editor.redo(12.0);
        assert!((editor.model().item("a").unwrap().start - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_click_rules() {
        let mut editor = editor_with_items();
        editor.click_item("a", false);
        assert_eq!(editor.selection_vec(), vec!["a".to_string()]);
        editor.click_item("b", true);
        assert_eq!(editor.selection_vec(), vec!["a".to_string(), "b".to_string()]);
        editor.click_item("a", true);
        assert_eq!(editor.selection_vec(), vec!["b".to_string()]);
        // Right-click on an already-selected item keeps the selection.
        editor.click_item("a", true);
        editor.context_click_item("b");
        assert_eq!(editor.selection_vec().len(), 2);
        // Right-click elsewhere collapses to the target.
        editor.context_click_item("a");
        assert_eq!(editor.selection_vec().len(), 2);
        editor.clear_selection();
        editor.context_click_item("a");
        assert_eq!(editor.selection_vec(), vec!["a".to_string()]);
    }

    #[test]
    fn test_delete_selected() {
        let mut editor = editor_with_items();
        editor.click_item("a", false);
        editor.delete_selected(10.0);
        assert!(editor.model().item("a").is_none());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_split_selected_at_playhead() {
        let mut editor = editor_with_items();
        editor.seek_to_frame(30);
        editor.click_item("a", false);
        editor.split_selected_at_playhead(10.0);
        let track = &editor.tracks()[0];
        assert_eq!(track.items.len(), 3);
        assert!((track.items[0].end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_drop_payload_parse_failure_ignored() {
        let mut editor = editor_with_items();
        let geometry = DragGeometry {
            timeline_width: 1000.0,
            total_duration: 10.0,
            track_height: 48.0,
        };
        let before = editor.tracks()[0].items.len();
        assert!(editor.drop_new_item("not json", 100.0, 10.0, &geometry, 10.0).is_none());
        assert_eq!(editor.tracks()[0].items.len(), before);
    }

    #[test]
    fn test_drop_payload_creates_item() {
        let mut editor = editor_with_items();
        let geometry = DragGeometry {
            timeline_width: 1000.0,
            total_duration: 10.0,
            track_height: 48.0,
        };
        let payload = r#"{"isNewItem":true,"type":"image","label":"Logo","duration":2.0}"#;
        let id = editor.drop_new_item(payload, 500.0, 10.0, &geometry, 10.0).unwrap();
        let item = editor.model().item(&id).unwrap();
        assert_eq!(item.kind, ItemKind::Image);
        assert!((item.start - 5.0).abs() < 1e-9);
        assert!((item.duration() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_playback_events() {
        let mut editor = editor_with_items();
        let _ = editor.take_events();
        editor.toggle_playback();
        editor.seek_to_frame(42);
        editor.toggle_playback();
        let events = editor.take_events();
        assert_eq!(
            events,
            vec![
                TimelineEvent::Play,
                TimelineEvent::FrameChanged(42),
                TimelineEvent::Pause,
            ]
        );
    }

    #[test]
    fn test_total_duration_prefers_larger() {
        let mut editor = editor_with_items();
        assert!((editor.total_duration() - 5.0).abs() < 1e-9);
        editor.set_external_duration(Some(30.0));
        assert!((editor.total_duration() - 30.0).abs() < 1e-9);
        editor.set_external_duration(Some(2.0));
        assert!((editor.total_duration() - 5.0).abs() < 1e-9);
    }
}
