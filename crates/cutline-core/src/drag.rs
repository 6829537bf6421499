//! Drag Controller
//!
//! Interprets pointer gestures over the timeline content area, producing
//! ghost previews while the gesture is in flight and committing model
//! mutations on release. One controller instance handles one gesture at a
//! time: `on_start` → `on_move`* → `on_end`.
//!
//! All coordinates are content-space pixels: x grows with time, y grows
//! downward from the top of the first track. The widget layer translates
//! pointer events into this space before calling in.

use crate::config::TimelineConfig;
use crate::gaps::{can_fit_at_position, magnetic_insertion_preview, push_items_during_resize};
use crate::snap::{collect_edges, snap_to_grid_and_edges};
use crate::store::{
    DragAction, DragInfo, DragPosition, DragSnapshot, FloatingGhost, Ghost, LivePreview,
    MagneticPreview, TimelineStore,
};
use crate::tracks::{ItemPlacement, TrackSpawn, TracksModel};

/// Fraction of a row height around a boundary that arms new-track insertion.
const INSERTION_ZONE: f32 = 0.25;

/// Minimum seconds between processed move events (~60 Hz).
const MOVE_THROTTLE: f64 = 1.0 / 60.0;

/// Pixel geometry of the timeline content area for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct DragGeometry {
    /// Width of the content area in pixels
    pub timeline_width: f32,
    /// Seconds represented by the content width
    pub total_duration: f64,
    /// Height of one track row in pixels
    pub track_height: f32,
}

impl DragGeometry {
    fn pixels_to_time(&self, dx: f32) -> f64 {
        if self.timeline_width <= 0.0 {
            return 0.0;
        }
        f64::from(dx) / f64::from(self.timeline_width) * self.total_duration
    }
}

/// What `on_end` did with the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragCommit {
    /// Nothing changed (invalid drop or no gesture)
    Discarded,
    /// Items were moved or resized on existing tracks
    Applied,
    /// A new track was inserted and items moved onto it
    InsertedTrack,
}

/// State machine turning pointer input into model mutations.
#[derive(Debug)]
pub struct DragController {
    config: TimelineConfig,
    last_move_at: f64,
}

impl DragController {
    /// Create a controller with the given configuration.
    #[must_use]
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            last_move_at: f64::NEG_INFINITY,
        }
    }

    /// Begin a gesture on `item_id` at content position `(x, y)`.
    ///
    /// Move gestures on an item inside the current selection take the whole
    /// selection along; resize gestures always affect just the one item.
    pub fn on_start(
        &mut self,
        model: &TracksModel,
        store: &mut TimelineStore,
        geometry: &DragGeometry,
        item_id: &str,
        x: f32,
        y: f32,
        action: DragAction,
        selected: &[String],
    ) {
        let Some((track_idx, item_idx)) = model.find_item(item_id) else {
            log::warn!("drag start on unknown item {item_id}");
            return;
        };
        let primary = &model.tracks()[track_idx].items[item_idx];

        let drag_ids: Vec<String> =
            if action == DragAction::Move && selected.iter().any(|s| s == item_id) {
                selected.to_vec()
            } else {
                vec![item_id.to_string()]
            };

        let mut snapshots = Vec::with_capacity(drag_ids.len());
        for id in &drag_ids {
            let Some((ti, ii)) = model.find_item(id) else { continue };
            let item = &model.tracks()[ti].items[ii];
            snapshots.push(DragSnapshot {
                id: id.clone(),
                start: item.start,
                duration: item.duration(),
                row: ti,
                kind: item.kind,
                media_start: item.media_start,
                media_src_duration: item.media_src_duration,
                speed: item.speed,
            });
        }

        let info = DragInfo {
            start_x: x,
            start_y: y,
            start_position: primary.start,
            start_duration: primary.duration(),
            start_row: track_idx,
            action,
            primary_id: item_id.to_string(),
            snapshots,
            current_start: primary.start,
            current_duration: primary.duration(),
        };

        let track_count = model.tracks().len();
        let ghosts = info
            .snapshots
            .iter()
            .map(|s| ghost_for(s.start, s.duration, s.row, track_count, true, geometry.total_duration))
            .collect();
        store.begin_drag(item_id.to_string(), info);
        store.set_ghosts(Some(ghosts));
        self.last_move_at = f64::NEG_INFINITY;
    }

    /// Process a pointer move at `now` seconds. Throttled to ~60 Hz.
    pub fn on_move(
        &mut self,
        model: &TracksModel,
        store: &mut TimelineStore,
        geometry: &DragGeometry,
        x: f32,
        y: f32,
        now: f64,
    ) {
        let Some(info) = store.drag_info.clone() else {
            return;
        };
        if now - self.last_move_at < MOVE_THROTTLE {
            return;
        }
        self.last_move_at = now;
        let track_count = model.tracks().len();
        let total = geometry.total_duration;

        let mut delta_time = geometry.pixels_to_time(x - info.start_x);
        let raw_delta_track =
            (f64::from((y - info.start_y) / geometry.track_height)).round() as i64;

        // Clamp so no dragged item leaves the track range or goes negative.
        let min_row = info.snapshots.iter().map(|s| s.row).min().unwrap_or(0) as i64;
        let max_row = info.snapshots.iter().map(|s| s.row).max().unwrap_or(0) as i64;
        let delta_track = raw_delta_track
            .max(-min_row)
            .min(track_count as i64 - 1 - max_row);
        let min_start = info
            .snapshots
            .iter()
            .map(|s| s.start)
            .fold(f64::INFINITY, f64::min);
        if min_start.is_finite() {
            delta_time = delta_time.max(-min_start);
        }

        let target_row = (info.start_row as i64 + delta_track).clamp(0, track_count as i64 - 1) as usize;
        let exclude: Vec<&str> = info.snapshots.iter().map(|s| s.id.as_str()).collect();
        let edges = collect_edges(model.tracks(), target_row, &exclude);
        let multi = info.snapshots.len() > 1;

        let (new_start, new_duration, valid, magnetic_start) = match info.action {
            DragAction::Move => self.plan_move(
                model, &info, &edges, target_row, delta_time, multi, &exclude,
            ),
            DragAction::ResizeStart => self.plan_resize_start(model, &info, &edges, delta_time),
            DragAction::ResizeEnd => self.plan_resize_end(model, &info, &edges, delta_time),
        };

        // Re-derive the common delta from the primary's constrained start so
        // multi-selections keep their relative layout.
        let constrained_delta = new_start - info.start_position;

        // Near a row boundary a move gesture proposes a brand-new track.
        let insertion = if info.action == DragAction::Move {
            insertion_candidate(y, geometry.track_height, track_count)
        } else {
            None
        };

        if let Some(index) = insertion {
            let width_px = (new_duration / total * f64::from(geometry.timeline_width)) as f32;
            store.set_floating_ghost(Some(FloatingGhost {
                x,
                y,
                width: width_px,
                valid: true,
                label: model.item(&info.primary_id).and_then(|i| i.label.clone()),
            }));
            store.set_insertion_index(Some(index));
            store.set_ghosts(None);
            store.set_magnetic_preview(None);
            store.is_valid_drop = true;
        } else {
            let ghosts: Vec<Ghost> = info
                .snapshots
                .iter()
                .map(|s| {
                    let row = (s.row as i64 + delta_track).clamp(0, track_count as i64 - 1) as usize;
                    let start = if s.id == info.primary_id {
                        magnetic_start.unwrap_or(new_start)
                    } else {
                        (s.start + constrained_delta).max(0.0)
                    };
                    let duration = if s.id == info.primary_id { new_duration } else { s.duration };
                    ghost_for(start, duration, row, track_count, valid, total)
                })
                .collect();
            store.set_floating_ghost(None);
            store.set_insertion_index(None);
            store.set_ghosts(Some(ghosts));
            store.is_valid_drop = valid;

            let target_track = &model.tracks()[target_row];
            if info.action == DragAction::Move && target_track.magnetic && !multi {
                store.set_magnetic_preview(Some(magnetic_preview_for(
                    model, target_row, &info, new_start, new_duration,
                )));
            } else {
                store.set_magnetic_preview(None);
            }
        }

        let shown_start = magnetic_start.unwrap_or(new_start);
        store.current_drag_position = Some(DragPosition {
            start: shown_start,
            end: shown_start + new_duration,
        });
        for snapshot in &info.snapshots {
            let start = if snapshot.id == info.primary_id {
                shown_start
            } else {
                (snapshot.start + constrained_delta).max(0.0)
            };
            let duration = if snapshot.id == info.primary_id {
                new_duration
            } else {
                snapshot.duration
            };
            store
                .live_preview_updates
                .insert(snapshot.id.clone(), LivePreview { start: Some(start), end: Some(start + duration) });
        }
        if let Some(live) = store.drag_info.as_mut() {
            live.current_start = new_start;
            live.current_duration = new_duration;
        }
    }

    /// Commit or discard the gesture and clear the transient state.
    ///
    /// `geometry` must describe the same content area the moves were fed
    /// with, since the ghosts are stored in its percentage space.
    pub fn on_end(
        &mut self,
        model: &mut TracksModel,
        store: &mut TimelineStore,
        geometry: &DragGeometry,
    ) -> DragCommit {
        let Some(info) = store.drag_info.clone() else {
            store.reset_drag_state();
            return DragCommit::Discarded;
        };

        let ghosts = store.ghost_elements.clone();
        let insertion_index = store.insertion_index;
        let valid = store.is_valid_drop;
        let track_count = model.tracks().len();
        store.reset_drag_state();

        if let (Some(index), None) = (insertion_index, ghosts.as_ref()) {
            return self.commit_into_new_track(model, &info, index);
        }

        let Some(ghosts) = ghosts else {
            return DragCommit::Discarded;
        };
        if !valid {
            return DragCommit::Discarded;
        }

        let total = geometry.total_duration.max(1e-9);
        let mut applied = false;
        for (ghost, snapshot) in ghosts.iter().zip(&info.snapshots) {
            let start = ghost.left_pct / 100.0 * total;
            let duration = ghost.width_pct / 100.0 * total;
            let row = ((ghost.top_pct * track_count as f64 / 100.0).round() as i64)
                .clamp(0, track_count as i64 - 1) as usize;
            match info.action {
                DragAction::Move => {
                    let track_id = model.tracks()[row].id.clone();
                    applied |= model.move_item(&snapshot.id, start, start + duration, &track_id);
                }
                DragAction::ResizeStart | DragAction::ResizeEnd => {
                    applied |= model.resize_item(&snapshot.id, start, start + duration);
                }
            }
        }
        if applied { DragCommit::Applied } else { DragCommit::Discarded }
    }

    /// Abort the gesture without committing.
    pub fn cancel(&mut self, store: &mut TimelineStore) {
        store.reset_drag_state();
    }

    fn plan_move(
        &self,
        model: &TracksModel,
        info: &DragInfo,
        edges: &[f64],
        target_row: usize,
        delta_time: f64,
        multi: bool,
        exclude: &[&str],
    ) -> (f64, f64, bool, Option<f64>) {
        let snapped = snap_to_grid_and_edges(
            info.start_position + delta_time,
            edges,
            &self.config,
            false,
        );
        let new_start = snapped.max(0.0);
        let duration = info.start_duration;
        let target = &model.tracks()[target_row];

        if target.magnetic {
            if multi {
                // Multi-item drops onto magnetic tracks are refused.
                return (new_start, duration, false, None);
            }
            let remaining: Vec<_> = target
                .items
                .iter()
                .filter(|i| !exclude.contains(&i.id.as_str()))
                .cloned()
                .collect();
            let insertion = magnetic_insertion_preview(&remaining, duration, new_start);
            return (new_start, duration, true, Some(insertion.insertion_start));
        }

        let mut valid = true;
        if multi {
            let delta = new_start - info.start_position;
            for snapshot in &info.snapshots {
                let row = target_row as i64 + snapshot.row as i64 - info.start_row as i64;
                if row < 0 || row as usize >= model.tracks().len() {
                    valid = false;
                    break;
                }
                let track = &model.tracks()[row as usize];
                if track.magnetic
                    || !can_fit_at_position(
                        &track.items,
                        snapshot.start + delta,
                        snapshot.duration,
                        exclude,
                    )
                {
                    valid = false;
                    break;
                }
            }
        } else {
            valid = can_fit_at_position(&target.items, new_start, duration, exclude);
        }
        (new_start, duration, valid, None)
    }

    fn plan_resize_start(
        &self,
        model: &TracksModel,
        info: &DragInfo,
        edges: &[f64],
        delta_time: f64,
    ) -> (f64, f64, bool, Option<f64>) {
        let original_end = info.start_position + info.start_duration;
        let snapped = snap_to_grid_and_edges(
            info.start_position + delta_time,
            edges,
            &self.config,
            false,
        );
        let mut new_duration = (original_end - snapped).max(self.config.min_item_duration);
        let mut new_start = original_end - new_duration;

        let snapshot = &info.snapshots[0];
        if snapshot.kind.has_media_source() {
            if let Some(src) = snapshot.media_src_duration {
                let media_start =
                    (snapshot.media_start.unwrap_or(0.0) + (new_start - snapshot.start)).max(0.0);
                let speed = if snapshot.speed > 0.0 { snapshot.speed } else { 1.0 };
                let max = (src / speed - media_start).max(0.0);
                if new_duration > max + self.config.duration_tolerance {
                    new_duration = max;
                    new_start = original_end - new_duration;
                }
            }
        }

        self.resolve_resize(model, info, new_start, new_start + new_duration)
    }

    fn plan_resize_end(
        &self,
        model: &TracksModel,
        info: &DragInfo,
        edges: &[f64],
        delta_time: f64,
    ) -> (f64, f64, bool, Option<f64>) {
        let original_end = info.start_position + info.start_duration;
        let snapped = snap_to_grid_and_edges(original_end + delta_time, edges, &self.config, false);
        let mut new_duration = (snapped - info.start_position).max(self.config.min_item_duration);

        let snapshot = &info.snapshots[0];
        if snapshot.kind.has_media_source() {
            if let Some(src) = snapshot.media_src_duration {
                let media_start = snapshot.media_start.unwrap_or(0.0);
                let speed = if snapshot.speed > 0.0 { snapshot.speed } else { 1.0 };
                let max = (src / speed - media_start).max(0.0);
                if new_duration > max + self.config.duration_tolerance {
                    new_duration = max;
                }
            }
        }

        self.resolve_resize(model, info, info.start_position, info.start_position + new_duration)
    }

    /// Run the push preview so the ghost reflects the achievable geometry.
    fn resolve_resize(
        &self,
        model: &TracksModel,
        info: &DragInfo,
        new_start: f64,
        new_end: f64,
    ) -> (f64, f64, bool, Option<f64>) {
        let track = &model.tracks()[info.start_row];
        if track.magnetic {
            return (new_start, new_end - new_start, true, None);
        }
        match push_items_during_resize(&track.items, &info.primary_id, new_start, new_end) {
            Some(outcome) => (
                outcome.actual_start,
                outcome.actual_end - outcome.actual_start,
                true,
                None,
            ),
            None => (new_start, new_end - new_start, false, None),
        }
    }

    fn commit_into_new_track(
        &self,
        model: &mut TracksModel,
        info: &DragInfo,
        index: usize,
    ) -> DragCommit {
        let delta = info.current_start - info.start_position;
        if info.snapshots.len() == 1 {
            let track_id = model.insert_track_at(index);
            let snapshot = &info.snapshots[0];
            model.move_item(
                &snapshot.id,
                info.current_start,
                info.current_start + info.current_duration,
                &track_id,
            );
            return DragCommit::InsertedTrack;
        }

        // Group by original row so co-tracked items stay co-tracked.
        let mut rows: Vec<usize> = info.snapshots.iter().map(|s| s.row).collect();
        rows.sort_unstable();
        rows.dedup();
        let spawns: Vec<TrackSpawn> = rows
            .iter()
            .map(|&row| TrackSpawn {
                items: info
                    .snapshots
                    .iter()
                    .filter(|s| s.row == row)
                    .map(|s| ItemPlacement {
                        item_id: s.id.clone(),
                        start: (s.start + delta).max(0.0),
                        end: (s.start + delta).max(0.0) + s.duration,
                    })
                    .collect(),
            })
            .collect();
        model.create_tracks_with_items(index, &spawns);
        DragCommit::InsertedTrack
    }
}

fn ghost_for(
    start: f64,
    duration: f64,
    row: usize,
    track_count: usize,
    valid: bool,
    total: f64,
) -> Ghost {
    let total = if total > 0.0 { total } else { 1.0 };
    Ghost {
        left_pct: start / total * 100.0,
        width_pct: duration / total * 100.0,
        top_pct: if track_count > 0 {
            row as f64 * 100.0 / track_count as f64
        } else {
            0.0
        },
        valid,
    }
}

fn insertion_candidate(y: f32, track_height: f32, track_count: usize) -> Option<usize> {
    if track_height <= 0.0 {
        return None;
    }
    if y < 0.0 {
        return Some(0);
    }
    let row_f = y / track_height;
    if row_f >= track_count as f32 {
        return Some(track_count);
    }
    let row = row_f.floor() as usize;
    let fraction = row_f - row_f.floor();
    if fraction < INSERTION_ZONE {
        Some(row)
    } else if fraction > 1.0 - INSERTION_ZONE {
        Some(row + 1)
    } else {
        None
    }
}

fn magnetic_preview_for(
    model: &TracksModel,
    target_row: usize,
    info: &DragInfo,
    new_start: f64,
    duration: f64,
) -> MagneticPreview {
    let target = &model.tracks()[target_row];
    let remaining: Vec<_> = target
        .items
        .iter()
        .filter(|i| i.id != info.primary_id)
        .cloned()
        .collect();
    let insertion = magnetic_insertion_preview(&remaining, duration, new_start);
    let mut items = insertion.preview_items.clone();
    for (i, preview) in items.iter_mut().enumerate() {
        if i >= insertion.insertion_index {
            preview.start += duration;
            preview.end += duration;
        }
    }
    MagneticPreview {
        track_id: target.id.clone(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ItemKind, Track};

    fn geometry() -> DragGeometry {
        DragGeometry {
            timeline_width: 1000.0,
            total_duration: 10.0,
            track_height: 48.0,
        }
    }

    fn two_item_model() -> TracksModel {
        TracksModel::from_tracks(
            vec![Track::new()
                .id("t0")
                .item(Item::new(ItemKind::Text, "t0", 0.0, 2.0).id("a"))
                .item(Item::new(ItemKind::Text, "t0", 3.0, 5.0).id("b"))],
            TimelineConfig::default(),
        )
    }

    fn drag(
        controller: &mut DragController,
        model: &mut TracksModel,
        store: &mut TimelineStore,
        id: &str,
        from: (f32, f32),
        to: (f32, f32),
        action: DragAction,
    ) -> DragCommit {
        controller.on_start(model, store, &geometry(), id, from.0, from.1, action, &[]);
        controller.on_move(model, store, &geometry(), to.0, to.1, 100.0);
        controller.on_end(model, store, &geometry())
    }

    #[test]
    fn test_move_into_collision_is_discarded() {
        let mut model = two_item_model();
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        // 2.97 s snaps onto B's leading edge at 3.0, which collides.
        let commit = drag(
            &mut controller,
            &mut model,
            &mut store,
            "a",
            (0.0, 24.0),
            (297.0, 24.0),
            DragAction::Move,
        );
        assert_eq!(commit, DragCommit::Discarded);
        let a = model.item("a").unwrap();
        assert!((a.start - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_snaps_to_grid_and_commits() {
        let mut model = two_item_model();
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        // 1.04 s snaps to the 1.0 grid line; [1,3) clears B at [3,5).
        let commit = drag(
            &mut controller,
            &mut model,
            &mut store,
            "a",
            (0.0, 24.0),
            (104.0, 24.0),
            DragAction::Move,
        );
        assert_eq!(commit, DragCommit::Applied);
        let a = model.item("a").unwrap();
        assert!((a.start - 1.0).abs() < 1e-9);
        assert!((a.end - 3.0).abs() < 1e-9);
        assert!(!store.is_dragging);
    }

    #[test]
    fn test_resize_end_pushes_neighbor() {
        let mut model = TracksModel::from_tracks(
            vec![Track::new()
                .id("t0")
                .item(Item::new(ItemKind::Text, "t0", 0.0, 2.0).id("a"))
                .item(Item::new(ItemKind::Text, "t0", 3.0, 4.0).id("b"))
                .item(Item::new(ItemKind::Text, "t0", 5.0, 6.0).id("c"))],
            TimelineConfig::default(),
        );
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        // Pull A's right edge from 2.0 to 3.5 (+150 px at 10 s / 1000 px).
        let commit = drag(
            &mut controller,
            &mut model,
            &mut store,
            "a",
            (200.0, 24.0),
            (350.0, 24.0),
            DragAction::ResizeEnd,
        );
        assert_eq!(commit, DragCommit::Applied);
        assert!((model.item("a").unwrap().end - 3.5).abs() < 1e-9);
        assert!((model.item("b").unwrap().start - 3.5).abs() < 1e-9);
        assert!((model.item("c").unwrap().start - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_end_clamps_to_source() {
        let mut model = TracksModel::from_tracks(
            vec![Track::new().id("t0").item(
                Item::new(ItemKind::Video, "t0", 5.0, 6.0).id("a").media(8.0, 10.0),
            )],
            TimelineConfig::default(),
        );
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        // Request end at 9 s; only 2 s of source remain, so it stops at 7.
        let commit = drag(
            &mut controller,
            &mut model,
            &mut store,
            "a",
            (600.0, 24.0),
            (900.0, 24.0),
            DragAction::ResizeEnd,
        );
        assert_eq!(commit, DragCommit::Applied);
        assert!((model.item("a").unwrap().end - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_hover_proposes_insertion() {
        let mut model = two_item_model();
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        controller.on_start(&model, &mut store, &geometry(), "a", 0.0, 24.0, DragAction::Move, &[]);
        // 2 px into the row is well inside the boundary zone.
        controller.on_move(&model, &mut store, &geometry(), 0.0, 2.0, 100.0);
        assert_eq!(store.insertion_index, Some(0));
        assert!(store.ghost_elements.is_none());
        assert!(store.floating_ghost.is_some());

        let commit = controller.on_end(&mut model, &mut store, &geometry());
        assert_eq!(commit, DragCommit::InsertedTrack);
        assert_eq!(model.tracks().len(), 2);
        assert_eq!(model.tracks()[0].items.len(), 1);
        assert_eq!(model.tracks()[0].items[0].id, "a");
    }

    #[test]
    fn test_move_throttle_skips_rapid_events() {
        let model = two_item_model();
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        controller.on_start(&model, &mut store, &geometry(), "a", 0.0, 24.0, DragAction::Move, &[]);
        controller.on_move(&model, &mut store, &geometry(), 100.0, 24.0, 1.0);
        let first = store.current_drag_position;
        controller.on_move(&model, &mut store, &geometry(), 200.0, 24.0, 1.001);
        assert_eq!(store.current_drag_position, first);
        controller.on_move(&model, &mut store, &geometry(), 200.0, 24.0, 1.1);
        assert_ne!(store.current_drag_position, first);
    }

    #[test]
    fn test_multi_drag_keeps_relative_layout() {
        let mut model = TracksModel::from_tracks(
            vec![
                Track::new()
                    .id("t0")
                    .item(Item::new(ItemKind::Text, "t0", 1.0, 2.0).id("a"))
                    .item(Item::new(ItemKind::Text, "t0", 4.0, 5.0).id("b")),
                Track::new().id("t1").item(Item::new(ItemKind::Text, "t1", 8.0, 9.0).id("z")),
            ],
            TimelineConfig::default(),
        );
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        let selection = vec!["a".to_string(), "b".to_string()];
        controller.on_start(&model, &mut store, &geometry(), "a", 100.0, 24.0, DragAction::Move, &selection);
        controller.on_move(&model, &mut store, &geometry(), 200.0, 24.0, 100.0);
        assert!(store.is_valid_drop);
        let commit = controller.on_end(&mut model, &mut store, &geometry());
        assert_eq!(commit, DragCommit::Applied);
        let a = model.item("a").unwrap();
        let b = model.item("b").unwrap();
        assert!((a.start - 2.0).abs() < 1e-9);
        assert!((b.start - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_drag_negative_start_clamped() {
        let mut model = TracksModel::from_tracks(
            vec![Track::new()
                .id("t0")
                .item(Item::new(ItemKind::Text, "t0", 0.5, 1.5).id("a"))
                .item(Item::new(ItemKind::Text, "t0", 3.0, 4.0).id("b"))],
            TimelineConfig::default(),
        );
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        let selection = vec!["a".to_string(), "b".to_string()];
        controller.on_start(&model, &mut store, &geometry(), "b", 300.0, 24.0, DragAction::Move, &selection);
        // A 5 s leftward pull would put A at -4.5; the clamp stops at -0.5.
        controller.on_move(&model, &mut store, &geometry(), -200.0, 24.0, 100.0);
        controller.on_end(&mut model, &mut store, &geometry());
        let a = model.item("a").unwrap();
        let b = model.item("b").unwrap();
        assert!(a.start >= -1e-9);
        assert!((b.start - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_multi_drop_on_magnetic_is_invalid() {
        let mut model = TracksModel::from_tracks(
            vec![
                Track::new()
                    .id("t0")
                    .item(Item::new(ItemKind::Text, "t0", 0.0, 1.0).id("a"))
                    .item(Item::new(ItemKind::Text, "t0", 2.0, 3.0).id("b")),
                Track::new()
                    .id("t1")
                    .magnetic(true)
                    .item(Item::new(ItemKind::Text, "t1", 0.0, 2.0).id("m")),
            ],
            TimelineConfig::default(),
        );
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        let selection = vec!["a".to_string(), "b".to_string()];
        controller.on_start(&model, &mut store, &geometry(), "a", 0.0, 24.0, DragAction::Move, &selection);
        // Drag down one full row into the magnetic track's middle.
        controller.on_move(&model, &mut store, &geometry(), 0.0, 72.0, 100.0);
        assert!(!store.is_valid_drop);
        let commit = controller.on_end(&mut model, &mut store, &geometry());
        assert_eq!(commit, DragCommit::Discarded);
    }

    #[test]
    fn test_single_move_onto_magnetic_inserts() {
        let mut model = TracksModel::from_tracks(
            vec![
                Track::new().id("t0").item(Item::new(ItemKind::Text, "t0", 0.0, 1.0).id("x")),
                Track::new()
                    .id("t1")
                    .magnetic(true)
                    .item(Item::new(ItemKind::Text, "t1", 0.0, 2.0).id("m1"))
                    .item(Item::new(ItemKind::Text, "t1", 2.0, 4.0).id("m2")),
            ],
            TimelineConfig::default(),
        );
        let mut store = TimelineStore::new();
        let mut controller = DragController::new(TimelineConfig::default());
        controller.on_start(&model, &mut store, &geometry(), "x", 50.0, 24.0, DragAction::Move, &[]);
        // Into the middle of t1 (y = 72 px), near t = 0.5 s.
        controller.on_move(&model, &mut store, &geometry(), 50.0, 72.0, 100.0);
        assert!(store.is_valid_drop);
        assert!(store.magnetic_preview.is_some());
        let commit = controller.on_end(&mut model, &mut store, &geometry());
        assert_eq!(commit, DragCommit::Applied);
        let t1 = &model.tracks()[model.track_index("t1").unwrap()];
        assert_eq!(t1.items.len(), 3);
        // The track stays contiguous from zero.
        let mut cursor = 0.0;
        for item in &t1.items {
            assert!((item.start - cursor).abs() < 1e-9);
            cursor = item.end;
        }
    }
}
