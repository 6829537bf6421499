//! Gap Geometry
//!
//! Pure interval math over item arrays: finding and closing gaps, magnetic
//! insertion previews, resize-with-push, and placement of new items. All
//! functions expect items sorted by start and never mutate their input.

use crate::item::{Item, Track, MIN_ITEM_DURATION};

/// Comparison slack for adjacency checks.
const EPS: f64 = 1e-9;

/// An empty interval between items on a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Gap start in seconds
    pub start: f64,
    /// Gap end in seconds
    pub end: f64,
}

impl Gap {
    /// Width of the gap in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Positions of one item inside a magnetic preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    /// Item id
    pub id: String,
    /// Projected start in seconds
    pub start: f64,
    /// Projected end in seconds
    pub end: f64,
}

/// Result of projecting an insertion into a magnetic track.
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticInsertion {
    /// Index at which the new item slots into the item order
    pub insertion_index: usize,
    /// Start position the new item would take
    pub insertion_start: f64,
    /// Existing items projected to their compacted magnetic positions
    pub preview_items: Vec<PreviewItem>,
}

/// Result of a resize with neighbor pushing.
#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    /// The whole track's items after the resize, sorted by start
    pub items: Vec<Item>,
    /// The start the resized item actually received
    pub actual_start: f64,
    /// The end the resized item actually received
    pub actual_end: f64,
}

/// Find all gaps between items, including a leading gap from zero.
///
/// No trailing gap is reported; the timeline has no fixed right edge.
#[must_use]
pub fn find_gaps(items: &[Item]) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut cursor = 0.0;
    for item in items {
        if item.start > cursor + EPS {
            gaps.push(Gap { start: cursor, end: item.start });
        }
        cursor = cursor.max(item.end);
    }
    gaps
}

/// Place items back to back from zero, preserving order and durations.
#[must_use]
pub fn close_gaps(items: &[Item]) -> Vec<Item> {
    let mut cursor = 0.0;
    items
        .iter()
        .map(|item| {
            let duration = item.duration();
            let mut moved = item.clone();
            moved.start = cursor;
            moved.end = cursor + duration;
            cursor = moved.end;
            moved
        })
        .collect()
}

/// Project where an item of `insert_duration` would land on a magnetic track.
///
/// Each existing item is first projected to its compacted position. The
/// insertion slot is before the first item whose projected midpoint lies past
/// the center of the incoming item; `insertion_start` is the total duration
/// of the items before the slot. `preview_items` hold the compacted
/// positions, so feeding them back through [`close_gaps`] is a no-op.
#[must_use]
pub fn magnetic_insertion_preview(
    items: &[Item],
    insert_duration: f64,
    intended_start: f64,
) -> MagneticInsertion {
    let insert_center = intended_start + insert_duration / 2.0;
    let mut preview_items = Vec::with_capacity(items.len());
    let mut insertion_index = items.len();
    let mut cursor = 0.0;

    for (i, item) in items.iter().enumerate() {
        let duration = item.duration();
        let midpoint = cursor + duration / 2.0;
        if insertion_index == items.len() && midpoint >= insert_center - EPS {
            insertion_index = i;
        }
        preview_items.push(PreviewItem {
            id: item.id.clone(),
            start: cursor,
            end: cursor + duration,
        });
        cursor += duration;
    }

    let insertion_start: f64 = items[..insertion_index].iter().map(Item::duration).sum();

    MagneticInsertion {
        insertion_index,
        insertion_start,
        preview_items,
    }
}

/// Build the final magnetic layout with `inserted` slotted in.
///
/// Items before the slot keep their compacted positions; the inserted item
/// takes `insertion_start`; everything after shifts right by its duration.
#[must_use]
pub fn apply_magnetic_insertion(
    items: &[Item],
    mut inserted: Item,
    insertion: &MagneticInsertion,
) -> Vec<Item> {
    let duration = inserted.duration();
    let mut result = Vec::with_capacity(items.len() + 1);

    for (i, item) in items.iter().enumerate() {
        let preview = &insertion.preview_items[i];
        let mut moved = item.clone();
        if i < insertion.insertion_index {
            moved.start = preview.start;
            moved.end = preview.end;
        } else {
            moved.start = preview.start + duration;
            moved.end = preview.end + duration;
        }
        result.push(moved);
    }

    inserted.start = insertion.insertion_start;
    inserted.end = insertion.insertion_start + duration;
    result.insert(insertion.insertion_index, inserted);
    result
}

/// Resize an item on a non-magnetic track, pushing neighbors as needed.
///
/// Expanding left clamps against the nearest preceding neighbor; expanding
/// right pushes overlapped items forward, cascading down the track. Video
/// and audio items are additionally clamped to their source duration, with
/// `media_start` following the left edge.
#[must_use]
pub fn push_items_during_resize(
    items: &[Item],
    resized_id: &str,
    new_start: f64,
    new_end: f64,
) -> Option<ResizeOutcome> {
    let resized = items.iter().find(|i| i.id == resized_id)?;
    let original_start = resized.start;

    let mut actual_start = new_start.max(0.0);
    let mut actual_end = new_end;

    // Expanding left stops at the closest neighbor end in (new_start, original_start].
    if actual_start < original_start {
        let limit = items
            .iter()
            .filter(|i| i.id != resized_id)
            .map(|i| i.end)
            .filter(|&e| e > actual_start + EPS && e <= original_start + EPS)
            .fold(f64::NEG_INFINITY, f64::max);
        if limit.is_finite() {
            actual_start = actual_start.max(limit);
        }
    }

    if actual_end - actual_start < MIN_ITEM_DURATION {
        actual_end = actual_start + MIN_ITEM_DURATION;
    }

    // Source-duration clamp; the left delta shifts the media offset first.
    let mut updated = resized.clone();
    if updated.kind.has_media_source() {
        let delta_left = actual_start - original_start;
        if let Some(media_start) = updated.media_start {
            updated.media_start = Some((media_start + delta_left).max(0.0));
        } else if delta_left.abs() > EPS {
            updated.media_start = Some(delta_left.max(0.0));
        }
        if let Some(max) = updated.max_duration() {
            if actual_end - actual_start > max + crate::item::DURATION_TOLERANCE {
                if new_start < original_start && (new_end - resized.end).abs() < EPS {
                    // Left-edge resize: give back the excess on the left.
                    actual_start = actual_end - max;
                    if let (Some(media_start), true) =
                        (resized.media_start, updated.media_start.is_some())
                    {
                        updated.media_start =
                            Some((media_start + (actual_start - original_start)).max(0.0));
                    }
                } else {
                    actual_end = actual_start + max;
                }
            }
        }
    }

    updated.start = actual_start;
    updated.end = actual_end;

    // Push everything the new right edge now overlaps, chaining forward.
    let mut result: Vec<Item> = Vec::with_capacity(items.len());
    let mut push_cursor = actual_end;
    for item in items {
        if item.id == resized_id {
            result.push(updated.clone());
            continue;
        }
        if item.start >= original_start - EPS && item.start < push_cursor - EPS {
            let shift = push_cursor - item.start;
            let mut moved = item.clone();
            moved.start += shift;
            moved.end += shift;
            push_cursor = moved.end;
            result.push(moved);
        } else {
            result.push(item.clone());
        }
    }

    result.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));

    Some(ResizeOutcome {
        items: result,
        actual_start,
        actual_end,
    })
}

/// Whether `[start, start + duration)` is free of the given items.
#[must_use]
pub fn can_fit_at_position(items: &[Item], start: f64, duration: f64, exclude: &[&str]) -> bool {
    if start < -EPS {
        return false;
    }
    let end = start + duration;
    items
        .iter()
        .filter(|i| !exclude.contains(&i.id.as_str()))
        .all(|i| i.end <= start + EPS || i.start >= end - EPS)
}

/// Pick a track and start position for a newly added item.
///
/// Strategy order: an explicitly preferred slot, the first track free at the
/// current time, the first gap wide enough anywhere, then the least-loaded
/// track after its last item. Earlier tracks win ties.
#[must_use]
pub fn find_best_position_for_new_item(
    tracks: &[Track],
    duration: f64,
    current_time: Option<f64>,
    pref_track: Option<usize>,
    pref_start: Option<f64>,
) -> (usize, f64) {
    if let (Some(track_idx), Some(start)) = (pref_track, pref_start) {
        if let Some(track) = tracks.get(track_idx) {
            if can_fit_at_position(&track.items, start, duration, &[]) {
                return (track_idx, start.max(0.0));
            }
        }
    }

    if let Some(time) = current_time {
        for (idx, track) in tracks.iter().enumerate() {
            if can_fit_at_position(&track.items, time, duration, &[]) {
                return (idx, time.max(0.0));
            }
        }
    }

    for (idx, track) in tracks.iter().enumerate() {
        for gap in find_gaps(&track.items) {
            if gap.duration() >= duration - EPS {
                return (idx, gap.start);
            }
        }
    }

    let (idx, track) = tracks
        .iter()
        .enumerate()
        .min_by_key(|(_, t)| t.items.len())
        .map_or((0, None), |(i, t)| (i, Some(t)));
    let start = track.map_or(0.0, Track::content_end);
    (idx, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn item(id: &str, start: f64, end: f64) -> Item {
        Item::new(ItemKind::Text, "t0", start, end).id(id)
    }

    fn video(id: &str, start: f64, end: f64, media_start: f64, src: f64) -> Item {
        Item::new(ItemKind::Video, "t0", start, end)
            .id(id)
            .media(media_start, src)
    }

    #[test]
    fn test_find_gaps_includes_leading() {
        let items = vec![item("a", 1.0, 2.0), item("b", 3.0, 4.0)];
        let gaps = find_gaps(&items);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0], Gap { start: 0.0, end: 1.0 });
        assert_eq!(gaps[1], Gap { start: 2.0, end: 3.0 });
    }

    #[test]
    fn test_find_gaps_no_trailing() {
        let items = vec![item("a", 0.0, 2.0)];
        assert!(find_gaps(&items).is_empty());
    }

    #[test]
    fn test_close_gaps_preserves_durations_and_count() {
        let items = vec![item("a", 1.0, 2.5), item("b", 4.0, 5.0), item("c", 9.0, 9.5)];
        let closed = close_gaps(&items);
        assert_eq!(closed.len(), items.len());
        assert_eq!(closed[0].start, 0.0);
        assert!((closed[0].duration() - 1.5).abs() < EPS);
        assert!((closed[1].start - 1.5).abs() < EPS);
        assert!((closed[2].start - 2.5).abs() < EPS);
        for (before, after) in items.iter().zip(&closed) {
            assert_eq!(before.id, after.id);
            assert!((before.duration() - after.duration()).abs() < EPS);
        }
    }

    #[test]
    fn test_magnetic_preview_after_midpoint() {
        // A [0,2], B [2,5], C [5,6]. A 1 s item intended at 3.1 has its
        // center at 3.6, past B's midpoint 3.5, so it slots after B.
        let items = vec![item("a", 0.0, 2.0), item("b", 2.0, 5.0), item("c", 5.0, 6.0)];
        let preview = magnetic_insertion_preview(&items, 1.0, 3.1);
        assert_eq!(preview.insertion_index, 2);
        assert!((preview.insertion_start - 5.0).abs() < EPS);
        assert_eq!(preview.preview_items.len(), items.len());
    }

    #[test]
    fn test_magnetic_preview_past_all_midpoints() {
        let items = vec![item("a", 0.0, 2.0), item("b", 2.0, 5.0), item("c", 5.0, 6.0)];
        // 5.6 is past C's midpoint 5.5, so the slot is at the very end.
        let preview = magnetic_insertion_preview(&items, 1.0, 5.6);
        assert_eq!(preview.insertion_index, 3);
        assert!((preview.insertion_start - 6.0).abs() < EPS);
    }

    #[test]
    fn test_magnetic_preview_before_first_midpoint() {
        let items = vec![item("a", 0.0, 2.0), item("b", 2.0, 5.0), item("c", 5.0, 6.0)];
        let preview = magnetic_insertion_preview(&items, 1.0, 0.5);
        assert_eq!(preview.insertion_index, 0);
        assert!(preview.insertion_start.abs() < EPS);
    }

    #[test]
    fn test_magnetic_preview_is_close_gaps_fixpoint() {
        let items = vec![item("a", 0.5, 2.0), item("b", 3.0, 5.0), item("c", 7.0, 8.0)];
        let preview = magnetic_insertion_preview(&items, 2.0, 4.0);
        let as_items: Vec<Item> = preview
            .preview_items
            .iter()
            .map(|p| item(&p.id, p.start, p.end))
            .collect();
        let closed = close_gaps(&as_items);
        for (p, c) in preview.preview_items.iter().zip(&closed) {
            assert!((p.start - c.start).abs() < EPS);
            assert!((p.end - c.end).abs() < EPS);
        }
    }

    #[test]
    fn test_apply_magnetic_insertion_mid_track() {
        // Dropping X (1 s) at 3.1 into A [0,2], B [2,5], C [5,6]: the slot
        // lands after B, so X takes [5,6] and C shifts to [6,7].
        let items = vec![item("a", 0.0, 2.0), item("b", 2.0, 5.0), item("c", 5.0, 6.0)];
        let preview = magnetic_insertion_preview(&items, 1.0, 3.1);
        let x = item("x", 0.0, 1.0);
        let result = apply_magnetic_insertion(&items, x, &preview);
        assert_eq!(result.len(), 4);
        let positions: Vec<(&str, f64, f64)> =
            result.iter().map(|i| (i.id.as_str(), i.start, i.end)).collect();
        assert_eq!(positions[0], ("a", 0.0, 2.0));
        assert_eq!(positions[1].0, "b");
        assert!((positions[1].1 - 2.0).abs() < EPS);
        assert_eq!(positions[2].0, "x");
        assert!((positions[2].1 - 5.0).abs() < EPS);
        assert_eq!(positions[3].0, "c");
        assert!((positions[3].1 - 6.0).abs() < EPS);
        assert!((positions[3].2 - 7.0).abs() < EPS);
    }

    #[test]
    fn test_apply_magnetic_insertion_before_first() {
        let items = vec![item("a", 0.0, 2.0), item("b", 2.0, 5.0), item("c", 5.0, 6.0)];
        let preview = magnetic_insertion_preview(&items, 1.0, 0.5);
        let result = apply_magnetic_insertion(&items, item("x", 0.0, 1.0), &preview);
        let positions: Vec<(&str, f64, f64)> =
            result.iter().map(|i| (i.id.as_str(), i.start, i.end)).collect();
        assert_eq!(positions[0], ("x", 0.0, 1.0));
        assert_eq!(positions[1].0, "a");
        assert!((positions[1].1 - 1.0).abs() < EPS);
        assert!((positions[2].1 - 3.0).abs() < EPS);
        assert!((positions[3].1 - 6.0).abs() < EPS);
        assert!((positions[3].2 - 7.0).abs() < EPS);
    }

    #[test]
    fn test_resize_end_pushes_chain() {
        // A [0,2], B [3,4], C [5,6]; growing A to 3.5 pushes B by 0.5 and
        // leaves C alone because B's new end 4.5 clears it.
        let items = vec![item("a", 0.0, 2.0), item("b", 3.0, 4.0), item("c", 5.0, 6.0)];
        let out = push_items_during_resize(&items, "a", 0.0, 3.5).unwrap();
        assert!((out.actual_end - 3.5).abs() < EPS);
        let b = out.items.iter().find(|i| i.id == "b").unwrap();
        let c = out.items.iter().find(|i| i.id == "c").unwrap();
        assert!((b.start - 3.5).abs() < EPS);
        assert!((b.end - 4.5).abs() < EPS);
        assert!((c.start - 5.0).abs() < EPS);
    }

    #[test]
    fn test_resize_end_push_cascades() {
        let items = vec![item("a", 0.0, 2.0), item("b", 2.5, 4.0), item("c", 4.5, 6.0)];
        let out = push_items_during_resize(&items, "a", 0.0, 4.0).unwrap();
        let b = out.items.iter().find(|i| i.id == "b").unwrap();
        let c = out.items.iter().find(|i| i.id == "c").unwrap();
        // B moves to [4.0, 5.5], which then overlaps C, pushing it to [5.5, 7.0].
        assert!((b.start - 4.0).abs() < EPS);
        assert!((c.start - 5.5).abs() < EPS);
        assert!((c.end - 7.0).abs() < EPS);
    }

    #[test]
    fn test_resize_start_clamps_to_neighbor() {
        let items = vec![item("a", 0.0, 2.0), item("b", 3.0, 5.0)];
        let out = push_items_during_resize(&items, "b", 1.0, 5.0).unwrap();
        assert!((out.actual_start - 2.0).abs() < EPS);
        let a = out.items.iter().find(|i| i.id == "a").unwrap();
        assert!((a.start - 0.0).abs() < EPS);
    }

    #[test]
    fn test_resize_clamps_to_source_duration() {
        // 10 s source starting at offset 8 leaves 2 s of material, so a
        // requested end of 9 comes back as 5 + 2 = 7.
        let items = vec![video("a", 5.0, 6.0, 8.0, 10.0)];
        let out = push_items_during_resize(&items, "a", 5.0, 9.0).unwrap();
        assert!((out.actual_end - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_within_tolerance_not_clamped() {
        let items = vec![video("a", 0.0, 1.0, 0.0, 2.0)];
        let out = push_items_during_resize(&items, "a", 0.0, 2.04).unwrap();
        assert!((out.actual_end - 2.04).abs() < 1e-6);
    }

    #[test]
    fn test_resize_start_adjusts_media_offset() {
        let items = vec![video("a", 5.0, 7.0, 3.0, 20.0)];
        let out = push_items_during_resize(&items, "a", 4.0, 7.0).unwrap();
        let a = out.items.iter().find(|i| i.id == "a").unwrap();
        assert!((out.actual_start - 4.0).abs() < EPS);
        assert!((a.media_start.unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_resize_unknown_id_is_none() {
        let items = vec![item("a", 0.0, 2.0)];
        assert!(push_items_during_resize(&items, "ghost", 0.0, 3.0).is_none());
    }

    #[test]
    fn test_can_fit() {
        let items = vec![item("a", 0.0, 2.0), item("b", 3.0, 5.0)];
        assert!(can_fit_at_position(&items, 2.0, 1.0, &[]));
        assert!(!can_fit_at_position(&items, 1.5, 1.0, &[]));
        assert!(can_fit_at_position(&items, 1.5, 1.0, &["a"]));
        assert!(!can_fit_at_position(&items, -1.0, 0.5, &[]));
        assert!(can_fit_at_position(&items, 5.0, 100.0, &[]));
    }

    #[test]
    fn test_best_position_prefers_exact_slot() {
        let tracks = vec![
            Track::new().id("t0").item(item("a", 0.0, 2.0)),
            Track::new().id("t1"),
        ];
        let (track, start) = find_best_position_for_new_item(&tracks, 1.0, None, Some(0), Some(3.0));
        assert_eq!(track, 0);
        assert!((start - 3.0).abs() < EPS);
    }

    #[test]
    fn test_best_position_falls_through_to_current_time() {
        let tracks = vec![
            Track::new().id("t0").item(item("a", 0.0, 4.0)),
            Track::new().id("t1").item(item("b", 6.0, 7.0)),
        ];
        let (track, start) = find_best_position_for_new_item(&tracks, 2.0, Some(1.0), None, None);
        assert_eq!(track, 1);
        assert!((start - 1.0).abs() < EPS);
    }

    #[test]
    fn test_best_position_first_wide_gap() {
        let tracks = vec![
            Track::new().id("t0").item(item("a", 0.0, 4.0)).item(item("b", 4.5, 8.0)),
            Track::new().id("t1").item(item("c", 2.0, 3.0)),
        ];
        // No current time; the 2 s leading gap on t1 is the first wide enough.
        let (track, start) = find_best_position_for_new_item(&tracks, 1.5, None, None, None);
        assert_eq!(track, 1);
        assert!(start.abs() < EPS);
    }

    #[test]
    fn test_best_position_least_loaded_fallback() {
        let tracks = vec![
            Track::new().id("t0").item(item("a", 0.0, 1.0)).item(item("b", 1.0, 2.0)),
            Track::new().id("t1").item(item("c", 0.0, 5.0)),
        ];
        let (track, start) = find_best_position_for_new_item(&tracks, 10.0, None, None, None);
        assert_eq!(track, 1);
        assert!((start - 5.0).abs() < EPS);
    }
}
