//! Snapping
//!
//! Discretizes drag positions to the time grid or to nearby item edges, and
//! collects the guideline candidates shown while dragging.

use crate::config::TimelineConfig;
use crate::item::Track;

/// Collect snap-candidate edges around `track_index`.
///
/// Edges come from items on the target track and its immediate neighbors,
/// skipping the ids being dragged.
#[must_use]
pub fn collect_edges(tracks: &[Track], track_index: usize, exclude: &[&str]) -> Vec<f64> {
    let lo = track_index.saturating_sub(1);
    let hi = (track_index + 1).min(tracks.len().saturating_sub(1));
    let mut edges = Vec::new();
    for track in tracks.iter().take(hi + 1).skip(lo) {
        for item in &track.items {
            if exclude.contains(&item.id.as_str()) {
                continue;
            }
            edges.push(item.start);
            edges.push(item.end);
        }
    }
    edges
}

/// Snap `value` to the grid or a nearby edge.
///
/// An edge within `edge_snap_tolerance` wins when `prioritize_edges` is set,
/// or when it is at least as close as the grid point; otherwise the value is
/// quantized to the grid.
#[must_use]
pub fn snap_to_grid_and_edges(
    value: f64,
    edges: &[f64],
    config: &TimelineConfig,
    prioritize_edges: bool,
) -> f64 {
    let grid = (value / config.grid_size).round() * config.grid_size;

    let nearest_edge = edges
        .iter()
        .copied()
        .filter(|e| (e - value).abs() <= config.edge_snap_tolerance)
        .min_by(|a, b| {
            (a - value)
                .abs()
                .partial_cmp(&(b - value).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match nearest_edge {
        Some(edge) if prioritize_edges || (edge - value).abs() <= (grid - value).abs() => edge,
        _ => grid.max(0.0),
    }
}

/// A guideline position paired with whether the drag edge sits on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guideline {
    /// Time position in seconds
    pub time: f64,
}

/// Edges in other tracks close enough to the dragged item's edges to show
/// alignment guidelines. Deduplicated and sorted.
#[must_use]
pub fn guideline_candidates(
    tracks: &[Track],
    source_track_index: Option<usize>,
    drag_start: f64,
    drag_end: f64,
    config: &TimelineConfig,
) -> Vec<Guideline> {
    let mut times: Vec<f64> = Vec::new();
    for (idx, track) in tracks.iter().enumerate() {
        if Some(idx) == source_track_index {
            continue;
        }
        for item in &track.items {
            for edge in [item.start, item.end] {
                let near = (edge - drag_start).abs() <= config.edge_snap_tolerance
                    || (edge - drag_end).abs() <= config.edge_snap_tolerance;
                if near && !times.iter().any(|t| (t - edge).abs() < 1e-6) {
                    times.push(edge);
                }
            }
        }
    }
    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    times.into_iter().map(|time| Guideline { time }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ItemKind};

    fn track(id: &str, spans: &[(f64, f64)]) -> Track {
        let mut t = Track::new().id(id);
        for (i, &(start, end)) in spans.iter().enumerate() {
            t = t.item(Item::new(ItemKind::Text, id, start, end).id(format!("{id}-{i}")));
        }
        t
    }

    #[test]
    fn test_edge_within_tolerance_snaps_to_edge() {
        let config = TimelineConfig::default();
        let edges = vec![3.0, 5.0];
        // 2.97 is 0.03 from the edge at 3.0 — inside the 0.05 tolerance.
        assert!((snap_to_grid_and_edges(2.97, &edges, &config, true) - 3.0).abs() < 1e-9);
        assert!((snap_to_grid_and_edges(3.04, &edges, &config, false) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_far_from_edges_snaps_to_grid() {
        let config = TimelineConfig::default();
        let edges = vec![3.0, 5.0];
        assert!((snap_to_grid_and_edges(0.04, &edges, &config, false) - 0.0).abs() < 1e-9);
        assert!((snap_to_grid_and_edges(1.26, &edges, &config, false) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_prioritized_edge_beats_closer_grid() {
        let config = TimelineConfig::default();
        let edges = vec![3.03];
        // The grid point 3.0 is closer to 3.0 than the edge is, but the
        // prioritized form still returns the in-tolerance edge.
        assert!((snap_to_grid_and_edges(3.0, &edges, &config, true) - 3.03).abs() < 1e-9);
        assert!((snap_to_grid_and_edges(3.0, &edges, &config, false) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_never_snaps_negative() {
        let config = TimelineConfig::default();
        assert_eq!(snap_to_grid_and_edges(-0.04, &[], &config, false), 0.0);
    }

    #[test]
    fn test_collect_edges_spans_adjacent_tracks() {
        let tracks = vec![
            track("t0", &[(0.0, 1.0)]),
            track("t1", &[(2.0, 3.0)]),
            track("t2", &[(4.0, 5.0)]),
            track("t3", &[(6.0, 7.0)]),
        ];
        let edges = collect_edges(&tracks, 1, &[]);
        assert!(edges.contains(&0.0) && edges.contains(&3.0) && edges.contains(&4.0));
        assert!(!edges.contains(&6.0));
    }

    #[test]
    fn test_collect_edges_excludes_dragged() {
        let tracks = vec![track("t0", &[(0.0, 1.0), (2.0, 3.0)])];
        let edges = collect_edges(&tracks, 0, &["t0-0"]);
        assert_eq!(edges, vec![2.0, 3.0]);
    }

    #[test]
    fn test_guidelines_dedup_and_skip_source_track() {
        let tracks = vec![
            track("t0", &[(0.0, 2.0)]),
            track("t1", &[(2.0, 4.0)]),
            track("t2", &[(2.0, 6.0)]),
        ];
        let config = TimelineConfig::default();
        let lines = guideline_candidates(&tracks, Some(0), 2.02, 4.0, &config);
        let times: Vec<f64> = lines.iter().map(|g| g.time).collect();
        // Edge 2.0 appears once despite matching two tracks; 4.0 matches the
        // drag end; the source track's own edges are skipped.
        assert_eq!(times, vec![2.0, 4.0]);
    }
}
