//! History Engine
//!
//! Snapshot-based undo/redo over the tracks list. Rapid successions of
//! commits (a drag emitting several model updates, a key held down) collapse
//! into a single history entry through a short batching window. Time is
//! injected as seconds from the caller's frame clock so the engine stays
//! deterministic under test.

use crate::item::Track;

/// Batch window: a commit landing within this many seconds of the previous
/// one joins the same history entry.
pub const BATCH_WINDOW: f64 = 0.25;

#[derive(Debug, Clone)]
struct PendingBatch {
    /// Tracks as they were before the first commit of the burst
    start: Vec<Track>,
    /// The batch finalizes once the clock passes this
    deadline: f64,
}

/// Time-window-batched past/present/future snapshot stack.
///
/// Snapshots are structural copies; equality between them is decided at the
/// JSON level, so commits that do not actually change anything are dropped.
#[derive(Debug)]
pub struct HistoryEngine {
    past: Vec<Vec<Track>>,
    present: Vec<Track>,
    future: Vec<Vec<Track>>,
    pending: Option<PendingBatch>,
    has_baseline: bool,
    suppress: bool,
}

impl HistoryEngine {
    /// Create an engine around the initial tracks.
    ///
    /// Recording stays off until the tracks first hold content, so the
    /// initial empty scaffold never becomes an undo step.
    #[must_use]
    pub fn new(initial: Vec<Track>) -> Self {
        let has_baseline = has_content(&initial);
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            pending: None,
            has_baseline,
            suppress: false,
        }
    }

    /// The tracks the history currently considers canonical.
    #[must_use]
    pub fn present(&self) -> &[Track] {
        &self.present
    }

    /// Number of undoable entries (a pending batch counts once finalized).
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len() + usize::from(self.pending.is_some())
    }

    /// Whether undo would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.pending.is_some()
    }

    /// Whether redo would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Record a model commit at `now` seconds.
    ///
    /// Commits made while an undo/redo is being applied, or before a
    /// baseline exists, only refresh `present`.
    pub fn on_tracks_committed(&mut self, tracks: &[Track], now: f64) {
        if self.suppress {
            return;
        }
        if !self.has_baseline {
            self.present = tracks.to_vec();
            self.has_baseline = has_content(tracks);
            return;
        }
        if snapshots_equal(&self.present, tracks) {
            return;
        }

        // A batch whose window already lapsed belongs to an earlier burst.
        if self.pending.as_ref().is_some_and(|b| now >= b.deadline) {
            self.flush_pending();
        }

        match &mut self.pending {
            Some(batch) => {
                batch.deadline = now + BATCH_WINDOW;
            }
            None => {
                self.pending = Some(PendingBatch {
                    start: self.present.clone(),
                    deadline: now + BATCH_WINDOW,
                });
            }
        }
        self.present = tracks.to_vec();
    }

    /// Finalize an expired batch window. Call once per frame.
    pub fn tick(&mut self, now: f64) {
        if let Some(batch) = &self.pending {
            if now >= batch.deadline {
                self.flush_pending();
            }
        }
    }

    /// Push the pending batch (if any) onto the past immediately.
    pub fn flush_pending(&mut self) {
        if let Some(batch) = self.pending.take() {
            if !snapshots_equal(&batch.start, &self.present) {
                self.past.push(batch.start);
                self.future.clear();
            }
        }
    }

    /// Step back one entry, returning the tracks to restore.
    ///
    /// A pending batch is finalized first, so the most recent burst undoes
    /// as a unit. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Vec<Track>> {
        self.flush_pending();
        let previous = self.past.pop()?;
        self.future.insert(0, std::mem::replace(&mut self.present, previous));
        Some(self.present.clone())
    }

    /// Step forward one entry, returning the tracks to restore.
    pub fn redo(&mut self) -> Option<Vec<Track>> {
        self.flush_pending();
        if self.future.is_empty() {
            return None;
        }
        let next = self.future.remove(0);
        self.past.push(std::mem::replace(&mut self.present, next));
        Some(self.present.clone())
    }

    /// Replace the present without recording (external overlay sync).
    pub fn sync_present(&mut self, tracks: &[Track]) {
        self.present = tracks.to_vec();
        if !self.has_baseline {
            self.has_baseline = has_content(tracks);
        }
    }

    /// Run `apply` with commit recording suppressed.
    ///
    /// Used around `set_tracks` when restoring a snapshot, so the restore
    /// itself does not become a new history entry.
    pub fn with_suppressed<R>(&mut self, apply: impl FnOnce() -> R) -> R {
        self.suppress = true;
        let result = apply();
        self.suppress = false;
        result
    }

    /// Drop all undo/redo entries, keep the present, reset the baseline.
    pub fn clear_history(&mut self) {
        self.past.clear();
        self.future.clear();
        self.pending = None;
        self.has_baseline = has_content(&self.present);
    }
}

fn has_content(tracks: &[Track]) -> bool {
    tracks.iter().any(|t| !t.items.is_empty())
}

fn snapshots_equal(a: &[Track], b: &[Track]) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(va), Ok(vb)) => va == vb,
        _ => false,
    }
}
