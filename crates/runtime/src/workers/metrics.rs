//! Render pipeline counters.
//!
//! Tracks how many render requests were coalesced and why individual
//! sprites were skipped during a redraw.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the stage worker.
///
/// Uses atomics so shells and tests can read them while the worker runs.
#[derive(Debug, Default)]
pub struct RenderMetrics {
    /// Render requests received after mount
    requests: AtomicU64,

    /// Redraws actually executed
    redraws: AtomicU64,

    /// Sprites drawn across all redraws
    sprites_drawn: AtomicU64,

    /// Actors skipped because their sheet had not loaded (or failed to)
    skipped_unready: AtomicU64,

    /// Actors skipped because the crop table has no entry for their frame
    skipped_missing_crop: AtomicU64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_redraw(&self, drawn: usize) {
        self.redraws.fetch_add(1, Ordering::Relaxed);
        self.sprites_drawn.fetch_add(drawn as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_unready(&self) {
        self.skipped_unready.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_missing_crop(&self) {
        self.skipped_missing_crop.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn redraws(&self) -> u64 {
        self.redraws.load(Ordering::Relaxed)
    }

    pub fn sprites_drawn(&self) -> u64 {
        self.sprites_drawn.load(Ordering::Relaxed)
    }

    pub fn skipped_unready(&self) -> u64 {
        self.skipped_unready.load(Ordering::Relaxed)
    }

    pub fn skipped_missing_crop(&self) -> u64 {
        self.skipped_missing_crop.load(Ordering::Relaxed)
    }

    /// Requests per executed redraw; 0 before the first redraw.
    pub fn coalescing_ratio(&self) -> f64 {
        let redraws = self.redraws();
        if redraws == 0 {
            0.0
        } else {
            self.requests() as f64 / redraws as f64
        }
    }

    /// Field-by-field snapshot; not atomic across fields.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            requests: self.requests(),
            redraws: self.redraws(),
            sprites_drawn: self.sprites_drawn(),
            skipped_unready: self.skipped_unready(),
            skipped_missing_crop: self.skipped_missing_crop(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub requests: u64,
    pub redraws: u64,
    pub sprites_drawn: u64,
    pub skipped_unready: u64,
    pub skipped_missing_crop: u64,
}
