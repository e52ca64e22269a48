//! Trailing-edge redraw coalescing.
//!
//! Any number of requests between two refresh ticks collapse into a single
//! pending flag. The stage worker consumes every tick and redraws on it only
//! when a request is pending, so the redraw depicts the last request of the
//! window the tick closes. Nothing is drawn before the surface is mounted.

#[derive(Clone, Debug, Default)]
pub struct RenderScheduler {
    mounted: bool,
    pending: bool,
    redraws: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables rendering and asks for the first full redraw.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.request();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Records a render request. Returns true on the idle to pending edge.
    ///
    /// Requests before mount are dropped; mounting schedules a redraw of
    /// whatever state exists by then.
    pub fn request(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let was_pending = self.pending;
        self.pending = true;
        !was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.mounted && self.pending
    }

    /// Consumes the pending request. Returns false when there is nothing to
    /// draw.
    pub fn take_redraw(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.pending = false;
        self.redraws += 1;
        true
    }

    /// Redraws executed so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_renders_before_mount() {
        let mut scheduler = RenderScheduler::new();
        assert!(!scheduler.request());
        assert!(!scheduler.is_pending());
        assert!(!scheduler.take_redraw());
    }

    #[test]
    fn burst_collapses_into_one_redraw() {
        let mut scheduler = RenderScheduler::new();
        scheduler.mount();
        assert!(!scheduler.request(), "mount already left a redraw pending");

        for _ in 0..25 {
            scheduler.request();
        }
        assert!(scheduler.take_redraw());
        assert!(!scheduler.take_redraw());
        assert_eq!(scheduler.redraws(), 1);
    }

    #[test]
    fn request_after_redraw_is_a_new_edge() {
        let mut scheduler = RenderScheduler::new();
        scheduler.mount();
        scheduler.take_redraw();

        assert!(scheduler.request());
        assert!(scheduler.is_pending());
    }
}
