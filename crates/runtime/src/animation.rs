//! Refresh-paced frame driver.
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use stage_core::{AnimationClip, FrameCycle};

use crate::api::Result;
use crate::signals::RefreshSignal;

/// Produces the column sequence of one clip.
///
/// A column advance happens every `frame_ms`, and then only on a refresh
/// tick the driver has not used yet, so no two advances share a tick. The
/// first call yields `min_column + 1`: the clip starts out positioned on
/// `min_column`.
#[derive(Debug)]
pub struct FrameDriver {
    cycle: FrameCycle,
    interval: Interval,
    refresh: RefreshSignal,
}

impl FrameDriver {
    pub fn new(clip: &AnimationClip, refresh: RefreshSignal) -> Self {
        let period = clip.frame_duration();
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            cycle: clip.cycle(),
            interval,
            refresh,
        }
    }

    pub fn column(&self) -> u32 {
        self.cycle.current()
    }

    /// Waits for the next frame and returns the new column.
    pub async fn next_column(&mut self) -> Result<u32> {
        self.interval.tick().await;
        self.refresh.next_frame().await?;
        Ok(self.cycle.advance())
    }

    /// Rewinds to the first column and restarts the frame timer.
    pub fn restart(&mut self) {
        self.cycle.restart();
        self.interval.reset();
    }
}
