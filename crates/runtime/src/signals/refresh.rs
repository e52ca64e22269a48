use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::api::{Result, RuntimeError};

/// Producer of display refresh ticks.
///
/// Shells with a native vsync callback call [`tick`](Self::tick) from it;
/// everything else runs [`spawn_fixed_rate`](Self::spawn_fixed_rate). The
/// tick value is a monotonically increasing frame number.
#[derive(Clone, Debug)]
pub struct RefreshSource {
    tx: Arc<watch::Sender<u64>>,
}

impl RefreshSource {
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Publishes the next frame and returns its number.
    pub fn tick(&self) -> u64 {
        let mut frame = 0;
        self.tx.send_modify(|current| {
            *current += 1;
            frame = *current;
        });
        frame
    }

    pub fn frame(&self) -> u64 {
        *self.tx.borrow()
    }

    /// A signal that has already seen the current frame.
    pub fn subscribe(&self) -> RefreshSignal {
        RefreshSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ticks every `period` until every subscribed signal is gone.
    ///
    /// Subscribe at least one signal before calling this. Periods shorter
    /// than [`MIN_PERIOD`](Self::MIN_PERIOD) run at that minimum.
    pub fn spawn_fixed_rate(&self, period: Duration) -> JoinHandle<()> {
        let period = period.max(Self::MIN_PERIOD);
        let source = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        source.tick();
                    }
                    _ = source.tx.closed() => break,
                }
            }
        })
    }
}

impl Default for RefreshSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of a [`RefreshSource`].
#[derive(Clone, Debug)]
pub struct RefreshSignal {
    rx: watch::Receiver<u64>,
}

impl RefreshSignal {
    /// Another signal on the same source that has already seen the current
    /// frame.
    pub fn subscribe(&self) -> RefreshSignal {
        let mut rx = self.rx.clone();
        rx.borrow_and_update();
        RefreshSignal { rx }
    }

    /// Waits for a frame this signal has not consumed yet.
    ///
    /// A tick that arrived while nobody was waiting is returned at once.
    /// Each frame is returned at most once. Cancel-safe.
    pub async fn next_frame(&mut self) -> Result<u64> {
        self.rx
            .changed()
            .await
            .map_err(|_| RuntimeError::RefreshClosed)?;
        Ok(*self.rx.borrow_and_update())
    }

    pub fn frame(&self) -> u64 {
        *self.rx.borrow()
    }
}
