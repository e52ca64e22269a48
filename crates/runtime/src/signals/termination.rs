use tokio::sync::watch;

/// One-shot, replaying flag.
///
/// The stage worker holds one per population member to mark it dying; the
/// stage holds another that marks shutdown. Listeners that subscribe after
/// the signal fired observe it immediately.
#[derive(Debug)]
pub struct TerminationSignal {
    tx: watch::Sender<bool>,
}

impl TerminationSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Fires the signal. Returns false if it had already fired.
    pub fn fire(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> TerminationListener {
        TerminationListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for TerminationSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of a [`TerminationSignal`].
#[derive(Clone, Debug)]
pub struct TerminationListener {
    rx: watch::Receiver<bool>,
}

impl TerminationListener {
    /// Resolves once the signal fires.
    ///
    /// Also resolves when the signal is dropped, which happens when the
    /// actor leaves the stage or the worker shuts down. Cancel-safe.
    pub async fn fired(&mut self) {
        let _ = self.rx.wait_for(|fired| *fired).await;
    }

    pub fn is_fired(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    #[test]
    fn fires_exactly_once() {
        let signal = TerminationSignal::new();
        assert!(!signal.is_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[tokio::test]
    async fn late_listener_sees_replay() {
        let signal = TerminationSignal::new();
        signal.fire();

        let mut listener = signal.subscribe();
        assert!(listener.is_fired());
        time::timeout(Duration::from_millis(10), listener.fired())
            .await
            .expect("replayed signal resolves immediately");
    }

    #[tokio::test(start_paused = true)]
    async fn pending_until_fired() {
        let signal = TerminationSignal::new();
        let mut listener = signal.subscribe();

        let waited = time::timeout(Duration::from_secs(5), listener.fired()).await;
        assert!(waited.is_err());

        signal.fire();
        listener.fired().await;
        assert!(listener.is_fired());
    }

    #[tokio::test]
    async fn dropping_the_signal_releases_listeners() {
        let signal = TerminationSignal::new();
        let mut listener = signal.subscribe();
        drop(signal);

        listener.fired().await;
        assert!(!listener.is_fired());
    }
}
