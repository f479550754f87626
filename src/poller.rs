//! Periodic tick source for the dashboard's auto-refresh.
//!
//! Explicitly modelled as a scheduled task with a stop handle: started at
//! initialization, stopped at teardown. The poller only emits ticks; whether
//! a tick turns into a refresh is decided by the receiver (ticks are skipped
//! while the terminal is unfocused).

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a task that sends a message on every interval tick. The first
    /// tick fires one full interval after start; the initial load is the
    /// caller's responsibility.
    pub fn start<T, F>(interval: Duration, tx: UnboundedSender<T>, make: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // tokio intervals fire immediately; swallow the first tick.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(make()).is_err() {
                    debug!("poll channel closed, stopping poller");
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(&mut self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_poller_emits_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _poller = Poller::start(Duration::from_millis(5), tx, || ());

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_halts_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = Poller::start(Duration::from_millis(5), tx, || ());

        rx.recv().await.unwrap();
        poller.stop();

        tokio::time::sleep(Duration::from_millis(25)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(rx.try_recv().is_err());
    }
}
