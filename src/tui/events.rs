use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    /// Terminal focus changed: true when regained, false when lost.
    Focus(bool),
    Error(String),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let _task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            debug!("event channel closed, stopping tick handler");
                            break;
                        }
                    }
                    _ = tokio::time::sleep(Duration::from_millis(1)) => {
                        // Check for terminal events frequently
                        if let Ok(true) = event::poll(Duration::from_millis(0)) {
                            let forwarded = match event::read() {
                                Ok(CrosstermEvent::Key(key)) => tx.send(Event::Key(key)),
                                Ok(CrosstermEvent::FocusGained) => tx.send(Event::Focus(true)),
                                Ok(CrosstermEvent::FocusLost) => tx.send(Event::Focus(false)),
                                Ok(_) => Ok(()),
                                Err(e) => {
                                    error!("failed to read terminal event: {}", e);
                                    tx.send(Event::Error(format!("terminal read error: {e}")))
                                }
                            };
                            if forwarded.is_err() {
                                debug!("event channel closed, stopping input handler");
                                break;
                            }
                        }
                    }
                }
            }

            debug!("event handler task ended");
        });

        Self { rx, _task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
