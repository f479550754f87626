//! Terminal dashboard for the mNAV tracker.
//!
//! Key components:
//! - Application state with single-loop message handling
//! - Keyboard-driven configuration forms
//! - Focus-gated auto-refresh via the poller

pub mod app;
pub mod events;
pub mod ui;

pub use app::{App, AppMsg};
pub use events::{Event, EventHandler};

use crate::api::Backend;
use crate::poller::Poller;
use crate::store::ShadowStore;
use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Run the dashboard until the user quits. The poller is started here and
/// stopped on every exit path.
pub async fn run<B: Backend + 'static>(
    backend: Arc<B>,
    store: ShadowStore,
    poll_interval: Duration,
) -> Result<()> {
    let mut terminal = setup_terminal()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(backend, store, tx.clone());
    let mut event_handler = EventHandler::new(Duration::from_millis(250));
    let mut poller = Poller::start(poll_interval, tx, || AppMsg::PollTick);

    app.startup();
    info!("dashboard main loop started");

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &app)) {
            error!("terminal drawing error: {}", e);
            break Err(anyhow::anyhow!("terminal drawing failed: {e}"));
        }

        tokio::select! {
            event = event_handler.next() => match event {
                Some(Event::Key(key)) => app.handle_key(key),
                Some(Event::Tick) => app.on_tick(),
                Some(Event::Focus(focused)) => app.set_focused(focused),
                Some(Event::Error(message)) => warn!("terminal event error: {message}"),
                None => break Ok(()),
            },
            msg = rx.recv() => match msg {
                Some(msg) => app.on_msg(msg),
                None => break Ok(()),
            },
        }

        if app.should_quit {
            break Ok(());
        }
    };

    poller.stop();
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    use std::io::IsTerminal;

    if !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("stdout is not a terminal"));
    }

    enable_raw_mode().map_err(|e| anyhow::anyhow!("failed to enable raw mode: {e}"))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)
        .map_err(|e| anyhow::anyhow!("failed to setup terminal screen: {e}"))?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(|e| anyhow::anyhow!("failed to create terminal: {e}"))?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    Ok(())
}
