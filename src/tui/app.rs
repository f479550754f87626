//! Dashboard application state and event handling.
//!
//! The app owns all display state and runs on a single event loop; network
//! operations are spawned as tasks that report back through [`AppMsg`].
//! Every state mutation happens in one synchronous `on_msg` call, so a
//! snapshot is never applied interleaved with a submission's writes.

use crate::api::{ApiError, Backend, ConfigStatus, ConfigUpdateAck, ConfigUpdateRequest, SnapshotData};
use crate::core::{format, parse_positive_pair, DashboardState, Severity, Symbol, UiStatus};
use crate::store::{ShadowConfig, ShadowStore};
use chrono::{Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Messages delivered to the event loop: poll ticks and completions of
/// spawned network operations.
#[derive(Debug)]
pub enum AppMsg {
    PollTick,
    Snapshot(Result<SnapshotData, ApiError>),
    ManualUpdateDone(Result<(), ApiError>),
    ConfigSaved {
        symbol: Symbol,
        shares: f64,
        eth: f64,
        result: Result<ConfigUpdateAck, ApiError>,
    },
    ConfigStatusLoaded(Result<ConfigStatus, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Shares,
    Eth,
}

/// Editable fields in display order, for Tab navigation.
const FIELD_ORDER: [(Symbol, FormField); 4] = [
    (Symbol::Sbet, FormField::Shares),
    (Symbol::Sbet, FormField::Eth),
    (Symbol::Bmnr, FormField::Shares),
    (Symbol::Bmnr, FormField::Eth),
];

pub struct App<B: Backend + 'static> {
    pub state: DashboardState,
    backend: Arc<B>,
    store: ShadowStore,
    tx: UnboundedSender<AppMsg>,
    /// Mirrors terminal focus; poll ticks are skipped while false.
    pub focused: bool,
    pub should_quit: bool,
    pub cursor: (Symbol, FormField),
}

impl<B: Backend + 'static> App<B> {
    pub fn new(backend: Arc<B>, store: ShadowStore, tx: UnboundedSender<AppMsg>) -> Self {
        let mut state = DashboardState::new();

        // Seed the forms from the shadow files; the server's config status
        // overwrites these once it arrives.
        for symbol in Symbol::ALL {
            match store.load(symbol) {
                Ok(Some(shadow)) => {
                    state.set_form_values(symbol, shadow.shares_outstanding, shadow.eth_holdings);
                }
                Ok(None) => {}
                Err(e) => warn!("failed to read shadow config for {symbol}: {e}"),
            }
        }

        Self {
            state,
            backend,
            store,
            tx,
            focused: true,
            should_quit: false,
            cursor: FIELD_ORDER[0],
        }
    }

    /// Startup sequence: config status first, then the initial load.
    pub fn startup(&mut self) {
        self.check_config_status();
        self.refresh();
        self.state.notify("Dashboard started", Severity::Success);
    }

    /// Load a fresh snapshot. Status goes to Loading; the result arrives as
    /// an [`AppMsg::Snapshot`].
    pub fn refresh(&mut self) {
        self.state.set_status(UiStatus::Loading, "Fetching data...");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::Snapshot(backend.fetch_data().await));
        });
    }

    fn check_config_status(&mut self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::ConfigStatusLoaded(backend.config_status().await));
        });
    }

    /// Trigger a server-side recomputation. Single-flight: a call while one
    /// is in progress is a no-op.
    pub fn manual_update(&mut self) {
        if self.state.updating {
            return;
        }
        self.state.updating = true;
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::ManualUpdateDone(backend.manual_update().await));
        });
    }

    /// Validate and submit one symbol's form. Invalid input notifies locally
    /// and never reaches the network; a submission already in flight makes
    /// this a no-op.
    pub fn submit(&mut self, symbol: Symbol) {
        let form = self.state.form(symbol);
        if form.submitting {
            return;
        }
        let (shares, eth) = match parse_positive_pair(&form.shares, &form.eth) {
            Ok(pair) => pair,
            Err(message) => {
                self.state.notify(message, Severity::Error);
                return;
            }
        };

        self.state.form_mut(symbol).submitting = true;
        let request = ConfigUpdateRequest {
            symbol,
            shares_outstanding: shares,
            eth_holdings: eth,
        };
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.update_config(&request).await;
            let _ = tx.send(AppMsg::ConfigSaved {
                symbol,
                shares,
                eth,
                result,
            });
        });
    }

    /// Restore a symbol's form to the built-in defaults and auto-save them.
    pub fn reset_defaults(&mut self, symbol: Symbol) {
        let (shares, eth) = symbol.default_config();
        self.state.set_form_values(symbol, shares, eth);
        self.state
            .notify(format!("{symbol} configuration reset to defaults"), Severity::Info);
        self.submit(symbol);
    }

    pub fn set_focused(&mut self, focused: bool) {
        let regained = focused && !self.focused;
        self.focused = focused;
        if regained {
            // Refresh once immediately when the terminal becomes visible.
            self.refresh();
        }
    }

    pub fn on_tick(&mut self) {
        self.state.prune_notifications();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("user requested quit");
                self.should_quit = true;
            }
            KeyCode::Char('u') => self.manual_update(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('d') => self.reset_defaults(self.cursor.0),
            KeyCode::Tab | KeyCode::Down => self.move_cursor(1),
            KeyCode::BackTab | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Enter => self.submit(self.cursor.0),
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.focused_field_mut().push(c);
            }
            _ => {}
        }
    }

    pub fn on_msg(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::PollTick => {
                if self.focused {
                    self.refresh();
                } else {
                    debug!("terminal unfocused, skipping poll tick");
                }
            }
            AppMsg::Snapshot(Ok(data)) => {
                self.state.apply_snapshot(&data);
                self.state.set_status(UiStatus::Online, "System normal");
                self.state.last_update = Some(Local::now().format("%H:%M:%S").to_string());
            }
            AppMsg::Snapshot(Err(e)) => {
                self.state.set_status(UiStatus::Error, "Connection failed");
                self.state
                    .notify(format!("Failed to fetch data: {e}"), Severity::Error);
            }
            AppMsg::ManualUpdateDone(result) => {
                self.state.updating = false;
                match result {
                    Ok(()) => {
                        self.state.notify("Data update complete", Severity::Success);
                        self.refresh();
                    }
                    Err(e) => {
                        self.state
                            .notify(format!("Update failed: {e}"), Severity::Error);
                    }
                }
            }
            AppMsg::ConfigSaved {
                symbol,
                shares,
                eth,
                result,
            } => {
                self.state.form_mut(symbol).submitting = false;
                match result {
                    Ok(ack) => self.finish_config_save(symbol, shares, eth, ack),
                    Err(e) => {
                        self.state.notify(
                            format!("Failed to save configuration: {e}"),
                            Severity::Error,
                        );
                        if e.is_unknown_symbol() {
                            self.state.notify(
                                "Backend does not recognize this symbol; check the server configuration",
                                Severity::Error,
                            );
                        }
                    }
                }
            }
            AppMsg::ConfigStatusLoaded(Ok(status)) => {
                for symbol in Symbol::ALL {
                    if let Some(entry) = status.config_for(symbol) {
                        self.state
                            .set_form_values(symbol, entry.shares_outstanding, entry.eth_holdings);
                    }
                }
                self.state.config_note = "Loaded".to_string();
                if let Some(ts) = &status.timestamp {
                    self.state.last_saved = Some(format::local_time(ts));
                }
            }
            AppMsg::ConfigStatusLoaded(Err(e)) => {
                // Startup nicety only; no notification.
                warn!("config status check failed: {e}");
            }
        }
    }

    fn finish_config_save(&mut self, symbol: Symbol, shares: f64, eth: f64, ack: ConfigUpdateAck) {
        self.state.notify(
            format!("{symbol} configuration saved, mNAV recalculated"),
            Severity::Success,
        );
        self.state.config_note = "Saved".to_string();
        self.state.last_saved = Some(format::local_time(&Utc::now().to_rfc3339()));

        // The server may return the recomputed snapshot inline, saving a
        // refresh round trip.
        match ack.latest_data {
            Some(data) => {
                self.state.apply_snapshot(&data);
                self.state.set_status(UiStatus::Online, "System normal");
            }
            None => self.refresh(),
        }

        let shadow = ShadowConfig {
            symbol,
            shares_outstanding: shares,
            eth_holdings: eth,
            saved_at: Utc::now(),
        };
        if let Err(e) = self.store.save(&shadow) {
            warn!("failed to write shadow config for {symbol}: {e}");
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let position = FIELD_ORDER
            .iter()
            .position(|&f| f == self.cursor)
            .unwrap_or(0) as isize;
        let len = FIELD_ORDER.len() as isize;
        self.cursor = FIELD_ORDER[((position + delta).rem_euclid(len)) as usize];
    }

    fn focused_field_mut(&mut self) -> &mut String {
        let (symbol, field) = self.cursor;
        let form = self.state.form_mut(symbol);
        match field {
            FormField::Shares => &mut form.shares,
            FormField::Eth => &mut form.eth,
        }
    }
}
