//! Display state for the dashboard.
//!
//! All mutation happens on the single event loop; a snapshot is applied in
//! one synchronous call, so its fields never interleave with a concurrent
//! submission's writes.

use crate::api::{ConfigEntry, SnapshotData};
use crate::core::{format, Symbol};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// System status shown in the header. Every fetch attempt moves
/// Loading → (Online | Error); there are no other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiStatus {
    Loading,
    Online,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// A transient toast-style message. Entries stack and each expires on its
/// own deadline; there is no dedup and no queue limit.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
}

/// One symbol's editable configuration form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub shares: String,
    pub eth: String,
    /// Set while a submission for this form is in flight; the submit action
    /// is ignored for the duration.
    pub submitting: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Prices {
    pub sbet: Option<f64>,
    pub bmnr: Option<f64>,
    pub eth: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mnavs {
    pub sbet: Option<f64>,
    pub bmnr: Option<f64>,
}

pub struct DashboardState {
    pub status: UiStatus,
    pub status_message: String,
    pub prices: Prices,
    pub mnavs: Mnavs,
    /// Current per-symbol configuration as confirmed by the server.
    pub holdings: HashMap<Symbol, ConfigEntry>,
    pub forms: HashMap<Symbol, FormState>,
    /// Short note for the configuration panel ("Loaded", "Saved", ...).
    pub config_note: String,
    /// Localized time of the last confirmed configuration write.
    pub last_saved: Option<String>,
    /// Local wall-clock time of the last successful refresh.
    pub last_update: Option<String>,
    pub notifications: Vec<Notification>,
    /// Single-flight guard for the manual update trigger.
    pub updating: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        let forms = Symbol::ALL
            .iter()
            .map(|&symbol| (symbol, FormState::default()))
            .collect();
        Self {
            status: UiStatus::Loading,
            status_message: "Starting...".to_string(),
            prices: Prices::default(),
            mnavs: Mnavs::default(),
            holdings: HashMap::new(),
            forms,
            config_note: format::PLACEHOLDER.to_string(),
            last_saved: None,
            last_update: None,
            notifications: Vec::new(),
            updating: false,
        }
    }

    pub fn set_status(&mut self, status: UiStatus, message: &str) {
        self.status = status;
        self.status_message = message.to_string();
    }

    /// Replace the displayed snapshot wholesale. Absent rows clear their
    /// fields rather than keeping stale values. Form inputs are pre-filled
    /// from the server config only while empty and not mid-submission; a
    /// value the user is editing is never overwritten.
    pub fn apply_snapshot(&mut self, data: &SnapshotData) {
        match &data.price_data {
            Some(row) => {
                self.prices = Prices {
                    sbet: row.sbet(),
                    bmnr: row.bmnr(),
                    eth: row.eth(),
                };
            }
            None => self.prices = Prices::default(),
        }
        match &data.mnav_data {
            Some(row) => {
                self.mnavs = Mnavs {
                    sbet: row.sbet(),
                    bmnr: row.bmnr(),
                };
            }
            None => self.mnavs = Mnavs::default(),
        }

        self.holdings.clear();
        for symbol in Symbol::ALL {
            if let Some(entry) = data.config_for(symbol) {
                self.holdings.insert(symbol, entry);
                self.seed_form_if_empty(symbol, entry);
            }
        }
    }

    pub fn form(&self, symbol: Symbol) -> &FormState {
        &self.forms[&symbol]
    }

    pub fn form_mut(&mut self, symbol: Symbol) -> &mut FormState {
        self.forms.get_mut(&symbol).expect("forms cover all symbols")
    }

    /// Overwrite both form fields, e.g. from the startup config check or a
    /// shadow file.
    pub fn set_form_values(&mut self, symbol: Symbol, shares: f64, eth: f64) {
        let form = self.form_mut(symbol);
        form.shares = format::input_value(shares);
        form.eth = format::input_value(eth);
    }

    fn seed_form_if_empty(&mut self, symbol: Symbol, entry: ConfigEntry) {
        let form = self.form_mut(symbol);
        if form.submitting {
            return;
        }
        if form.shares.is_empty() {
            form.shares = format::input_value(entry.shares_outstanding);
        }
        if form.eth.is_empty() {
            form.eth = format::input_value(entry.eth_holdings);
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifications.push(Notification {
            message: message.into(),
            severity,
            created_at: Instant::now(),
        });
    }

    /// Drop notifications past their lifetime. Called on every UI tick.
    pub fn prune_notifications(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.created_at) < NOTIFICATION_TTL);
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate raw form input. Both fields must parse as finite numbers and be
/// strictly positive; anything else fails locally, before any network call.
pub fn parse_positive_pair(raw_shares: &str, raw_eth: &str) -> Result<(f64, f64), String> {
    let shares = parse_positive(raw_shares)?;
    let eth = parse_positive(raw_eth)?;
    Ok((shares, eth))
}

fn parse_positive(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| "Please enter valid positive numbers".to_string())?;
    if !value.is_finite() || value <= 0.0 {
        return Err("Please enter valid positive numbers".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MnavRow, PriceRow};

    fn snapshot_with_config(shares: f64, eth: f64) -> SnapshotData {
        let mut config = HashMap::new();
        config.insert(
            "SBET".to_string(),
            ConfigEntry {
                shares_outstanding: shares,
                eth_holdings: eth,
            },
        );
        SnapshotData {
            price_data: Some(PriceRow(
                Some("2026-08-06T12:00:00".to_string()),
                Some(1.2345),
                Some(6.78),
                Some(2000.5),
            )),
            mnav_data: Some(MnavRow(
                Some("2026-08-06T12:00:00".to_string()),
                Some(0.5),
                Some(1.1),
            )),
            config: Some(config),
        }
    }

    #[test]
    fn test_apply_snapshot_replaces_everything() {
        let mut state = DashboardState::new();
        state.apply_snapshot(&snapshot_with_config(129_038_060.0, 521_939.0));

        assert_eq!(state.prices.sbet, Some(1.2345));
        assert_eq!(state.prices.eth, Some(2000.5));
        assert_eq!(state.mnavs.bmnr, Some(1.1));
        assert_eq!(
            state.holdings[&Symbol::Sbet].shares_outstanding,
            129_038_060.0
        );

        // A later snapshot with no rows clears the display, no merge.
        state.apply_snapshot(&SnapshotData::default());
        assert_eq!(state.prices.sbet, None);
        assert_eq!(state.mnavs.sbet, None);
        assert!(state.holdings.is_empty());
    }

    #[test]
    fn test_apply_snapshot_prefills_only_empty_forms() {
        let mut state = DashboardState::new();
        state.form_mut(Symbol::Sbet).shares = "42".to_string();

        state.apply_snapshot(&snapshot_with_config(129_038_060.0, 521_939.0));

        // User-entered value survives; the empty field is seeded.
        assert_eq!(state.form(Symbol::Sbet).shares, "42");
        assert_eq!(state.form(Symbol::Sbet).eth, "521939");
    }

    #[test]
    fn test_apply_snapshot_skips_submitting_form() {
        let mut state = DashboardState::new();
        state.form_mut(Symbol::Sbet).submitting = true;

        state.apply_snapshot(&snapshot_with_config(129_038_060.0, 521_939.0));
        assert_eq!(state.form(Symbol::Sbet).shares, "");
    }

    #[test]
    fn test_notification_pruning() {
        let mut state = DashboardState::new();
        state.notify("done", Severity::Success);
        state.notifications[0].created_at = Instant::now() - Duration::from_secs(4);
        state.notify("fresh", Severity::Info);

        state.prune_notifications();

        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].message, "fresh");
    }

    #[test]
    fn test_parse_positive_pair_accepts_positive_numbers() {
        assert_eq!(
            parse_positive_pair("129038060", "521939.5").unwrap(),
            (129_038_060.0, 521_939.5)
        );
        assert_eq!(parse_positive_pair(" 1 ", "2").unwrap(), (1.0, 2.0));
    }

    #[test]
    fn test_parse_positive_pair_rejects_bad_input() {
        for (shares, eth) in [
            ("0", "5"),
            ("-1", "5"),
            ("5", "0"),
            ("5", "-2"),
            ("abc", "5"),
            ("5", ""),
            ("", ""),
            ("inf", "5"),
            ("nan", "5"),
        ] {
            assert!(
                parse_positive_pair(shares, eth).is_err(),
                "expected rejection for ({shares:?}, {eth:?})"
            );
        }
    }
}
