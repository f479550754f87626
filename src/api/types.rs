//! Wire types for the tracker backend's JSON API.
//!
//! Every endpoint wraps its payload in a `{success, ..., error}` envelope;
//! the client layer unwraps the envelope and surfaces `error` verbatim.

use crate::core::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest price row: `[timestamp, sbet_price, bmnr_price, eth_price]`.
/// Price slots are nullable when the upstream feed had no quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRow(
    pub Option<String>,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
);

impl PriceRow {
    pub fn timestamp(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn sbet(&self) -> Option<f64> {
        self.1
    }

    pub fn bmnr(&self) -> Option<f64> {
        self.2
    }

    pub fn eth(&self) -> Option<f64> {
        self.3
    }
}

/// Latest mNAV row: `[timestamp, sbet_mnav, bmnr_mnav]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnavRow(pub Option<String>, pub Option<f64>, pub Option<f64>);

impl MnavRow {
    pub fn sbet(&self) -> Option<f64> {
        self.1
    }

    pub fn bmnr(&self) -> Option<f64> {
        self.2
    }
}

/// Per-symbol configuration as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub shares_outstanding: f64,
    pub eth_holdings: f64,
}

/// One polled bundle of prices, ratios and configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub price_data: Option<PriceRow>,
    #[serde(default)]
    pub mnav_data: Option<MnavRow>,
    #[serde(default)]
    pub config: Option<HashMap<String, ConfigEntry>>,
}

impl SnapshotData {
    pub fn config_for(&self, symbol: Symbol) -> Option<ConfigEntry> {
        self.config.as_ref()?.get(symbol.as_str()).copied()
    }
}

/// Body of `POST /api/update_config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigUpdateRequest {
    pub symbol: Symbol,
    pub shares_outstanding: f64,
    pub eth_holdings: f64,
}

/// Unwrapped result of a successful config update. `latest_data`, when the
/// server includes it, saves the client a refresh round trip.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdateAck {
    pub config: Option<HashMap<String, ConfigEntry>>,
    pub latest_data: Option<SnapshotData>,
}

/// Unwrapped result of `GET /api/config_status`.
#[derive(Debug, Clone, Default)]
pub struct ConfigStatus {
    pub timestamp: Option<String>,
    pub config: Option<HashMap<String, ConfigEntry>>,
}

impl ConfigStatus {
    pub fn config_for(&self, symbol: Symbol) -> Option<ConfigEntry> {
        self.config.as_ref()?.get(symbol.as_str()).copied()
    }
}

/// Historical row: `[timestamp, sbet_price, bmnr_price, eth_price,
/// sbet_mnav, bmnr_mnav]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow(
    pub String,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
    pub Option<f64>,
);

/// `GET /health` payload (no success envelope).
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

// Envelope shapes, private to the api module: the client unwraps them.

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SnapshotData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateConfigEnvelope {
    pub success: bool,
    #[serde(default)]
    pub config: Option<HashMap<String, ConfigEntry>>,
    #[serde(default)]
    pub latest_data: Option<SnapshotData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManualUpdateEnvelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfigStatusEnvelope {
    pub success: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub config: Option<HashMap<String, ConfigEntry>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoricalEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<HistoryRow>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_row_deserializes_mixed_array() {
        let row: PriceRow =
            serde_json::from_str(r#"["2026-08-06T12:00:00", 1.2345, 6.78, 2000.5]"#).unwrap();
        assert_eq!(row.timestamp(), Some("2026-08-06T12:00:00"));
        assert_eq!(row.sbet(), Some(1.2345));
        assert_eq!(row.bmnr(), Some(6.78));
        assert_eq!(row.eth(), Some(2000.5));
    }

    #[test]
    fn test_price_row_accepts_nulls() {
        let row: PriceRow =
            serde_json::from_str(r#"["2026-08-06T12:00:00", null, 6.78, null]"#).unwrap();
        assert_eq!(row.sbet(), None);
        assert_eq!(row.eth(), None);
    }

    #[test]
    fn test_snapshot_config_lookup() {
        let snapshot: SnapshotData = serde_json::from_str(
            r#"{"config": {"SBET": {"shares_outstanding": 129038060, "eth_holdings": 521939}}}"#,
        )
        .unwrap();
        let entry = snapshot.config_for(Symbol::Sbet).unwrap();
        assert_eq!(entry.shares_outstanding, 129_038_060.0);
        assert_eq!(entry.eth_holdings, 521_939.0);
        assert!(snapshot.config_for(Symbol::Bmnr).is_none());
    }

    #[test]
    fn test_config_update_request_wire_shape() {
        let request = ConfigUpdateRequest {
            symbol: Symbol::Bmnr,
            shares_outstanding: 121_700_000.0,
            eth_holdings: 833_137.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["symbol"], "BMNR");
        assert_eq!(json["shares_outstanding"], 121_700_000.0);
        assert_eq!(json["eth_holdings"], 833_137.0);
    }
}
