//! JSON-over-HTTP interface to the tracker backend.

pub mod client;
pub mod types;

pub use client::{ApiError, Backend, HttpBackend};
pub use types::{
    ConfigEntry, ConfigStatus, ConfigUpdateAck, ConfigUpdateRequest, HealthResponse, HistoryRow,
    MnavRow, PriceRow, SnapshotData,
};
