//! HTTP access to the tracker backend, behind the [`Backend`] trait so the
//! dashboard can be driven by an in-memory fake in tests.

use super::types::{
    ConfigStatus, ConfigStatusEnvelope, ConfigUpdateAck, ConfigUpdateRequest, DataEnvelope,
    HealthResponse, HistoricalEnvelope, HistoryRow, ManualUpdateEnvelope, SnapshotData,
    UpdateConfigEnvelope,
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Server-reported business error, surfaced verbatim.
    #[error("{0}")]
    Backend(String),
    #[error("malformed response: {0}")]
    Payload(String),
}

impl ApiError {
    /// True when a config update was rejected because the backend does not
    /// know the submitted ticker; drives a more specific notification.
    pub fn is_unknown_symbol(&self) -> bool {
        match self {
            ApiError::Backend(message) => {
                let lower = message.to_ascii_lowercase();
                lower.contains("unknown symbol") || lower.contains("unrecognized symbol")
            }
            _ => false,
        }
    }
}

/// The backend collaborator as the client sees it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the current snapshot of prices, ratios and configuration.
    async fn fetch_data(&self) -> Result<SnapshotData, ApiError>;

    /// Ask the backend to recompute prices and mNAV out of band.
    async fn manual_update(&self) -> Result<(), ApiError>;

    /// Replace one symbol's configuration wholesale.
    async fn update_config(
        &self,
        request: &ConfigUpdateRequest,
    ) -> Result<ConfigUpdateAck, ApiError>;

    /// Read the current configuration and its last-written timestamp.
    async fn config_status(&self) -> Result<ConfigStatus, ApiError>;

    /// Read the accumulated historical price/mNAV rows.
    async fn historical_data(&self) -> Result<Vec<HistoryRow>, ApiError>;

    /// Liveness probe.
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

/// reqwest-backed [`Backend`] implementation.
///
/// No request timeout or retry on top of reqwest's defaults: a hung request
/// leaves the caller suspended until it resolves, matching the polling
/// model's skip-not-abort semantics.
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn rejected(error: Option<String>, fallback: &str) -> ApiError {
    ApiError::Backend(error.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_data(&self) -> Result<SnapshotData, ApiError> {
        debug!(url = %self.url("/api/data"), "fetching snapshot");
        let envelope: DataEnvelope = self
            .http
            .get(self.url("/api/data"))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(rejected(envelope.error, "data request rejected"));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Payload("response missing data field".to_string()))
    }

    async fn manual_update(&self) -> Result<(), ApiError> {
        debug!("triggering manual update");
        let envelope: ManualUpdateEnvelope = self
            .http
            .post(self.url("/api/manual_update"))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(rejected(envelope.error, "manual update failed"));
        }
        Ok(())
    }

    async fn update_config(
        &self,
        request: &ConfigUpdateRequest,
    ) -> Result<ConfigUpdateAck, ApiError> {
        debug!(symbol = %request.symbol, "submitting config update");
        let envelope: UpdateConfigEnvelope = self
            .http
            .post(self.url("/api/update_config"))
            .json(request)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(rejected(envelope.error, "config update rejected"));
        }
        Ok(ConfigUpdateAck {
            config: envelope.config,
            latest_data: envelope.latest_data,
        })
    }

    async fn config_status(&self) -> Result<ConfigStatus, ApiError> {
        let envelope: ConfigStatusEnvelope = self
            .http
            .get(self.url("/api/config_status"))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(rejected(envelope.error, "config status unavailable"));
        }
        Ok(ConfigStatus {
            timestamp: envelope.timestamp,
            config: envelope.config,
        })
    }

    async fn historical_data(&self) -> Result<Vec<HistoryRow>, ApiError> {
        let envelope: HistoricalEnvelope = self
            .http
            .get(self.url("/api/historical_data"))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(rejected(envelope.error, "historical data unavailable"));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response: HealthResponse = self
            .http
            .get(self.url("/health"))
            .send()
            .await?
            .json()
            .await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Symbol;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_data_unwraps_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "price_data": ["2026-08-06T12:00:00", 1.2345, 6.78, 2000.5],
                    "mnav_data": ["2026-08-06T12:00:00", 0.5, 1.1],
                    "config": {
                        "SBET": {"shares_outstanding": 129038060.0, "eth_holdings": 521939.0}
                    }
                },
                "timestamp": "2026-08-06T12:00:01"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let snapshot = backend.fetch_data().await.unwrap();

        assert_eq!(snapshot.price_data.as_ref().unwrap().sbet(), Some(1.2345));
        assert_eq!(snapshot.mnav_data.as_ref().unwrap().bmnr(), Some(1.1));
        let entry = snapshot.config_for(Symbol::Sbet).unwrap();
        assert_eq!(entry.eth_holdings, 521_939.0);
    }

    #[tokio::test]
    async fn test_fetch_data_surfaces_server_error_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"success": false, "error": "bad request"})),
            )
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let err = backend.fetch_data().await.unwrap_err();
        assert!(matches!(&err, ApiError::Backend(m) if m == "bad request"));
    }

    #[tokio::test]
    async fn test_fetch_data_success_without_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let err = backend.fetch_data().await.unwrap_err();
        assert!(matches!(err, ApiError::Payload(_)));
    }

    #[tokio::test]
    async fn test_update_config_posts_body_and_returns_latest_data() {
        let server = MockServer::start().await;
        let request = ConfigUpdateRequest {
            symbol: Symbol::Sbet,
            shares_outstanding: 129_038_060.0,
            eth_holdings: 521_939.0,
        };
        Mock::given(method("POST"))
            .and(path("/api/update_config"))
            .and(body_json(json!({
                "symbol": "SBET",
                "shares_outstanding": 129038060.0,
                "eth_holdings": 521939.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "config": {
                    "SBET": {"shares_outstanding": 129038060.0, "eth_holdings": 521939.0}
                },
                "latest_data": {
                    "price_data": ["2026-08-06T12:05:00", 1.25, 6.8, 2001.0],
                    "mnav_data": ["2026-08-06T12:05:00", 0.51, 1.12]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let ack = backend.update_config(&request).await.unwrap();
        assert!(ack.latest_data.is_some());
        assert!(ack.config.unwrap().contains_key("SBET"));
    }

    #[tokio::test]
    async fn test_update_config_rejection_flags_unknown_symbol() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/update_config"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"success": false, "error": "unknown symbol: XYZ"})),
            )
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let request = ConfigUpdateRequest {
            symbol: Symbol::Sbet,
            shares_outstanding: 1.0,
            eth_holdings: 1.0,
        };
        let err = backend.update_config(&request).await.unwrap_err();
        assert!(err.is_unknown_symbol());
        assert_eq!(err.to_string(), "unknown symbol: XYZ");
    }

    #[tokio::test]
    async fn test_manual_update_and_config_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/manual_update"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/config_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "timestamp": "2026-08-06T11:00:00",
                "config": {
                    "BMNR": {"shares_outstanding": 121700000.0, "eth_holdings": 833137.0}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        backend.manual_update().await.unwrap();
        let status = backend.config_status().await.unwrap();
        assert_eq!(status.timestamp.as_deref(), Some("2026-08-06T11:00:00"));
        assert!(status.config.unwrap().contains_key("BMNR"));
    }

    #[tokio::test]
    async fn test_historical_data_defaults_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/historical_data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        assert!(backend.historical_data().await.unwrap().is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://127.0.0.1:5000/");
        assert_eq!(backend.base_url(), "http://127.0.0.1:5000");
    }
}
