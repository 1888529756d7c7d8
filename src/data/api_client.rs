use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::API;
use crate::domain::strategy::{StrategiesResponse, StrategyCatalog, StrategyComparison, StrategyRequest};
use crate::domain::ticker::TickerPayload;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("backend returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("ticker '{0}' does not exist")]
    TickerNotFound(String),
}

/// Blocking client for the backtest backend. Meant to be driven from a worker
/// thread (see `ui::app_async`), never from the UI thread directly.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // Validate once up front so request paths can't fail on the base alone
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http = Client::builder()
            .user_agent(API.client.user_agent)
            .timeout(Duration::from_millis(API.client.timeout_ms))
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// `GET /api/get_data/?ticker=<symbol>` with the symbol query-encoded (`^GSPC` -> `%5EGSPC`).
    pub fn data_url(&self, ticker: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint_url(API.endpoints.get_data)?;
        url.query_pairs_mut().append_pair("ticker", ticker);
        Ok(url)
    }

    /// Price history and instrument info. Any failure means the ticker can't be shown,
    /// so every error collapses to `TickerNotFound` after logging its cause.
    pub fn get_data(&self, ticker: &str) -> Result<TickerPayload, ApiError> {
        let result = self
            .data_url(ticker)
            .and_then(|url| self.get_json::<TickerPayload>(url));

        result.map_err(|e| {
            log::warn!("Ticker lookup for '{}' failed: {}", ticker, e);
            ApiError::TickerNotFound(ticker.to_string())
        })
    }

    pub fn get_all_strategies(&self) -> Result<StrategyCatalog, ApiError> {
        let url = self.endpoint_url(API.endpoints.get_all_strategies)?;
        let response: StrategiesResponse = self.get_json(url)?;
        Ok(response.into_catalog())
    }

    pub fn post_strategy(&self, request: &StrategyRequest) -> Result<StrategyComparison, ApiError> {
        let url = self.endpoint_url(API.endpoints.post_strategy)?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_requests {
            log::info!(
                "POST {} for {} ({} strategies)",
                url,
                request.ticker,
                request.strategy.len()
            );
        }

        let response = self.http.post(url.clone()).json(request).send()?;
        read_json(response, &url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_requests {
            log::info!("GET {}", url);
        }

        let response = self.http.get(url.clone()).send()?;
        read_json(response, &url)
    }
}

fn read_json<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let body = response.text()?;
    decode(&body)
}

/// Decode a response body.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::ParameterKind;

    fn client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:8080/").unwrap()
    }

    #[test]
    fn ticker_is_query_encoded() {
        let url = client().data_url("^GSPC").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/get_data/?ticker=%5EGSPC");
        assert_eq!(client().base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn endpoints_keep_a_base_path() {
        let client = ApiClient::new("https://example.com/backtest").unwrap();
        let url = client.endpoint_url(API.endpoints.post_strategy).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backtest/api/post_strategy/");
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn decodes_strategy_listing() {
        let body = r#"{"strategies": {
            "RegularInvestment": [],
            "MovingAverage": [{"name": "window", "label": "Window", "type": "integer", "default": 50}]
        }}"#;
        let catalog = decode::<StrategiesResponse>(body).unwrap().into_catalog();

        let keys: Vec<&str> = catalog.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["RegularInvestment", "MovingAverage"]);
        let window = &catalog.get("MovingAverage").unwrap().parameters[0];
        assert_eq!(window.kind, ParameterKind::Integer);
        assert_eq!(window.default_text(), "50");
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result = decode::<TickerPayload>(r#"{"info": {}}"#);
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
