//! Binance spot REST client.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::auth::sign_query;
use super::responses::{Account, ApiErrorResponse, Depth, ExchangeInfo, OrderAck};
use crate::domain::Credentials;
use crate::error::{ExchangeError, Result};

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const RECV_WINDOW_MS: u64 = 5000;
const TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters of a new spot order, in wire form.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub symbol: String,
    /// `BUY` or `SELL`.
    pub side: &'static str,
    pub quantity: String,
    pub price: String,
}

/// HTTP client for the public and signed spot endpoints.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: HttpClient,
    base_url: Url,
}

impl BinanceClient {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let http = HttpClient::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        let url = self.endpoint("/api/v3/exchangeInfo", None)?;
        self.send(self.http.get(url)).await
    }

    pub async fn depth(&self, symbol: &str, limit: u16) -> Result<Depth> {
        let limit = limit.to_string();
        let query = encode(&[("symbol", symbol), ("limit", limit.as_str())]);
        let url = self.endpoint("/api/v3/depth", Some(&query))?;
        self.send(self.http.get(url)).await
    }

    pub async fn account(&self, credentials: &Credentials) -> Result<Account> {
        self.signed(Method::GET, "/api/v3/account", &[], credentials)
            .await
    }

    /// Place a LIMIT order that executes immediately or not at all
    /// (`IOC`), returning the fill result.
    pub async fn new_order(&self, order: &NewOrder, credentials: &Credentials) -> Result<OrderAck> {
        let params = [
            ("symbol", order.symbol.as_str()),
            ("side", order.side),
            ("type", "LIMIT"),
            ("timeInForce", "IOC"),
            ("quantity", order.quantity.as_str()),
            ("price", order.price.as_str()),
            ("newOrderRespType", "RESULT"),
        ];
        self.signed(Method::POST, "/api/v3/order", &params, credentials)
            .await
    }

    async fn signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        credentials: &Credentials,
    ) -> Result<T> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let recv_window = RECV_WINDOW_MS.to_string();

        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.push(("recvWindow", recv_window.as_str()));
        all.push(("timestamp", timestamp.as_str()));

        let query = encode(&all);
        let signature = sign_query(credentials.api_secret(), &query)?;
        let url = self.endpoint(path, Some(&format!("{query}&signature={signature}")))?;

        let request = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, credentials.api_key());
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, bytes = text.len(), "Binance response");

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        let error = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(body) => ExchangeError::from(body),
            Err(_) => ExchangeError::Api {
                code: i64::from(status.as_u16()),
                msg: text,
            },
        };
        Err(error.into())
    }

    fn endpoint(&self, path: &str, query: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        url.set_query(query);
        Ok(url)
    }
}

fn encode(params: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}
