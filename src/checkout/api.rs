//! Backend order API transport.
//!
//! `HttpOrderApi` talks to the backend with `reqwest` against an absolute
//! base URL (native code, tests, the CLI). The browser uses the `fetch`
//! transport in `crate::browser::checkout`, which resolves relative paths.
//!
//! Bodies are returned as raw JSON regardless of HTTP status: the backend
//! reports provider errors in the body, and classification happens in the
//! flow.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde_json::Value;

use super::error::CheckoutError;
use super::types::{CreateOrderRequest, OrderId};
#[cfg(not(target_arch = "wasm32"))]
use crate::config::{CheckoutConfig, normalize_base_url};

pub const ORDERS_PATH: &str = "/api/orders";

pub fn capture_path(order_id: &OrderId) -> String {
    format!("{ORDERS_PATH}/{order_id}/capture")
}

/// The two backend calls a purchase attempt makes.
#[async_trait(?Send)]
pub trait OrderApi {
    /// `POST /api/orders` with the cart.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Value, CheckoutError>;

    /// `POST /api/orders/{id}/capture`.
    async fn capture_order(&self, order_id: &OrderId) -> Result<Value, CheckoutError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub struct HttpOrderApi {
    http: reqwest::Client,
    base_url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpOrderApi {
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidBaseUrl` unless `base_url` is an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, CheckoutError> {
        let base_url = normalize_base_url(base_url).map_err(|e| CheckoutError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self { http: reqwest::Client::new(), base_url })
    }

    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidBaseUrl` if the configured base URL is malformed.
    pub fn from_config(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, body: Option<&CreateOrderRequest>) -> Result<Value, CheckoutError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.post(&url);
        request = match body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };

        let response = request.send().await.map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| CheckoutError::Transport(e.to_string()))?;
        tracing::debug!(%url, status, "order API responded");

        parse_body(status, &text)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl OrderApi for HttpOrderApi {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Value, CheckoutError> {
        self.post(ORDERS_PATH, Some(request)).await
    }

    async fn capture_order(&self, order_id: &OrderId) -> Result<Value, CheckoutError> {
        self.post(&capture_path(order_id), None).await
    }
}

/// Decode a response body as JSON, keeping the status for the error text.
///
/// # Errors
///
/// Returns `CheckoutError::Decode` if `text` is not JSON.
pub fn parse_body(status: u16, text: &str) -> Result<Value, CheckoutError> {
    serde_json::from_str(text).map_err(|e| CheckoutError::Decode(format!("status {status}: {e}")))
}
