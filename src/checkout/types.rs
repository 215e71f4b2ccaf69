//! Order API wire types and response classification.
//!
//! DESIGN
//! ======
//! The backend answers with loosely shaped JSON: an order id, a provider
//! error envelope (`details[]` + `debug_id`), or a capture result. Bodies are
//! classified into tagged variants once, here, so the flow matches on them
//! exhaustively instead of probing optional fields.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cart line sent to `POST /api/orders`. Quantity travels as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub quantity: String,
}

impl CartItem {
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self { id: id.into(), quantity: quantity.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub cart: Vec<CartItem>,
}

/// Opaque provider order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First entry of a provider error envelope plus its correlation id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderError {
    pub issue: Option<String>,
    pub description: Option<String>,
    pub debug_id: Option<String>,
}

impl ProviderError {
    /// Extract `details[0]` and the top-level `debug_id`, if `details[0]` exists.
    pub fn from_body(body: &Value) -> Option<Self> {
        let detail = body.get("details")?.get(0)?;
        Some(Self {
            issue: str_field(detail, "issue"),
            description: str_field(detail, "description"),
            debug_id: str_field(body, "debug_id"),
        })
    }

    pub fn has_issue(&self, issue: &str) -> bool {
        self.issue.as_deref() == Some(issue)
    }

    /// `"{issue} {description} ({debug_id})"`, skipping absent parts.
    pub fn summary(&self) -> String {
        let head = [self.issue.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        self.with_debug_id(head)
    }

    /// `"{description} ({debug_id})"`, skipping absent parts.
    pub fn reason(&self) -> String {
        let head = self
            .description
            .clone()
            .or_else(|| self.issue.clone())
            .unwrap_or_default();
        self.with_debug_id(head)
    }

    fn with_debug_id(&self, head: String) -> String {
        let head = if head.is_empty() { "unknown provider error".to_owned() } else { head };
        match &self.debug_id {
            Some(debug_id) => format!("{head} ({debug_id})"),
            None => head,
        }
    }
}

/// A finalized (captured) or authorized payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub status: String,
}

/// Classified body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOrderResponse {
    Created { id: OrderId },
    ErrorDetail(ProviderError),
    Unrecognized(Value),
}

impl CreateOrderResponse {
    pub fn classify(body: Value) -> Self {
        if let Some(id) = order_id_field(&body) {
            return Self::Created { id: OrderId::new(id) };
        }
        match ProviderError::from_body(&body) {
            Some(error) => Self::ErrorDetail(error),
            None => Self::Unrecognized(body),
        }
    }
}

/// Classified body of `POST /api/orders/{id}/capture`.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureResponse {
    Captured { transaction: Transaction, body: Value },
    ErrorDetail(ProviderError),
    /// `purchase_units` present, but no capture or authorization inside.
    MissingTransaction(Value),
    /// Neither an error envelope nor `purchase_units`.
    Unrecognized(Value),
}

impl CaptureResponse {
    pub fn classify(body: Value) -> Self {
        if let Some(error) = ProviderError::from_body(&body) {
            return Self::ErrorDetail(error);
        }
        let Some(units) = body.get("purchase_units").filter(|v| !v.is_null()) else {
            return Self::Unrecognized(body);
        };
        let payments = units.get(0).and_then(|unit| unit.get("payments"));
        let transaction = payments
            .and_then(|p| first_transaction(p, "captures"))
            .or_else(|| payments.and_then(|p| first_transaction(p, "authorizations")));
        match transaction {
            Some(transaction) => Self::Captured { transaction, body },
            None => Self::MissingTransaction(body),
        }
    }
}

fn first_transaction(payments: &Value, kind: &str) -> Option<Transaction> {
    let entry = payments.get(kind)?.get(0)?;
    Some(Transaction {
        id: str_field(entry, "id")?,
        status: str_field(entry, "status").unwrap_or_else(|| "UNKNOWN".to_owned()),
    })
}

/// A non-empty string id, or a non-zero numeric one rendered as text.
fn order_id_field(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
