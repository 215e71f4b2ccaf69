//! Hosted checkout button hooks backed by the server order API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The payment widget renders the button and owns the payer interaction.
//! This module implements its hooks: `flow` runs create/capture against an
//! `api::OrderApi`, `types` classifies response bodies, and `message`
//! renders outcomes into a single result region.

pub mod api;
pub mod error;
pub mod flow;
pub mod message;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub use api::HttpOrderApi;
pub use api::{ORDERS_PATH, OrderApi, capture_path};
pub use error::CheckoutError;
pub use flow::{CaptureOutcome, CheckoutFlow, CheckoutState};
pub use message::{MessageKind, RecordingSink, ResultMessage, ResultSink};
pub use types::{
    CaptureResponse, CartItem, CreateOrderRequest, CreateOrderResponse, OrderId, ProviderError, Transaction,
};
