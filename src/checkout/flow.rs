//! One purchase attempt driven by the hosted payment button.
//!
//! States: `Idle -> Creating -> Created -> Capturing -> {Succeeded, Declined, Failed}`.
//! A decline hands control back to the widget for a new attempt. A failure
//! leaves the button in place for a fresh click. Success is terminal and
//! hides the button.
//!
//! DESIGN
//! ======
//! Methods take `&self` and never hold the state borrow across an `.await`,
//! so a second click while a request is pending re-enters safely and is
//! rejected with `CheckoutError::AttemptInFlight` instead of starting a
//! parallel attempt.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use std::cell::{Cell, RefCell};

use uuid::Uuid;

use super::api::OrderApi;
use super::error::CheckoutError;
use super::message::{ResultMessage, ResultSink};
use super::types::{CaptureResponse, CreateOrderRequest, CreateOrderResponse, OrderId, Transaction};
use crate::config::CheckoutConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Creating,
    Created(OrderId),
    Capturing(OrderId),
    Succeeded(Transaction),
    /// The payer's instrument was declined; the widget restarts the attempt.
    Declined,
    Failed,
}

impl CheckoutState {
    fn in_flight(&self) -> bool {
        matches!(self, Self::Creating | Self::Capturing(_))
    }
}

/// What the widget should do after an approval was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Ask the widget to restart so the payer can choose another instrument.
    Restart,
    /// Terminal failure; the message has already been rendered.
    Failed(CheckoutError),
    Succeeded(Transaction),
}

pub struct CheckoutFlow<A, R> {
    api: A,
    sink: R,
    config: CheckoutConfig,
    state: RefCell<CheckoutState>,
    attempt: Cell<Option<Uuid>>,
    /// Set when a failed request rendered its own message; consumed by the next widget error.
    reported: Cell<bool>,
}

impl<A, R> CheckoutFlow<A, R>
where
    A: OrderApi,
    R: ResultSink,
{
    pub fn new(api: A, sink: R, config: CheckoutConfig) -> Self {
        Self {
            api,
            sink,
            config,
            state: RefCell::new(CheckoutState::Idle),
            attempt: Cell::new(None),
            reported: Cell::new(false),
        }
    }

    /// Create an order for the configured cart.
    ///
    /// On failure the formatted message is rendered before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the transport, decode, or provider error, or a guard error
    /// (`AttemptInFlight`, `AlreadyCompleted`) when no request was made.
    pub async fn create_order(&self) -> Result<OrderId, CheckoutError> {
        let attempt = self.begin_attempt()?;
        let request = CreateOrderRequest { cart: self.config.cart.clone() };

        let result = match self.api.create_order(&request).await {
            Ok(body) => match CreateOrderResponse::classify(body) {
                CreateOrderResponse::Created { id } => Ok(id),
                CreateOrderResponse::ErrorDetail(error) => Err(CheckoutError::OrderRejected(error)),
                CreateOrderResponse::Unrecognized(body) => Err(CheckoutError::MissingOrderId(body.to_string())),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(id) => {
                tracing::info!(%attempt, order_id = %id, "order created");
                self.state.replace(CheckoutState::Created(id.clone()));
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(%attempt, code = e.error_code(), error = %e, "order creation failed");
                self.state.replace(CheckoutState::Failed);
                self.sink.replace(&ResultMessage::create_failed(&e));
                self.reported.set(true);
                Err(e)
            }
        }
    }

    /// Finalize an approved order.
    pub async fn capture_order(&self, order_id: &OrderId) -> CaptureOutcome {
        {
            let state = self.state.borrow();
            if state.in_flight() {
                tracing::warn!(order_id = %order_id, "capture requested while another request is pending");
                return CaptureOutcome::Failed(CheckoutError::AttemptInFlight);
            }
            if matches!(*state, CheckoutState::Succeeded(_)) {
                return CaptureOutcome::Failed(CheckoutError::AlreadyCompleted);
            }
        }
        self.state.replace(CheckoutState::Capturing(order_id.clone()));
        self.reported.set(false);
        let attempt = self.attempt_id_or_new();

        let body = match self.api.capture_order(order_id).await {
            Ok(body) => body,
            Err(e) => return self.fail_capture(attempt, e),
        };

        match CaptureResponse::classify(body) {
            CaptureResponse::ErrorDetail(error) if error.has_issue(&self.config.declined_issue) => {
                tracing::info!(%attempt, order_id = %order_id, "instrument declined, restarting");
                self.state.replace(CheckoutState::Declined);
                CaptureOutcome::Restart
            }
            CaptureResponse::ErrorDetail(error) => self.fail_capture(attempt, CheckoutError::CaptureRejected(error)),
            CaptureResponse::MissingTransaction(body) | CaptureResponse::Unrecognized(body) => {
                self.fail_capture(attempt, CheckoutError::MissingTransaction(body.to_string()))
            }
            CaptureResponse::Captured { transaction, body } => {
                tracing::info!(
                    %attempt,
                    order_id = %order_id,
                    transaction_id = %transaction.id,
                    status = %transaction.status,
                    result = %body,
                    "capture result"
                );
                self.state.replace(CheckoutState::Succeeded(transaction.clone()));
                self.sink.replace(&ResultMessage::captured(&transaction));
                self.sink.hide_button();
                CaptureOutcome::Succeeded(transaction)
            }
        }
    }

    /// The hosted widget reported an error of its own.
    ///
    /// A widget error that directly follows a failed request which already
    /// rendered its own message is only logged. Any other widget error
    /// renders the generic message.
    pub fn on_error(&self, detail: &str) {
        let already_reported = self.reported.replace(false);
        tracing::error!(detail, "payment widget error");
        if already_reported {
            return;
        }
        self.state.replace(CheckoutState::Failed);
        self.sink.replace(&ResultMessage::widget_error());
    }

    /// The payer closed the widget without approving.
    pub fn on_cancel(&self) {
        tracing::info!("payment cancelled");
        self.reported.set(false);
        self.state.replace(CheckoutState::Idle);
        self.sink.replace(&ResultMessage::cancelled());
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    /// Client-side id of the current attempt, used only for log correlation.
    pub fn attempt_id(&self) -> Option<Uuid> {
        self.attempt.get()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    fn begin_attempt(&self) -> Result<Uuid, CheckoutError> {
        {
            let state = self.state.borrow();
            if state.in_flight() {
                tracing::warn!("order requested while another request is pending");
                return Err(CheckoutError::AttemptInFlight);
            }
            if matches!(*state, CheckoutState::Succeeded(_)) {
                return Err(CheckoutError::AlreadyCompleted);
            }
        }
        let attempt = Uuid::new_v4();
        self.attempt.set(Some(attempt));
        self.reported.set(false);
        self.state.replace(CheckoutState::Creating);
        Ok(attempt)
    }

    fn attempt_id_or_new(&self) -> Uuid {
        self.attempt.get().unwrap_or_else(|| {
            let attempt = Uuid::new_v4();
            self.attempt.set(Some(attempt));
            attempt
        })
    }

    fn fail_capture(&self, attempt: Uuid, error: CheckoutError) -> CaptureOutcome {
        tracing::warn!(%attempt, code = error.error_code(), error = %error, "capture failed");
        self.state.replace(CheckoutState::Failed);
        self.sink.replace(&ResultMessage::capture_failed(&error));
        self.reported.set(true);
        CaptureOutcome::Failed(error)
    }
}
