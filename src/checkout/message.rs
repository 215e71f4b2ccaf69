//! User-facing checkout result messages and the region they render into.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use std::cell::{Cell, RefCell};

use super::error::CheckoutError;
use super::types::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

impl MessageKind {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success-message",
            Self::Error => "error-message",
            Self::Info => "info-message",
        }
    }
}

/// Full contents of the result region. Rendering replaces whatever was there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMessage {
    pub kind: MessageKind,
    pub paragraphs: Vec<String>,
}

impl ResultMessage {
    pub fn new(kind: MessageKind, paragraphs: Vec<String>) -> Self {
        Self { kind, paragraphs }
    }

    pub fn create_failed(error: &CheckoutError) -> Self {
        Self::new(
            MessageKind::Error,
            vec!["Could not initiate PayPal Checkout...".into(), error.to_string()],
        )
    }

    pub fn capture_failed(error: &CheckoutError) -> Self {
        Self::new(
            MessageKind::Error,
            vec!["Sorry, your transaction could not be processed...".into(), error.to_string()],
        )
    }

    pub fn captured(transaction: &Transaction) -> Self {
        Self::new(
            MessageKind::Success,
            vec![
                format!("Transaction {}: {}", transaction.status, transaction.id),
                "See console for all available details".into(),
            ],
        )
    }

    /// Shown when the hosted widget reports an error of its own.
    pub fn widget_error() -> Self {
        Self::new(
            MessageKind::Error,
            vec![
                "An error occurred during payment processing.".into(),
                "Please try again or contact support.".into(),
            ],
        )
    }

    pub fn cancelled() -> Self {
        Self::new(MessageKind::Info, vec!["Your payment was cancelled. You can try again anytime.".into()])
    }

    /// Plain-text rendering, paragraphs separated by a blank line.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n\n")
    }

    /// HTML rendering for the result region. Paragraph text is escaped.
    pub fn to_html(&self) -> String {
        let body = self.paragraphs.iter().map(|p| html_escape::encode_safe(p)).collect::<Vec<_>>().join("<br><br>");
        format!("<div class=\"{}\">{body}</div>", self.kind.css_class())
    }
}

/// The designated result region plus the buy button container.
pub trait ResultSink {
    /// Replace the region's contents with `message`.
    fn replace(&self, message: &ResultMessage);

    /// Hide the payment button so a completed purchase cannot be repeated.
    fn hide_button(&self);
}

/// In-memory sink that keeps what a page would show.
#[derive(Debug, Default)]
pub struct RecordingSink {
    history: RefCell<Vec<ResultMessage>>,
    button_hidden: Cell<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the region currently shows.
    pub fn current(&self) -> Option<ResultMessage> {
        self.history.borrow().last().cloned()
    }

    pub fn history(&self) -> Vec<ResultMessage> {
        self.history.borrow().clone()
    }

    pub fn button_hidden(&self) -> bool {
        self.button_hidden.get()
    }
}

impl ResultSink for RecordingSink {
    fn replace(&self, message: &ResultMessage) {
        self.history.borrow_mut().push(message.clone());
    }

    fn hide_button(&self) {
        self.button_hidden.set(true);
    }
}
