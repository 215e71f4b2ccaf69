//! # pitchai-web
//!
//! Browser-side helpers for the PitchAI site: the light/dark theme
//! controller and the hosted-checkout button hooks.
//!
//! Core logic is plain Rust behind small trait seams so it runs natively
//! under test. The `hydrate` feature adds web-sys adapters that bind those
//! seams to `localStorage`, the document, `matchMedia`, and `fetch`.

pub mod checkout;
pub mod config;
pub mod logging;
pub mod theme;

#[cfg(feature = "hydrate")]
pub mod browser;

pub use checkout::{CaptureOutcome, CheckoutError, CheckoutFlow, OrderApi, ResultMessage, ResultSink};
pub use config::{CheckoutConfig, ThemeOptions};
pub use theme::{Theme, ThemeChange, ThemeController};
