//! Typed options for the theme controller and the checkout flow.
//!
//! Browser code builds these directly; native consumers (the CLI, tests)
//! can read checkout settings from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::checkout::CartItem;
use crate::theme::Theme;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PRODUCT_ID: &str = "pitchai_upgrade";
pub const DEFAULT_DECLINED_ISSUE: &str = "INSTRUMENT_DECLINED";
pub const DEFAULT_RESULT_SELECTOR: &str = "#result-message";
pub const DEFAULT_BUTTON_SELECTOR: &str = "#paypal-button-container";
pub const DEFAULT_TRANSITION_CSS: &str = "background-color 0.3s ease, color 0.3s ease";
pub const DEFAULT_TRANSITION_MS: u64 = 300;
pub const DEFAULT_ANNOUNCEMENT_MS: u64 = 1000;

/// Errors from parsing configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid cart entry '{0}' (expected id:quantity)")]
    InvalidCartEntry(String),

    #[error("cart must contain at least one item")]
    EmptyCart,

    #[error("invalid base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
}

// =============================================================================
// THEME
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeOptions {
    /// Attribute set on the root element, e.g. `data-theme="dark"`.
    pub theme_attribute: String,
    pub storage_key: String,
    pub default_theme: Theme,
    pub toggle_selector: String,
    /// Class toggled on root and body for stylesheets that key off a class.
    pub dark_class: String,
    pub animate_transitions: bool,
    pub respect_system_preference: bool,
    pub transition_css: String,
    pub transition_duration: Duration,
    pub announcement_linger: Duration,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            theme_attribute: "data-theme".into(),
            storage_key: "theme".into(),
            default_theme: Theme::Light,
            toggle_selector: ".theme-toggle-menu".into(),
            dark_class: "dark".into(),
            animate_transitions: true,
            respect_system_preference: true,
            transition_css: DEFAULT_TRANSITION_CSS.into(),
            transition_duration: Duration::from_millis(DEFAULT_TRANSITION_MS),
            announcement_linger: Duration::from_millis(DEFAULT_ANNOUNCEMENT_MS),
        }
    }
}

impl ThemeOptions {
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_default_theme(mut self, theme: Theme) -> Self {
        self.default_theme = theme;
        self
    }

    #[must_use]
    pub fn with_animations(mut self, enabled: bool) -> Self {
        self.animate_transitions = enabled;
        self
    }

    #[must_use]
    pub fn with_system_preference(mut self, respected: bool) -> Self {
        self.respect_system_preference = respected;
        self
    }
}

// =============================================================================
// CHECKOUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Origin of the order API, without a trailing slash. Only used by
    /// transports that need absolute URLs.
    pub base_url: String,
    pub cart: Vec<CartItem>,
    /// Provider issue code that means "declined, let the payer pick another instrument".
    pub declined_issue: String,
    pub result_selector: String,
    pub button_selector: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            cart: vec![CartItem::new(DEFAULT_PRODUCT_ID, 1)],
            declined_issue: DEFAULT_DECLINED_ISSUE.into(),
            result_selector: DEFAULT_RESULT_SELECTOR.into(),
            button_selector: DEFAULT_BUTTON_SELECTOR.into(),
        }
    }
}

impl CheckoutConfig {
    /// Build checkout config from environment variables.
    ///
    /// Optional:
    /// - `PITCHAI_API_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `PITCHAI_CART`: comma-separated `id:quantity` pairs, default `pitchai_upgrade:1`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CheckoutConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("PITCHAI_API_BASE_URL") {
            config.base_url = normalize_base_url(&raw)?;
        }
        if let Some(raw) = lookup("PITCHAI_CART") {
            config.cart = parse_cart(&raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn with_cart(mut self, cart: Vec<CartItem>) -> Self {
        self.cart = cart;
        self
    }
}

/// Validate the scheme and strip trailing slashes.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` for anything that is not an http(s) URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// Parse `id:quantity[,id:quantity...]`.
///
/// # Errors
///
/// Returns an error for empty input, a missing id, or a quantity that is not a positive integer.
pub fn parse_cart(raw: &str) -> Result<Vec<CartItem>, ConfigError> {
    let mut cart = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((id, quantity)) = entry.split_once(':') else {
            return Err(ConfigError::InvalidCartEntry(entry.to_owned()));
        };
        let id = id.trim();
        let quantity = quantity.trim().parse::<u32>().ok().filter(|q| *q > 0);
        match (id.is_empty(), quantity) {
            (false, Some(quantity)) => cart.push(CartItem::new(id, quantity)),
            _ => return Err(ConfigError::InvalidCartEntry(entry.to_owned())),
        }
    }
    if cart.is_empty() {
        return Err(ConfigError::EmptyCart);
    }
    Ok(cart)
}
