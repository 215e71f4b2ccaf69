//! web-sys adapters and JS entry points.
//!
//! The page calls `initTheme()` once and keeps the returned handle; the
//! checkout page additionally calls `mountCheckout()` after the widget SDK
//! has loaded. Nothing is installed on `window`.

pub mod checkout;
pub mod theme;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::config::{CheckoutConfig, ThemeOptions, parse_cart};

pub(crate) fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// JS handle over a mounted theme controller.
///
/// Freeing the handle detaches its listeners, the same as `destroy()`.
#[wasm_bindgen]
pub struct ThemeHandle {
    controller: Rc<theme::BrowserThemeController>,
    bindings: Option<theme::ThemeBindings>,
}

#[wasm_bindgen]
impl ThemeHandle {
    pub fn theme(&self) -> String {
        self.controller.theme().to_string()
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.controller.is_dark()
    }

    #[wasm_bindgen(js_name = isLight)]
    pub fn is_light(&self) -> bool {
        self.controller.is_light()
    }

    /// Toggle and return the new theme name.
    pub fn toggle(&self) -> String {
        self.controller.toggle_theme().to_string()
    }

    /// # Errors
    ///
    /// Rejects names other than `light` and `dark`.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, name: &str) -> Result<(), JsValue> {
        self.controller.set_theme_named(name).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Detach every listener this handle installed.
    pub fn destroy(&mut self) {
        if let Some(bindings) = self.bindings.take() {
            bindings.unbind();
        }
    }
}

/// Mount the theme controller on the current document.
///
/// # Errors
///
/// Fails when there is no `window.document`.
#[wasm_bindgen(js_name = initTheme)]
pub fn init_theme(storage_key: Option<String>) -> Result<ThemeHandle, JsValue> {
    crate::logging::init();
    let mut options = ThemeOptions::default();
    if let Some(key) = storage_key {
        options = options.with_storage_key(key);
    }
    let (controller, bindings) = theme::mount(options).ok_or_else(|| JsValue::from_str("document not available"))?;
    tracing::info!(theme = %controller.theme(), listeners = bindings.len(), "theme initialized");
    Ok(ThemeHandle { controller, bindings: Some(bindings) })
}

/// Render the payment buttons and wire them to the order API.
///
/// `cart` uses the `id:qty,...` form; omitted means the default product.
///
/// # Errors
///
/// Fails on a malformed cart, a missing document, or a widget SDK that is
/// not loaded.
#[wasm_bindgen(js_name = mountCheckout)]
pub fn mount_checkout(cart: Option<String>) -> Result<(), JsValue> {
    crate::logging::init();
    let mut config = CheckoutConfig::default();
    if let Some(raw) = cart {
        let items = parse_cart(&raw).map_err(|e| JsValue::from_str(&e.to_string()))?;
        config = config.with_cart(items);
    }
    checkout::mount(config)?;
    Ok(())
}
