//! Environment-reported color scheme.

use std::cell::Cell;

/// Source of the OS-level "prefers dark" signal.
pub trait SystemPreference {
    /// `None` when the environment cannot report a preference.
    fn prefers_dark(&self) -> Option<bool>;
}

/// A preference set by the caller, adjustable at runtime.
#[derive(Debug, Default)]
pub struct FixedPreference {
    value: Cell<Option<bool>>,
}

impl FixedPreference {
    pub fn new(value: Option<bool>) -> Self {
        Self { value: Cell::new(value) }
    }

    pub fn dark() -> Self {
        Self::new(Some(true))
    }

    pub fn light() -> Self {
        Self::new(Some(false))
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn set(&self, value: Option<bool>) {
        self.value.set(value);
    }
}

impl SystemPreference for FixedPreference {
    fn prefers_dark(&self) -> Option<bool> {
        self.value.get()
    }
}

/// Desktop color scheme detected through `dark-light`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct OsPreference;

#[cfg(not(target_arch = "wasm32"))]
impl SystemPreference for OsPreference {
    fn prefers_dark(&self) -> Option<bool> {
        match dark_light::detect() {
            dark_light::Mode::Dark => Some(true),
            dark_light::Mode::Light => Some(false),
        }
    }
}
