//! Theme value types shared by the controller and its adapters.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The document's visual mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Literal value written to storage and to the theme attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn is_light(self) -> bool {
        self == Self::Light
    }

    /// Map a "prefers dark" environment signal to a theme.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A theme name other than `light` or `dark`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid theme '{0}' (expected 'light' or 'dark')")]
pub struct ThemeParseError(pub String);

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_owned())),
        }
    }
}

/// Payload delivered to observers on every applied theme.
///
/// Serializes with camelCase keys so it can be used directly as the
/// `detail` of the DOM `themeChange` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChange {
    pub theme: Theme,
    pub is_dark: bool,
    pub is_light: bool,
}

impl ThemeChange {
    pub fn new(theme: Theme) -> Self {
        Self { theme, is_dark: theme.is_dark(), is_light: theme.is_light() }
    }
}

/// Text shown on the toggle control. It names the mode a click switches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleLabel {
    pub icon: &'static str,
    pub text: &'static str,
}

impl ToggleLabel {
    pub fn for_theme(current: Theme) -> Self {
        match current {
            Theme::Dark => Self { icon: "\u{2600}\u{fe0f}", text: "Light Mode" },
            Theme::Light => Self { icon: "\u{1f319}", text: "Dark Mode" },
        }
    }

    /// Icon and text as rendered inside the control.
    pub fn render(&self) -> String {
        format!("{} {}", self.icon, self.text)
    }
}

/// Platform-neutral view of a keydown event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Enter or Space while the toggle control has focus.
    pub fn is_toggle_activation(&self) -> bool {
        self.key == "Enter" || self.key == " "
    }

    /// Ctrl/Cmd + Shift + D anywhere in the document.
    pub fn is_global_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && self.shift && self.key == "D"
    }
}
