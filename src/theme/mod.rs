//! Light/dark theme preference management.
//!
//! SYSTEM CONTEXT
//! ==============
//! `controller` owns the theme state machine. `store`, `system`, and
//! `surface` are the seams it talks through: persistence, the OS color
//! scheme, and whatever renders the theme. Browser bindings for all three
//! live in `crate::browser`.

pub mod controller;
pub mod store;
pub mod surface;
pub mod system;
pub mod types;

pub use controller::{SubscriptionId, ThemeController};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
pub use store::{MemoryStore, PreferenceStore, StorageError};
pub use surface::{Announcement, RecordingSurface, SurfaceEvent, ThemeMarker, ThemeSurface, Transition};
#[cfg(not(target_arch = "wasm32"))]
pub use system::OsPreference;
pub use system::{FixedPreference, SystemPreference};
pub use types::{KeyInput, Theme, ThemeChange, ThemeParseError, ToggleLabel};
