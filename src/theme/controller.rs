//! Theme state manager.
//!
//! Resolves the initial theme (stored preference, then system preference,
//! then the configured default), applies it through a [`ThemeSurface`],
//! persists explicit choices, and follows system preference changes while
//! the user has not made a choice of their own.
//!
//! DESIGN
//! ======
//! All methods take `&self`. Browser event listeners hold the controller in
//! an `Rc` and may re-enter it from observer callbacks, so state lives in
//! `Cell`/`RefCell` and no borrow is held while observers run.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures are logged and swallowed. The in-memory theme stays
//! authoritative for the session.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::store::PreferenceStore;
use super::surface::{Announcement, ThemeMarker, ThemeSurface, Transition};
use super::system::SystemPreference;
use super::types::{Theme, ThemeChange, ThemeParseError, ToggleLabel};
use crate::config::ThemeOptions;

/// Handle returned by [`ThemeController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&ThemeChange)>;

pub struct ThemeController<S, P, D> {
    options: ThemeOptions,
    store: S,
    system: P,
    surface: D,
    current: Cell<Theme>,
    applied: Cell<bool>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_subscription: Cell<u64>,
}

impl<S, P, D> ThemeController<S, P, D>
where
    S: PreferenceStore,
    P: SystemPreference,
    D: ThemeSurface,
{
    /// Build a controller and resolve its initial theme.
    ///
    /// Nothing is rendered until [`ThemeController::init`] runs.
    pub fn new(options: ThemeOptions, store: S, system: P, surface: D) -> Self {
        let controller = Self {
            options,
            store,
            system,
            surface,
            current: Cell::new(Theme::default()),
            applied: Cell::new(false),
            observers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        };
        controller.current.set(controller.resolve_initial_theme());
        controller
    }

    /// Apply the resolved theme without animation. Later calls are no-ops.
    pub fn init(&self) {
        if self.applied.get() {
            return;
        }
        let theme = self.current.get();
        tracing::debug!(%theme, "initializing theme");
        self.apply_theme(theme, false);
    }

    /// Stored preference if present and valid, else the system preference
    /// (when enabled and reported), else the configured default.
    pub fn resolve_initial_theme(&self) -> Theme {
        match self.store.load(&self.options.storage_key) {
            Ok(Some(raw)) => match raw.parse::<Theme>() {
                Ok(theme) => return theme,
                Err(e) => tracing::debug!(error = %e, "ignoring stored theme"),
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "theme preference unreadable, using default");
                return self.options.default_theme;
            }
        }

        if self.options.respect_system_preference {
            if let Some(prefers_dark) = self.system.prefers_dark() {
                return Theme::from_prefers_dark(prefers_dark);
            }
        }

        self.options.default_theme
    }

    /// Render `theme` and notify observers. Does not persist.
    ///
    /// With `animate` (and transitions enabled) the change is wrapped in a
    /// short transition that the surface clears afterward.
    pub fn apply_theme(&self, theme: Theme, animate: bool) {
        if animate && self.options.animate_transitions {
            self.surface.begin_transition(&Transition {
                css: self.options.transition_css.clone(),
                duration: self.options.transition_duration,
            });
        }

        self.surface.apply(&ThemeMarker {
            attribute: self.options.theme_attribute.clone(),
            theme,
            dark_class: self.options.dark_class.clone(),
        });
        self.current.set(theme);
        self.applied.set(true);
        self.surface.update_toggle(&ToggleLabel::for_theme(theme));

        self.notify(ThemeChange::new(theme));
    }

    /// Apply `theme` with animation and persist it.
    ///
    /// When `theme` is already applied only the persistence write happens.
    pub fn set_theme(&self, theme: Theme) {
        if self.applied.get() && self.current.get() == theme {
            tracing::debug!(%theme, "theme already applied");
        } else {
            self.apply_theme(theme, true);
        }
        self.persist(theme);
    }

    /// Parse and set a theme by name.
    ///
    /// # Errors
    ///
    /// Returns `ThemeParseError` for anything but `light` or `dark`; nothing
    /// is applied or stored in that case.
    pub fn set_theme_named(&self, name: &str) -> Result<(), ThemeParseError> {
        let theme = name.parse::<Theme>().inspect_err(|e| tracing::warn!(error = %e, "rejected theme"))?;
        self.set_theme(theme);
        Ok(())
    }

    /// Flip light and dark, persist, and announce the change. Returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.current.get().toggled();
        self.set_theme(next);
        self.surface.haptic_pulse();
        self.surface.announce(&Announcement::theme_switched(next, self.options.announcement_linger));
        next
    }

    /// Follow an OS preference change unless the user has a stored choice.
    ///
    /// Returns whether the theme was updated.
    pub fn on_system_preference_change(&self, prefers_dark: bool) -> bool {
        if !self.options.respect_system_preference {
            return false;
        }
        match self.store.load(&self.options.storage_key) {
            Ok(Some(_)) => {
                tracing::debug!("stored preference wins over system change");
                return false;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "theme preference unreadable, following system"),
        }
        self.set_theme(Theme::from_prefers_dark(prefers_dark));
        true
    }

    pub fn theme(&self) -> Theme {
        self.current.get()
    }

    pub fn is_dark(&self) -> bool {
        self.current.get().is_dark()
    }

    pub fn is_light(&self) -> bool {
        self.current.get().is_light()
    }

    /// Register an observer for every applied theme.
    pub fn subscribe(&self, observer: impl Fn(&ThemeChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn options(&self) -> &ThemeOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn system(&self) -> &P {
        &self.system
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    fn persist(&self, theme: Theme) {
        if let Err(e) = self.store.save(&self.options.storage_key, theme.as_str()) {
            tracing::warn!(error = %e, %theme, "failed to save theme preference");
        }
    }

    fn notify(&self, change: ThemeChange) {
        // Snapshot so observers can subscribe or toggle from inside the callback.
        let observers: Vec<Observer> = self.observers.borrow().iter().map(|(_, o)| Rc::clone(o)).collect();
        for observer in observers {
            observer(&change);
        }
    }
}
