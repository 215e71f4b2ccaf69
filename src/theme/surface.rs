//! Rendering seam between the controller and whatever displays the theme.
//!
//! DESIGN
//! ======
//! The controller describes *what* changes (marker, transition, announcement,
//! toggle label). Surfaces own timing: a transition or announcement is
//! cleared by the surface once its duration elapses, so nothing lingers into
//! unrelated later mutations.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::cell::RefCell;
use std::time::Duration;

use super::types::{Theme, ToggleLabel};

/// Theme attribute value and derived class state for the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMarker {
    pub attribute: String,
    pub theme: Theme,
    pub dark_class: String,
}

impl ThemeMarker {
    /// Whether the dark class should be present on root and body.
    pub fn dark_class_enabled(&self) -> bool {
        self.theme.is_dark()
    }
}

/// A CSS transition applied for a fixed duration around a theme change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub css: String,
    pub duration: Duration,
}

/// Screen-reader text inserted into the accessibility tree, removed after `linger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub linger: Duration,
}

impl Announcement {
    pub fn theme_switched(theme: Theme, linger: Duration) -> Self {
        Self { text: format!("Switched to {theme} mode"), linger }
    }
}

/// Displays theme state.
pub trait ThemeSurface {
    /// Set the theme attribute and dark class.
    fn apply(&self, marker: &ThemeMarker);

    /// Start `transition`; the surface clears it after `transition.duration`.
    fn begin_transition(&self, transition: &Transition);

    /// Publish `announcement`; the surface removes it after `announcement.linger`.
    fn announce(&self, announcement: &Announcement);

    fn update_toggle(&self, label: &ToggleLabel);

    /// Short tactile feedback after a user toggle. Most surfaces have none.
    fn haptic_pulse(&self) {}
}

/// Something a [`RecordingSurface`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Applied(ThemeMarker),
    TransitionStarted(Transition),
    Announced(Announcement),
    ToggleUpdated(String),
    HapticPulse,
}

#[derive(Debug, Default)]
struct SurfaceLog {
    events: Vec<SurfaceEvent>,
    marker: Option<ThemeMarker>,
    toggle_text: Option<String>,
    transition: Option<(Transition, Duration)>,
    announcements: Vec<(Announcement, Duration)>,
}

/// Headless surface that records every request and tracks what is currently
/// visible. Time is advanced explicitly with [`RecordingSurface::advance`].
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: RefCell<SurfaceLog>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received, oldest first.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.log.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.log.borrow_mut().events.clear();
    }

    /// Current theme attribute value, if one was ever applied.
    pub fn theme_attribute(&self) -> Option<Theme> {
        self.log.borrow().marker.as_ref().map(|m| m.theme)
    }

    pub fn dark_class_enabled(&self) -> bool {
        self.log.borrow().marker.as_ref().is_some_and(ThemeMarker::dark_class_enabled)
    }

    pub fn toggle_text(&self) -> Option<String> {
        self.log.borrow().toggle_text.clone()
    }

    /// The transition still in effect, if any.
    pub fn active_transition(&self) -> Option<Transition> {
        self.log.borrow().transition.as_ref().map(|(t, _)| t.clone())
    }

    /// Announcements still present in the accessibility tree.
    pub fn live_announcements(&self) -> Vec<String> {
        self.log.borrow().announcements.iter().map(|(a, _)| a.text.clone()).collect()
    }

    /// Let `elapsed` pass, expiring transitions and announcements whose time is up.
    pub fn advance(&self, elapsed: Duration) {
        let mut guard = self.log.borrow_mut();
        let log = &mut *guard;
        let expired = match log.transition.as_mut() {
            Some((_, remaining)) => {
                *remaining = remaining.saturating_sub(elapsed);
                remaining.is_zero()
            }
            None => false,
        };
        if expired {
            log.transition = None;
        }
        for (_, remaining) in &mut log.announcements {
            *remaining = remaining.saturating_sub(elapsed);
        }
        log.announcements.retain(|(_, remaining)| !remaining.is_zero());
    }
}

impl ThemeSurface for RecordingSurface {
    fn apply(&self, marker: &ThemeMarker) {
        let mut log = self.log.borrow_mut();
        log.events.push(SurfaceEvent::Applied(marker.clone()));
        log.marker = Some(marker.clone());
    }

    fn begin_transition(&self, transition: &Transition) {
        let mut log = self.log.borrow_mut();
        log.events.push(SurfaceEvent::TransitionStarted(transition.clone()));
        log.transition = Some((transition.clone(), transition.duration));
    }

    fn announce(&self, announcement: &Announcement) {
        let mut log = self.log.borrow_mut();
        log.events.push(SurfaceEvent::Announced(announcement.clone()));
        log.announcements.push((announcement.clone(), announcement.linger));
    }

    fn update_toggle(&self, label: &ToggleLabel) {
        let mut log = self.log.borrow_mut();
        let text = label.render();
        log.events.push(SurfaceEvent::ToggleUpdated(text.clone()));
        log.toggle_text = Some(text);
    }

    fn haptic_pulse(&self) {
        self.log.borrow_mut().events.push(SurfaceEvent::HapticPulse);
    }
}
