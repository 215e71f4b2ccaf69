//! Browser bindings for the theme controller.
//!
//! Maps the controller seams onto `localStorage`, `matchMedia`, and the
//! `<html>`/`<body>` elements, and wires the toggle control, the global
//! keyboard shortcut, and system preference changes to the controller.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, MediaQueryList, MediaQueryListEvent};

use super::js_error;
use crate::config::ThemeOptions;
use crate::theme::{
    Announcement, KeyInput, PreferenceStore, StorageError, SystemPreference, ThemeChange, ThemeController, ThemeMarker,
    ThemeSurface, ToggleLabel, Transition,
};

pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const THEME_CHANGE_EVENT: &str = "themeChange";
const HAPTIC_PULSE_MS: u32 = 50;
const SR_ONLY_CSS: &str = "position: absolute; width: 1px; height: 1px; padding: 0; margin: -1px; \
                           overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border: 0;";

pub type BrowserThemeController = ThemeController<LocalStorage, MediaQuery, DocumentSurface>;

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

// =============================================================================
// STORE
// =============================================================================

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(js_error(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(|e| StorageError::Read(js_error(&e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(|e| StorageError::Write(js_error(&e)))
    }
}

// =============================================================================
// SYSTEM PREFERENCE
// =============================================================================

/// `matchMedia("(prefers-color-scheme: dark)")`.
#[derive(Debug, Clone, Default)]
pub struct MediaQuery {
    list: Option<MediaQueryList>,
}

impl MediaQuery {
    pub fn prefers_dark() -> Self {
        let list = web_sys::window().and_then(|w| w.match_media(PREFERS_DARK_QUERY).ok().flatten());
        Self { list }
    }

    pub fn list(&self) -> Option<&MediaQueryList> {
        self.list.as_ref()
    }
}

impl SystemPreference for MediaQuery {
    fn prefers_dark(&self) -> Option<bool> {
        self.list.as_ref().map(MediaQueryList::matches)
    }
}

// =============================================================================
// SURFACE
// =============================================================================

/// The live document: root/body markers, toggle control, live-region announcements.
pub struct DocumentSurface {
    document: Document,
    toggle: RefCell<Option<Element>>,
}

impl DocumentSurface {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document, toggle: RefCell::new(None) })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn toggle_element(&self) -> Option<Element> {
        self.toggle.borrow().clone()
    }

    /// Find the toggle control, or create it in the navigation links (falling back to body).
    pub fn attach_toggle(&self, selector: &str) -> Option<Element> {
        let existing = self.document.query_selector(selector).ok().flatten();
        let element = match existing {
            Some(element) => element,
            None => {
                let element = self.document.create_element("a").ok()?;
                element.set_class_name("nav-link theme-toggle-menu");
                let _ = element.set_attribute("href", "#");
                let _ = element.set_attribute("role", "button");
                let _ = element.set_attribute("aria-label", "Toggle dark mode");
                let _ = element.set_attribute("title", "Toggle dark mode");

                let parent: Option<Element> = self
                    .document
                    .query_selector(".nav-links")
                    .ok()
                    .flatten()
                    .or_else(|| self.document.body().map(Into::into));
                parent?.append_child(&element).ok()?;
                element
            }
        };
        *self.toggle.borrow_mut() = Some(element.clone());
        Some(element)
    }

    fn root_html(&self) -> Option<HtmlElement> {
        self.document.document_element()?.dyn_into::<HtmlElement>().ok()
    }
}

impl ThemeSurface for DocumentSurface {
    fn apply(&self, marker: &ThemeMarker) {
        let enabled = marker.dark_class_enabled();
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(&marker.attribute, marker.theme.as_str());
            let _ = root.class_list().toggle_with_force(&marker.dark_class, enabled);
        }
        if let Some(body) = self.document.body() {
            let _ = body.class_list().toggle_with_force(&marker.dark_class, enabled);
        }
    }

    fn begin_transition(&self, transition: &Transition) {
        let Some(root) = self.root_html() else {
            return;
        };
        let _ = root.style().set_property("transition", &transition.css);
        Timeout::new(millis(transition.duration), move || {
            let _ = root.style().remove_property("transition");
        })
        .forget();
    }

    fn announce(&self, announcement: &Announcement) {
        let Some(body) = self.document.body() else {
            return;
        };
        let Some(node) = self.document.create_element("div").ok().and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let _ = node.set_attribute("aria-live", "polite");
        let _ = node.set_attribute("aria-atomic", "true");
        node.set_class_name("sr-only");
        node.style().set_css_text(SR_ONLY_CSS);
        node.set_text_content(Some(&announcement.text));
        if body.append_child(&node).is_err() {
            return;
        }
        Timeout::new(millis(announcement.linger), move || node.remove()).forget();
    }

    fn update_toggle(&self, label: &ToggleLabel) {
        let Some(toggle) = self.toggle.borrow().clone() else {
            return;
        };
        toggle.set_text_content(Some(&label.render()));
        let _ = toggle.set_attribute("aria-label", label.text);
        let _ = toggle.set_attribute("title", label.text);
    }

    fn haptic_pulse(&self) {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(HAPTIC_PULSE_MS);
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Dispatch `themeChange` on `document` with `{ theme, isDark, isLight }` as detail.
pub fn dispatch_theme_change(document: &Document, change: &ThemeChange) {
    let detail = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&detail, &"theme".into(), &change.theme.as_str().into());
    let _ = js_sys::Reflect::set(&detail, &"isDark".into(), &change.is_dark.into());
    let _ = js_sys::Reflect::set(&detail, &"isLight".into(), &change.is_light.into());

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);
    match web_sys::CustomEvent::new_with_event_init_dict(THEME_CHANGE_EVENT, &init) {
        Ok(event) => {
            let _ = document.dispatch_event(&event);
        }
        Err(e) => tracing::warn!(error = %js_error(&e), "failed to build themeChange event"),
    }
}

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        key: event.key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
    }
}

type Listener = Closure<dyn FnMut(Event)>;

/// Something attached to the page that can be taken off again.
pub(crate) trait Detach {
    fn detach(&self);
    /// Leak the registration so it stays attached for the page lifetime.
    fn leak(self);
}

/// Owns registrations and detaches whatever is still held when dropped.
pub(crate) struct Registrations<R: Detach> {
    items: Vec<R>,
}

impl<R: Detach> Registrations<R> {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub(crate) fn push(&mut self, item: R) {
        self.items.push(item);
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn leak(mut self) {
        for item in std::mem::take(&mut self.items) {
            item.leak();
        }
    }
}

impl<R: Detach> Drop for Registrations<R> {
    fn drop(&mut self) {
        for item in self.items.drain(..) {
            item.detach();
        }
    }
}

struct EventRegistration {
    target: EventTarget,
    kind: &'static str,
    closure: Listener,
}

impl Detach for EventRegistration {
    fn detach(&self) {
        let _ = self.target.remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }

    fn leak(self) {
        self.closure.forget();
    }
}

struct LegacyMediaRegistration {
    list: MediaQueryList,
    closure: Listener,
}

impl Detach for LegacyMediaRegistration {
    fn detach(&self) {
        let _ = self.list.remove_listener_with_opt_callback(Some(self.closure.as_ref().unchecked_ref()));
    }

    fn leak(self) {
        self.closure.forget();
    }
}

enum Registration {
    Event(EventRegistration),
    LegacyMedia(LegacyMediaRegistration),
}

impl Detach for Registration {
    fn detach(&self) {
        match self {
            Self::Event(r) => r.detach(),
            Self::LegacyMedia(r) => r.detach(),
        }
    }

    fn leak(self) {
        match self {
            Self::Event(r) => r.leak(),
            Self::LegacyMedia(r) => r.leak(),
        }
    }
}

/// Event listeners attached for a mounted controller.
///
/// Dropping the bindings detaches every listener, so the page never calls
/// into a freed closure. Use [`ThemeBindings::forget`] to keep them for the
/// page lifetime instead.
pub struct ThemeBindings {
    listeners: Registrations<Registration>,
}

impl ThemeBindings {
    /// Attach click/keydown on the toggle, the global shortcut, and system preference tracking.
    pub fn bind(controller: &Rc<BrowserThemeController>) -> Self {
        let mut bindings = Self { listeners: Registrations::new() };
        let surface = controller.surface();

        if let Some(toggle) = surface.toggle_element() {
            let c = Rc::clone(controller);
            bindings.listen(toggle.clone().into(), "click", move |event| {
                event.prevent_default();
                c.toggle_theme();
            });

            let c = Rc::clone(controller);
            bindings.listen(toggle.into(), "keydown", move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if key_input(key).is_toggle_activation() {
                    event.prevent_default();
                    c.toggle_theme();
                }
            });
        }

        let c = Rc::clone(controller);
        bindings.listen(surface.document().clone().into(), "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if key_input(key).is_global_shortcut() {
                event.prevent_default();
                c.toggle_theme();
            }
        });

        if controller.options().respect_system_preference {
            if let Some(list) = controller.system().list() {
                let c = Rc::clone(controller);
                bindings.listen_media(list, move |event| {
                    if let Some(change) = event.dyn_ref::<MediaQueryListEvent>() {
                        c.on_system_preference_change(change.matches());
                    }
                });
            }
        }

        bindings
    }

    fn listen(&mut self, target: EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) {
        let closure = Listener::new(handler);
        match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Registration::Event(EventRegistration { target, kind, closure })),
            Err(e) => tracing::warn!(kind, error = %js_error(&e), "failed to attach listener"),
        }
    }

    /// `change` on the media query list, falling back to the legacy
    /// `addListener` on engines where `MediaQueryList` is not an `EventTarget`.
    fn listen_media(&mut self, list: &MediaQueryList, handler: impl FnMut(Event) + 'static) {
        let closure = Listener::new(handler);
        let target: &EventTarget = list.as_ref();
        let supports_events = js_sys::Reflect::has(target, &"addEventListener".into()).unwrap_or(false);

        if supports_events {
            match target.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
                Ok(()) => {
                    let registration = EventRegistration { target: target.clone(), kind: "change", closure };
                    self.listeners.push(Registration::Event(registration));
                }
                Err(e) => tracing::warn!(error = %js_error(&e), "failed to attach media listener"),
            }
            return;
        }

        match list.add_listener_with_opt_callback(Some(closure.as_ref().unchecked_ref())) {
            Ok(()) => {
                let registration = LegacyMediaRegistration { list: list.clone(), closure };
                self.listeners.push(Registration::LegacyMedia(registration));
            }
            Err(e) => tracing::warn!(error = %js_error(&e), "failed to attach legacy media listener"),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep the listeners for the lifetime of the page.
    pub fn forget(self) {
        self.listeners.leak();
    }

    /// Detach every listener.
    pub fn unbind(self) {
        drop(self);
    }
}

/// Build the controller against the live document, emit `themeChange` on
/// every transition, apply the initial theme, and bind input listeners.
pub fn mount(options: ThemeOptions) -> Option<(Rc<BrowserThemeController>, ThemeBindings)> {
    let surface = DocumentSurface::new()?;
    if surface.attach_toggle(&options.toggle_selector).is_none() {
        tracing::warn!(selector = %options.toggle_selector, "theme toggle could not be attached");
    }
    let document = surface.document().clone();

    let controller = Rc::new(ThemeController::new(options, LocalStorage, MediaQuery::prefers_dark(), surface));
    controller.subscribe(move |change| dispatch_theme_change(&document, change));
    controller.init();

    let bindings = ThemeBindings::bind(&controller);
    Some((controller, bindings))
}
