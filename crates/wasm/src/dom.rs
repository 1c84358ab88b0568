//! Thin, non-panicking wrappers over `web_sys` DOM access.
//!
//! Every lookup returns `Option`/`Vec` so a page missing some element simply
//! leaves the dependent effect unmounted.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, Window,
};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

/// First element matching `selector`. Invalid selectors count as no match.
pub fn select(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

pub fn select_html(selector: &str) -> Option<HtmlElement> {
    select(selector)?.dyn_into().ok()
}

/// Every element matching `selector`, in document order.
pub fn select_all(selector: &str) -> Vec<Element> {
    let Some(doc) = document() else {
        return Vec::new();
    };
    let list = match doc.query_selector_all(selector) {
        Ok(list) => list,
        Err(_) => {
            log::warn!("invalid selector {selector:?}");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn create_html(tag: &str) -> Option<HtmlElement> {
    document()?.create_element(tag).ok()?.dyn_into().ok()
}

pub fn media_matches(query: &str) -> bool {
    window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .is_some_and(|m| m.matches())
}

pub fn prefers_reduced_motion() -> bool {
    media_matches("(prefers-reduced-motion: reduce)")
}

pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// Milliseconds on the page's monotonic clock.
pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn hostname() -> Option<String> {
    window()?.location().hostname().ok()
}

pub fn has_global(name: &str) -> bool {
    window().is_some_and(|w| js_sys::Reflect::has(&w, &JsValue::from_str(name)).unwrap_or(false))
}

pub fn add_class(el: &Element, class: &str) {
    if el.class_list().add_1(class).is_err() {
        log::warn!("could not add class {class:?}");
    }
}

pub fn remove_class(el: &Element, class: &str) {
    if el.class_list().remove_1(class).is_err() {
        log::warn!("could not remove class {class:?}");
    }
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if el.class_list().toggle_with_force(class, on).is_err() {
        log::warn!("could not toggle class {class:?}");
    }
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if el.style().set_property(property, value).is_err() {
        log::warn!("could not set style {property}: {value}");
    }
}

/// Whether `target` is `container` or one of its descendants.
pub fn contains(container: &Element, target: Option<&EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_ref::<web_sys::Node>())
        .is_some_and(|node| container.contains(Some(node)))
}

/// An event listener that is removed again when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Like [`new`](Self::new) but registered `passive`, for scroll-rate
    /// events that never cancel.
    pub fn passive(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .ok()?;
        Some(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            .ok();
    }
}

/// Something that can take itself out of the document.
pub trait Detach {
    fn detach(&self);
}

impl Detach for HtmlElement {
    fn detach(&self) {
        self.remove();
    }
}

impl Detach for web_sys::HtmlCanvasElement {
    fn detach(&self) {
        self.remove();
    }
}

/// Detaches an inserted node when dropped unless [`keep`](Self::keep) was
/// called. Held across a mount so an early `?` leaves no orphaned nodes.
pub struct Inserted<T: Detach>(Option<T>);

impl<T: Detach> Inserted<T> {
    pub fn new(node: T) -> Self {
        Self(Some(node))
    }

    /// The mount succeeded; the node stays.
    pub fn keep(mut self) {
        self.0 = None;
    }
}

impl<T: Detach> Drop for Inserted<T> {
    fn drop(&mut self) {
        if let Some(node) = self.0.take() {
            node.detach();
        }
    }
}

/// Whether `document.readyState` says the `load` event has already fired.
pub fn already_loaded(ready_state: &str) -> bool {
    ready_state == "complete"
}

/// Formats a CSS pixel length.
pub fn px(value: f64) -> String {
    format!("{value}px")
}
