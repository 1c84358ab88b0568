//! Scroll reveal: elements gain `revealed` the first time they scroll into
//! view, then are no longer observed.

use crate::app::Effect;
use crate::dom;
use crate::error::DomError;
use js_sys::Array;
use portfolio_fx_core::reveal::ImmediateReason;
use portfolio_fx_core::{FxConfig, RevealMode, RevealTracker};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub struct RevealEffect {
    observer: Option<(IntersectionObserver, ObserverCallback)>,
}

impl RevealEffect {
    pub fn mount(config: &FxConfig) -> Result<Self, DomError> {
        let elements = dom::select_all(&config.selectors.reveal_elements);
        if elements.is_empty() {
            return Err(DomError::Missing(config.selectors.reveal_elements.clone()));
        }
        let mut tracker = RevealTracker::new();
        (0..elements.len()).for_each(|i| {
            tracker.register(i);
        });

        let mode = RevealMode::choose(
            dom::has_global("IntersectionObserver"),
            dom::prefers_reduced_motion(),
        );
        let observer = match mode {
            RevealMode::Observed => match observe(config, elements.clone(), tracker) {
                Ok(observer) => Some(observer),
                Err(e) => {
                    log::warn!("reveal observer failed, showing all: {e}");
                    reveal_immediately(&elements);
                    None
                }
            },
            RevealMode::Immediate(reason) => {
                if reason == ImmediateReason::ObserverUnavailable {
                    log::warn!("IntersectionObserver unavailable; revealing everything");
                }
                for i in tracker.reveal_all() {
                    reveal_now(&elements[i]);
                }
                None
            }
        };
        log::debug!("scroll reveal mounted for {} elements ({mode:?})", elements.len());
        Ok(Self { observer })
    }
}

fn observe(
    config: &FxConfig,
    elements: Vec<Element>,
    tracker: RevealTracker<usize>,
) -> Result<(IntersectionObserver, ObserverCallback), DomError> {
    let targets = elements.clone();
    let tracker = Rc::new(RefCell::new(tracker));
    let callback: ObserverCallback = Closure::wrap(Box::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(index) = targets.iter().position(|el| el.is_same_node(Some(&*target)))
                else {
                    continue;
                };
                let revealed = tracker
                    .borrow_mut()
                    .on_intersection(&index, entry.is_intersecting());
                if revealed {
                    dom::add_class(&target, "revealed");
                    observer.unobserve(&target);
                }
            }
        },
    ) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal.threshold));
    options.set_root_margin(&config.reveal.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    for el in &elements {
        dom::add_class(el, "reveal");
        observer.observe(el);
    }
    Ok((observer, callback))
}

fn reveal_immediately(elements: &[Element]) {
    elements.iter().for_each(reveal_now);
}

fn reveal_now(el: &Element) {
    dom::add_class(el, "revealed");
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        dom::set_style(el, "opacity", "1");
        dom::set_style(el, "transform", "translateY(0)");
    }
}

impl Effect for RevealEffect {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn destroy(self: Box<Self>) {
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
    }
}
