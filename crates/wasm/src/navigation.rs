//! Mobile menu, header scroll marker and smooth in-page anchors.

use crate::app::Effect;
use crate::dom::{self, Listener};
use crate::error::{require, DomError};
use portfolio_fx_core::config::NavConfig;
use portfolio_fx_core::nav::{anchor_scroll_top, anchor_selector, HeaderScroll, MenuState};
use portfolio_fx_core::FxConfig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, ScrollBehavior, ScrollToOptions};

/// The elements whose classes mirror [`MenuState`].
#[derive(Clone)]
struct MenuElements {
    toggle: Element,
    links: Option<Element>,
    body: Option<HtmlElement>,
}

impl MenuElements {
    fn apply(&self, menu: &MenuState) {
        let open = menu.is_open();
        dom::set_class(&self.toggle, "active", open);
        if let Some(links) = &self.links {
            dom::set_class(links, "active", open);
        }
        if let Some(body) = &self.body {
            dom::set_class(body, "menu-open", open);
        }
        self.toggle
            .set_attribute("aria-expanded", menu.aria_expanded())
            .ok();
    }
}

pub struct NavigationEffect {
    menu: Rc<RefCell<MenuState>>,
    elements: MenuElements,
    _listeners: Vec<Listener>,
}

impl NavigationEffect {
    pub fn mount(config: &FxConfig) -> Result<Self, DomError> {
        let selectors = &config.selectors;
        let header = require(dom::select(&selectors.header), &selectors.header)?;
        let toggle = require(
            dom::select(&selectors.mobile_menu_toggle),
            &selectors.mobile_menu_toggle,
        )?;
        let document = require(dom::document(), "document")?;
        let window = require(dom::window(), "window")?;

        let elements = MenuElements {
            toggle: toggle.clone(),
            links: dom::select(&selectors.nav_links),
            body: dom::body(),
        };
        if elements.links.is_none() {
            log::warn!("{} missing; menu will toggle without a link list", selectors.nav_links);
        }
        let menu = Rc::new(RefCell::new(MenuState::new()));
        let mut listeners = Vec::new();

        // Toggle button.
        let (m, els) = (Rc::clone(&menu), elements.clone());
        listeners.extend(Listener::new(&toggle, "click", move |_| {
            let mut menu = m.borrow_mut();
            menu.toggle();
            els.apply(&menu);
        }));

        // Any nav link closes the menu.
        for item in dom::select_all(&selectors.nav_link_items) {
            let (m, els) = (Rc::clone(&menu), elements.clone());
            listeners.extend(Listener::new(&item, "click", move |_| {
                let mut menu = m.borrow_mut();
                if menu.close() {
                    els.apply(&menu);
                }
            }));
        }

        // Outside clicks close an open menu.
        let (m, els) = (Rc::clone(&menu), elements.clone());
        listeners.extend(Listener::new(&document, "click", move |event| {
            let target = event.target();
            let inside_links = els
                .links
                .as_ref()
                .is_some_and(|links| dom::contains(links, target.as_ref()));
            let inside_toggle = dom::contains(&els.toggle, target.as_ref());
            let mut menu = m.borrow_mut();
            if menu.should_close_on_click(inside_links, inside_toggle) {
                menu.close();
                els.apply(&menu);
            }
        }));

        let anchors = dom::select_all(&selectors.anchors);
        for anchor in &anchors {
            let nav = config.nav.clone();
            let anchor_el = anchor.clone();
            listeners.extend(Listener::new(anchor, "click", move |event| {
                event.prevent_default();
                if let Some(href) = anchor_el.get_attribute("href") {
                    scroll_to_anchor(&href, &nav);
                }
            }));
        }

        let header_scroll = RefCell::new(HeaderScroll::new(
            &config.nav,
            config.timing.scroll_throttle_ms,
        ));
        listeners.extend(Listener::passive(&window, "scroll", move |_| {
            if let Some(scrolled) = header_scroll
                .borrow_mut()
                .on_scroll(dom::scroll_y(), dom::now_ms())
            {
                dom::set_class(&header, "scrolled", scrolled);
            }
        }));

        log::debug!("navigation mounted with {} anchors", anchors.len());
        Ok(Self {
            menu,
            elements,
            _listeners: listeners,
        })
    }
}

fn scroll_to_anchor(href: &str, nav: &NavConfig) {
    let Some(selector) = anchor_selector(href) else {
        return;
    };
    let Some(target) = dom::select(selector).and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        log::debug!("anchor target {selector} not found");
        return;
    };
    let Some(window) = dom::window() else {
        return;
    };
    let options = ScrollToOptions::new();
    options.set_top(anchor_scroll_top(target.offset_top() as f64, nav));
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

impl Effect for NavigationEffect {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn destroy(self: Box<Self>) {
        let mut menu = self.menu.borrow_mut();
        if menu.close() {
            self.elements.apply(&menu);
        }
    }
}
