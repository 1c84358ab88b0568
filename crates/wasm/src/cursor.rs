//! Custom cursor: a ring and a dot trailing the pointer.

use crate::app::Effect;
use crate::dom::{self, Inserted, Listener};
use crate::error::{require, DomError};
use portfolio_fx_core::cursor::translate_css;
use portfolio_fx_core::{AnimationLoop, CursorFollower, FrameScheduler, FxConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

pub struct CursorEffect {
    ring: HtmlElement,
    dot: HtmlElement,
    body: HtmlElement,
    animation: AnimationLoop,
    _listeners: Vec<Listener>,
}

impl CursorEffect {
    pub fn mount(config: &FxConfig, scheduler: Rc<dyn FrameScheduler>) -> Result<Self, DomError> {
        if !config.enable_custom_cursor {
            return Err(DomError::Disabled("custom cursor switched off"));
        }
        if config.is_mobile(dom::viewport_width()) {
            return Err(DomError::Disabled("mobile viewport"));
        }
        if dom::prefers_reduced_motion() {
            return Err(DomError::Disabled("reduced motion"));
        }
        let document = require(dom::document(), "document")?;
        let body = require(dom::body(), "body")?;

        let ring = require(dom::create_html("div"), "cursor ring")?;
        ring.set_class_name("custom-cursor");
        let dot = require(dom::create_html("div"), "cursor dot")?;
        dot.set_class_name("custom-cursor-dot");
        body.append_child(&ring)?;
        let ring_guard = Inserted::new(ring.clone());
        body.append_child(&dot)?;
        let dot_guard = Inserted::new(dot.clone());

        let follower = Rc::new(RefCell::new(CursorFollower::new(&config.cursor)));
        let mut listeners = Vec::new();

        let elements = [ring.clone(), dot.clone()];

        let (f, els) = (Rc::clone(&follower), elements.clone());
        listeners.extend(Listener::passive(&document, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = (event.client_x() as f64, event.client_y() as f64);
            let now = dom::now_ms();
            with_visibility(&f, &els, |c| {
                c.on_pointer_move(x, y, now);
            });
        }));
        let (f, els) = (Rc::clone(&follower), elements.clone());
        listeners.extend(Listener::passive(&document, "mouseenter", move |_| {
            with_visibility(&f, &els, CursorFollower::on_pointer_enter);
        }));
        let (f, els) = (Rc::clone(&follower), elements);
        listeners.extend(Listener::passive(&document, "mouseleave", move |_| {
            with_visibility(&f, &els, CursorFollower::on_pointer_leave);
        }));

        for el in dom::select_all(&config.selectors.interactive_elements) {
            for (event, hovering) in [("mouseenter", true), ("mouseleave", false)] {
                let follower = Rc::clone(&follower);
                let body = body.clone();
                listeners.extend(Listener::passive(&el, event, move |_| {
                    if follower.borrow_mut().set_hovering(hovering) {
                        dom::set_class(&body, "cursor-hover", hovering);
                    }
                }));
            }
        }

        let frame_follower = Rc::clone(&follower);
        let (frame_ring, frame_dot) = (ring.clone(), dot.clone());
        let animation = AnimationLoop::new(scheduler, move || {
            let frame = frame_follower.borrow_mut().render_frame();
            dom::set_style(&frame_ring, "transform", &translate_css(frame.main));
            dom::set_style(&frame_dot, "transform", &translate_css(frame.dot));
        });
        ring_guard.keep();
        dot_guard.keep();
        dom::set_style(&body, "cursor", "none");
        animation.start();

        log::debug!("custom cursor mounted with {} listeners", listeners.len());
        Ok(Self {
            ring,
            dot,
            body,
            animation,
            _listeners: listeners,
        })
    }
}

impl Effect for CursorEffect {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn destroy(self: Box<Self>) {
        self.animation.stop();
        self.ring.remove();
        self.dot.remove();
        dom::set_style(&self.body, "cursor", "auto");
        dom::remove_class(&self.body, "cursor-hover");
    }
}

/// Applies `update` and syncs element opacity if visibility flipped.
fn with_visibility(
    follower: &RefCell<CursorFollower>,
    elements: &[HtmlElement; 2],
    update: impl FnOnce(&mut CursorFollower),
) {
    let mut f = follower.borrow_mut();
    let was_visible = f.is_visible();
    update(&mut *f);
    if f.is_visible() != was_visible {
        for el in elements {
            dom::set_style(el, "opacity", f.opacity());
        }
    }
}
