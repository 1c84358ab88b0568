//! Loading overlay dismissed a fixed time after the page finishes loading.

use crate::app::Effect;
use crate::dom::{self, Listener};
use crate::error::{require, DomError};
use crate::scheduler::set_timeout;
use portfolio_fx_core::preloader::Preloader;
use portfolio_fx_core::{CancellationToken, FxConfig};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlElement;

pub struct PreloaderEffect {
    timers: CancellationToken,
    _load: Option<Listener>,
}

impl PreloaderEffect {
    pub fn mount(config: &FxConfig) -> Result<Self, DomError> {
        let selector = &config.selectors.preloader;
        let overlay = require(dom::select_html(selector), selector)?;
        let window = require(dom::window(), "window")?;
        let document = require(dom::document(), "document")?;

        let state = Rc::new(RefCell::new(Preloader::new(&config.timing)));
        let timers = CancellationToken::new();

        let load = if dom::already_loaded(&document.ready_state()) {
            schedule_hide(overlay, state, &timers);
            None
        } else {
            let token = timers.clone();
            let mut pending = Some((overlay, state));
            Listener::new(&window, "load", move |_| {
                if let Some((overlay, state)) = pending.take() {
                    schedule_hide(overlay, state, &token);
                }
            })
        };

        Ok(Self {
            timers,
            _load: load,
        })
    }
}

fn schedule_hide(overlay: HtmlElement, state: Rc<RefCell<Preloader>>, timers: &CancellationToken) {
    let delay = state.borrow().hide_delay_ms();
    let token = timers.clone();
    set_timeout(delay, timers, move || {
        if !state.borrow_mut().hide() {
            return;
        }
        dom::add_class(&overlay, "hidden");
        log::debug!("preloader hidden");
        let removal = state.borrow().removal_delay_ms();
        set_timeout(removal, &token, move || {
            if state.borrow_mut().remove() {
                dom::set_style(&overlay, "display", "none");
            }
        });
    });
}

impl Effect for PreloaderEffect {
    fn name(&self) -> &'static str {
        "preloader"
    }

    fn destroy(self: Box<Self>) {
        self.timers.cancel();
    }
}
