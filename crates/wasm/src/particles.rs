//! Connected-particle background behind the hero section.
//!
//! A `tech-canvas` is inserted as the hero's first child and sized to it. The
//! field animates only while the hero is on screen; without
//! IntersectionObserver it simply animates all the time.

use crate::app::Effect;
use crate::canvas::CanvasSurface;
use crate::dom::{self, Inserted, Listener};
use crate::error::{require, DomError};
use crate::scheduler;
use js_sys::Array;
use portfolio_fx_core::timing::Debounce;
use portfolio_fx_core::{
    AnimationLoop, CancellationToken, FrameScheduler, FxConfig, ParticleField, Xorshift64,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry,
};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct FieldState {
    field: ParticleField,
    surface: CanvasSurface,
}

pub struct ParticlesEffect {
    canvas: HtmlCanvasElement,
    animation: Rc<AnimationLoop>,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
    timers: CancellationToken,
    _resize: Option<Listener>,
}

impl ParticlesEffect {
    pub fn mount(config: &FxConfig, scheduler: Rc<dyn FrameScheduler>) -> Result<Self, DomError> {
        if !config.enable_particles {
            return Err(DomError::Disabled("particles switched off"));
        }
        if dom::prefers_reduced_motion() {
            return Err(DomError::Disabled("reduced motion"));
        }
        let hero = require(dom::select_html(&config.selectors.hero), &config.selectors.hero)?;
        let document = require(dom::document(), "document")?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| DomError::Js("created element is not a canvas".into()))?;
        canvas.set_class_name("tech-canvas");
        hero.insert_before(&canvas, hero.first_child().as_ref())?;
        let inserted = Inserted::new(canvas.clone());

        let ctx: CanvasRenderingContext2d = require(canvas.get_context("2d")?, "2d context")?
            .dyn_into()
            .map_err(|_| DomError::Js("unexpected 2d context type".into()))?;
        let surface = CanvasSurface::new(canvas.clone(), ctx);
        let (width, height) = hero_size(&hero);
        surface.set_size(width, height);

        let mut rng = Xorshift64::from_unit(js_sys::Math::random());
        let count = config.particle_count(dom::viewport_width());
        let field = ParticleField::new(&config.particles, count, width, height, &mut rng)?;
        log::debug!("particle field: {count} particles on {width}x{height}");

        let state = Rc::new(RefCell::new(FieldState { field, surface }));
        let frame_state = Rc::clone(&state);
        let animation = Rc::new(AnimationLoop::new(scheduler, move || {
            let mut guard = frame_state.borrow_mut();
            let FieldState { field, surface } = &mut *guard;
            field.render_frame(surface);
        }));

        let timers = CancellationToken::new();
        let resize = watch_resize(
            hero.clone(),
            Rc::clone(&state),
            config.timing.resize_debounce_ms,
            &timers,
        );
        let observer = observe_visibility(&hero, Rc::clone(&animation));

        inserted.keep();
        animation.start();
        Ok(Self {
            canvas,
            animation,
            observer,
            timers,
            _resize: resize,
        })
    }
}

impl Effect for ParticlesEffect {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn destroy(self: Box<Self>) {
        self.animation.stop();
        self.timers.cancel();
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
        self.canvas.remove();
    }
}

fn hero_size(hero: &HtmlElement) -> (f64, f64) {
    (hero.offset_width() as f64, hero.offset_height() as f64)
}

fn watch_resize(
    hero: HtmlElement,
    state: Rc<RefCell<FieldState>>,
    debounce_ms: u32,
    timers: &CancellationToken,
) -> Option<Listener> {
    let window = dom::window()?;
    let debounce = Rc::new(RefCell::new(Debounce::new()));
    let timers = timers.clone();
    Listener::passive(&window, "resize", move |_| {
        let generation = debounce.borrow_mut().trigger();
        let debounce = Rc::clone(&debounce);
        let hero = hero.clone();
        let state = Rc::clone(&state);
        scheduler::set_timeout(debounce_ms, &timers, move || {
            if !debounce.borrow_mut().fire(generation) {
                return;
            }
            let (width, height) = hero_size(&hero);
            let mut guard = state.borrow_mut();
            guard.surface.set_size(width, height);
            if let Err(e) = guard.field.resize(width, height) {
                log::warn!("particle field resize skipped: {e}");
            }
        });
    })
}

fn observe_visibility(
    hero: &HtmlElement,
    animation: Rc<AnimationLoop>,
) -> Option<(IntersectionObserver, ObserverCallback)> {
    if !dom::has_global("IntersectionObserver") {
        log::warn!("IntersectionObserver unavailable; particles always animate");
        return None;
    }
    let callback: ObserverCallback = Closure::wrap(Box::new(
        move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    animation.start();
                } else {
                    animation.stop();
                }
            }
        },
    ) as Box<dyn FnMut(Array, IntersectionObserver)>);
    let observer = match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(e) => {
            log::warn!("IntersectionObserver failed: {}", DomError::from(e));
            return None;
        }
    };
    observer.observe(hero);
    Some((observer, callback))
}
