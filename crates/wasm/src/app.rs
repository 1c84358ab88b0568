//! Composition root: mounts every page effect once and tears them down
//! together.

use crate::cursor::CursorEffect;
use crate::dom::{self, Listener};
use crate::error::DomError;
use crate::hero::HeroEffect;
use crate::navigation::NavigationEffect;
use crate::particles::ParticlesEffect;
use crate::preloader::PreloaderEffect;
use crate::reveal::RevealEffect;
use crate::logger;
use crate::scheduler::{set_timeout, BrowserScheduler};
use portfolio_fx_core::timing::LoadTimings;
use portfolio_fx_core::{CancellationToken, FrameScheduler, FxConfig};
use std::rc::Rc;
use wasm_bindgen::JsValue;

/// A mounted page effect.
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Removes listeners, timers and any elements the effect created.
    fn destroy(self: Box<Self>);
}

/// Owns every mounted effect. Effects mount independently; one that cannot
/// mount is logged and skipped.
pub struct PortfolioApp {
    config: FxConfig,
    effects: Vec<Box<dyn Effect>>,
    timers: CancellationToken,
    _global: Vec<Listener>,
}

impl PortfolioApp {
    pub fn boot(config: FxConfig) -> Self {
        let mut effects: Vec<Box<dyn Effect>> = Vec::new();
        let mut mount = |name: &str, result: Result<Box<dyn Effect>, DomError>| match result {
            Ok(effect) => {
                log::debug!("{name} mounted");
                effects.push(effect);
            }
            Err(e) => e.log(name),
        };

        mount("preloader", boxed(PreloaderEffect::mount(&config)));
        mount("navigation", boxed(NavigationEffect::mount(&config)));
        match BrowserScheduler::new() {
            Some(scheduler) => {
                let scheduler: Rc<dyn FrameScheduler> = Rc::new(scheduler);
                mount("cursor", boxed(CursorEffect::mount(&config, Rc::clone(&scheduler))));
                mount("particles", boxed(ParticlesEffect::mount(&config, scheduler)));
            }
            None => log::warn!("no window; animated effects skipped"),
        }
        mount("reveal", boxed(RevealEffect::mount(&config)));
        mount("hero", boxed(HeroEffect::mount(&config)));

        let timers = CancellationToken::new();
        let mut global: Vec<Listener> = prevent_double_tap_zoom(config.breakpoints.mobile)
            .into_iter()
            .collect();
        if logger::level_for_host(dom::hostname().as_deref()) == log::Level::Debug {
            global.extend(log_load_timings(&timers));
        }
        log::info!("portfolio effects booted: {}", names(&effects).join(", "));
        Self {
            config,
            effects,
            timers,
            _global: global,
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    pub fn effect_names(&self) -> Vec<&'static str> {
        names(&self.effects)
    }

    /// Destroys effects in reverse mount order.
    pub fn destroy(self) {
        self.timers.cancel();
        let count = self.effects.len();
        for effect in self.effects.into_iter().rev() {
            log::debug!("destroying {}", effect.name());
            effect.destroy();
        }
        log::info!("portfolio effects destroyed ({count})");
    }
}

fn boxed<E: Effect + 'static>(result: Result<E, DomError>) -> Result<Box<dyn Effect>, DomError> {
    result.map(|e| Box::new(e) as Box<dyn Effect>)
}

fn names(effects: &[Box<dyn Effect>]) -> Vec<&'static str> {
    effects.iter().map(|e| e.name()).collect()
}

/// Blocks double-tap zoom on narrow viewports.
fn prevent_double_tap_zoom(max_width: f64) -> Option<Listener> {
    let document = dom::document()?;
    Listener::new(&document, "dblclick", move |event| {
        if dom::viewport_width() <= max_width {
            event.prevent_default();
        }
    })
}

/// Logs page-load timings on a dev host, once the load handlers are done.
fn log_load_timings(timers: &CancellationToken) -> Option<Listener> {
    let loaded = dom::document().is_some_and(|d| dom::already_loaded(&d.ready_state()));
    if loaded {
        set_timeout(0, timers, report_load_timings);
        return None;
    }
    let window = dom::window()?;
    let timers = timers.clone();
    Listener::new(&window, "load", move |_| {
        // loadEventEnd is only written after every load handler returns.
        set_timeout(0, &timers, report_load_timings);
    })
}

fn report_load_timings() {
    match navigation_timings() {
        Some(timings) => log::debug!("page load: {timings}"),
        None => log::debug!("navigation timing unavailable"),
    }
}

fn navigation_timings() -> Option<LoadTimings> {
    let entry = dom::window()?
        .performance()?
        .get_entries_by_type("navigation")
        .get(0);
    let mark = |name: &str| {
        js_sys::Reflect::get(&entry, &JsValue::from_str(name))
            .ok()?
            .as_f64()
    };
    LoadTimings::from_marks(
        (
            mark("domContentLoadedEventStart")?,
            mark("domContentLoadedEventEnd")?,
        ),
        (mark("loadEventStart")?, mark("loadEventEnd")?),
    )
}
