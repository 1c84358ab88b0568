//! Hero section: typed subtitle, title glitch, floating tech labels and
//! button ripples. Ripples run even with reduced motion; the rest do not.

use crate::app::Effect;
use crate::dom::{self, Listener};
use crate::error::{require, DomError};
use crate::scheduler::set_timeout;
use portfolio_fx_core::hero::{layout_icons, ripple_geometry, Glitch, TypeStep, Typewriter};
use portfolio_fx_core::{CancellationToken, FxConfig, Xorshift64};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent};

type Ripples = Rc<RefCell<Vec<HtmlElement>>>;

pub struct HeroEffect {
    timers: CancellationToken,
    typing: Option<(HtmlElement, Rc<RefCell<Typewriter>>)>,
    glitch: Option<(Element, Rc<RefCell<Glitch>>)>,
    icons: Option<HtmlElement>,
    ripples: Ripples,
    _listeners: Vec<Listener>,
}

impl HeroEffect {
    pub fn mount(config: &FxConfig) -> Result<Self, DomError> {
        let selectors = &config.selectors;
        let hero = require(dom::select_html(&selectors.hero), &selectors.hero)?;
        let timers = CancellationToken::new();
        let mut listeners = Vec::new();
        let mut typing = None;
        let mut glitch = None;
        let mut icons = None;
        let ripples: Ripples = Rc::default();

        if dom::prefers_reduced_motion() {
            log::debug!("reduced motion: hero typing, glitch and icons skipped");
        } else {
            match dom::select_html(&selectors.hero_subtitle) {
                Some(subtitle) => typing = Some(start_typing(subtitle, config, &timers)),
                None => log::debug!("{} missing; no typing effect", selectors.hero_subtitle),
            }
            match dom::select(&selectors.hero_title) {
                Some(title) => {
                    let state = Rc::new(RefCell::new(Glitch::new()));
                    listeners.extend(glitch_on_hover(
                        title.clone(),
                        Rc::clone(&state),
                        config.timing.glitch_duration_ms,
                        &timers,
                    ));
                    glitch = Some((title, state));
                }
                None => log::debug!("{} missing; no glitch effect", selectors.hero_title),
            }
            if config.enable_floating_icons {
                icons = mount_icons(&hero, &config.hero.tech_stack);
            }
        }

        for button in dom::select_all(&selectors.buttons) {
            listeners.extend(ripple_on_click(
                button,
                config.timing.ripple_duration_ms,
                &ripples,
                &timers,
            ));
        }

        Ok(Self {
            timers,
            typing,
            glitch,
            icons,
            ripples,
            _listeners: listeners,
        })
    }
}

fn start_typing(
    subtitle: HtmlElement,
    config: &FxConfig,
    timers: &CancellationToken,
) -> (HtmlElement, Rc<RefCell<Typewriter>>) {
    let text = subtitle.text_content().unwrap_or_default();
    subtitle.set_text_content(Some(""));
    dom::set_style(&subtitle, "opacity", "1");
    let writer = Rc::new(RefCell::new(Typewriter::new(&text)));
    let speed = config.timing.typing_speed_ms;
    let token = timers.clone();
    let (el, state) = (subtitle.clone(), Rc::clone(&writer));
    set_timeout(config.timing.typing_start_delay_ms, timers, move || {
        type_next(subtitle, writer, speed, token);
    });
    (el, state)
}

fn type_next(
    subtitle: HtmlElement,
    writer: Rc<RefCell<Typewriter>>,
    speed_ms: u32,
    timers: CancellationToken,
) {
    let step = writer.borrow_mut().tick();
    match step {
        TypeStep::Char(_) => {
            subtitle.set_text_content(Some(&writer.borrow().visible_text()));
            let token = timers.clone();
            set_timeout(speed_ms, &timers, move || {
                type_next(subtitle, writer, speed_ms, token);
            });
        }
        TypeStep::Complete => dom::add_class(&subtitle, "typing-complete"),
        TypeStep::Done => {}
    }
}

fn glitch_on_hover(
    title: Element,
    glitch: Rc<RefCell<Glitch>>,
    duration_ms: u32,
    timers: &CancellationToken,
) -> Option<Listener> {
    let timers = timers.clone();
    let target = title.clone();
    Listener::new(&target, "mouseenter", move |_| {
        let generation = glitch.borrow_mut().trigger();
        dom::add_class(&title, "glitch-active");
        let (glitch, title) = (Rc::clone(&glitch), title.clone());
        set_timeout(duration_ms, &timers, move || {
            if glitch.borrow_mut().expire(generation) {
                dom::remove_class(&title, "glitch-active");
            }
        });
    })
}

fn mount_icons(hero: &HtmlElement, labels: &[String]) -> Option<HtmlElement> {
    let container = dom::create_html("div")?;
    container.set_class_name("floating-icons");
    let mut rng = Xorshift64::from_unit(js_sys::Math::random());
    for icon in layout_icons(labels, &mut rng) {
        let Some(el) = dom::create_html("div") else {
            continue;
        };
        el.set_class_name("tech-icon");
        el.set_text_content(Some(&icon.label));
        dom::set_style(&el, "left", &format!("{}%", icon.left_percent));
        dom::set_style(&el, "animation-delay", &format!("{}s", icon.delay_s));
        dom::set_style(&el, "animation-duration", &format!("{}s", icon.duration_s));
        container.append_child(&el).ok()?;
    }
    hero.append_child(&container).ok()?;
    log::debug!("{} floating icons added", labels.len());
    Some(container)
}

fn ripple_on_click(
    button: Element,
    duration_ms: u32,
    ripples: &Ripples,
    timers: &CancellationToken,
) -> Option<Listener> {
    let timers = timers.clone();
    let ripples = Rc::clone(ripples);
    let target = button.clone();
    Listener::new(&target, "click", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let Some(ripple) = dom::create_html("span") else {
            return;
        };
        let rect = button.get_bounding_client_rect();
        let geometry = ripple_geometry(
            (rect.left(), rect.top(), rect.width(), rect.height()),
            (event.client_x() as f64, event.client_y() as f64),
        );
        dom::add_class(&ripple, "ripple-effect");
        if button.append_child(&ripple).is_err() {
            return;
        }
        let size = dom::px(geometry.size);
        dom::set_style(&ripple, "width", &size);
        dom::set_style(&ripple, "height", &size);
        dom::set_style(&ripple, "left", &dom::px(geometry.left));
        dom::set_style(&ripple, "top", &dom::px(geometry.top));
        ripples.borrow_mut().push(ripple.clone());
        let live = Rc::clone(&ripples);
        set_timeout(duration_ms, &timers, move || {
            ripple.remove();
            live.borrow_mut().retain(|r| !r.is_same_node(Some(ripple.as_ref())));
        });
    })
}

impl Effect for HeroEffect {
    fn name(&self) -> &'static str {
        "hero"
    }

    /// Stops pending timers and puts the hero back as the page served it.
    fn destroy(self: Box<Self>) {
        self.timers.cancel();
        if let Some((subtitle, writer)) = &self.typing {
            if let Some(text) = writer.borrow_mut().finish() {
                subtitle.set_text_content(Some(&text));
            }
        }
        if let Some((title, glitch)) = &self.glitch {
            if glitch.borrow_mut().cancel() {
                dom::remove_class(title, "glitch-active");
            }
        }
        for ripple in self.ripples.borrow_mut().drain(..) {
            ripple.remove();
        }
        if let Some(icons) = &self.icons {
            icons.remove();
        }
    }
}
