//! Navigation state: mobile menu toggle, header scroll marker, anchor offsets.

use crate::config::NavConfig;
use crate::timing::Throttle;

/// Open/closed state of the mobile menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the menu and returns the new open state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Closes the menu; returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value for the toggle's `aria-expanded` attribute.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    /// A document click closes an open menu unless it landed inside the
    /// link list or on the toggle itself.
    pub fn should_close_on_click(&self, inside_links: bool, inside_toggle: bool) -> bool {
        self.open && !inside_links && !inside_toggle
    }
}

/// Tracks whether the header should carry the `scrolled` class.
#[derive(Debug, Clone)]
pub struct HeaderScroll {
    threshold: f64,
    throttle: Throttle,
    scrolled: bool,
}

impl HeaderScroll {
    pub fn new(config: &NavConfig, throttle_ms: f64) -> Self {
        Self {
            threshold: config.scroll_threshold_px,
            throttle: Throttle::new(throttle_ms),
            scrolled: false,
        }
    }

    /// Handles a scroll event. Returns the class state to apply when the
    /// throttle lets the event through, `None` otherwise.
    pub fn on_scroll(&mut self, scroll_y: f64, now_ms: f64) -> Option<bool> {
        if !self.throttle.try_accept(now_ms) {
            return None;
        }
        self.scrolled = scroll_y > self.threshold;
        Some(self.scrolled)
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}

/// Element id selector for an in-page anchor `href`, if it names one.
///
/// A bare `#` links to the top of the page and has no target element.
pub fn anchor_selector(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(id) if !id.is_empty() => Some(href),
        _ => None,
    }
}

/// Scroll position that puts an element at `offset_top` just below the
/// fixed header.
pub fn anchor_scroll_top(offset_top: f64, config: &NavConfig) -> f64 {
    offset_top - config.anchor_offset_px
}
