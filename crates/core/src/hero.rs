//! Hero section effects: typewriter subtitle, hover glitch, floating tech
//! icons and button ripples.

use crate::prng::Xorshift64;
use serde::Serialize;

/// Outcome of one typewriter tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStep {
    /// Append this character; schedule another tick.
    Char(char),
    /// All characters shown; mark the element complete. Returned once.
    Complete,
    /// Nothing left to do.
    Done,
}

/// Reveals a string one character per tick.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    index: usize,
    completed: bool,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            completed: false,
        }
    }

    pub fn tick(&mut self) -> TypeStep {
        if let Some(&c) = self.chars.get(self.index) {
            self.index += 1;
            return TypeStep::Char(c);
        }
        if self.completed {
            return TypeStep::Done;
        }
        self.completed = true;
        TypeStep::Complete
    }

    /// The portion typed so far.
    pub fn visible_text(&self) -> String {
        self.chars[..self.index].iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Jumps to the end. Returns the full text if any of it was still
    /// untyped, so an interrupted subtitle can be restored.
    pub fn finish(&mut self) -> Option<String> {
        let interrupted = self.index < self.chars.len();
        self.index = self.chars.len();
        self.completed = true;
        interrupted.then(|| self.chars.iter().collect())
    }
}

/// Transient glitch class. Each trigger supersedes earlier ones, so the
/// class is removed only by the timer armed for the latest trigger.
#[derive(Debug, Clone, Default)]
pub struct Glitch {
    generation: u64,
    active: bool,
}

impl Glitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the glitch and returns the generation to expire later.
    pub fn trigger(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.active = true;
        self.generation
    }

    /// Deactivates if `generation` is the latest trigger. Returns `true` if
    /// the class should be removed now.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.active {
            return false;
        }
        self.active = false;
        true
    }

    /// Deactivates now and makes every pending expiry stale. Returns `true`
    /// if the class was on.
    pub fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        std::mem::take(&mut self.active)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Placement and timing of one floating tech label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingIcon {
    pub label: String,
    /// Horizontal position in percent of the hero width, in [10, 90).
    pub left_percent: f64,
    pub delay_s: f64,
    /// Animation duration in seconds, in [15, 25).
    pub duration_s: f64,
}

/// Lays out one icon per label with staggered delays.
pub fn layout_icons(labels: &[String], rng: &mut Xorshift64) -> Vec<FloatingIcon> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| FloatingIcon {
            label: label.clone(),
            left_percent: rng.next_range(10.0, 90.0),
            delay_s: i as f64 * 0.5,
            duration_s: rng.next_range(15.0, 25.0),
        })
        .collect()
}

/// Size and offset of a ripple span inside its button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

/// Square ripple covering the button, centered on the click.
///
/// `rect` is the button's client rect as `(left, top, width, height)`;
/// `client` is the click position in viewport coordinates.
pub fn ripple_geometry(rect: (f64, f64, f64, f64), client: (f64, f64)) -> Ripple {
    let (left, top, width, height) = rect;
    let size = width.max(height);
    Ripple {
        size,
        left: client.0 - left - size / 2.0,
        top: client.1 - top - size / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- typewriter --

    #[test]
    fn types_each_char_then_completes_once() {
        let mut t = Typewriter::new("Hi!");
        assert_eq!(t.tick(), TypeStep::Char('H'));
        assert_eq!(t.visible_text(), "H");
        assert_eq!(t.tick(), TypeStep::Char('i'));
        assert_eq!(t.tick(), TypeStep::Char('!'));
        assert!(!t.is_complete());
        assert_eq!(t.tick(), TypeStep::Complete);
        assert!(t.is_complete());
        assert_eq!(t.tick(), TypeStep::Done);
        assert_eq!(t.visible_text(), "Hi!");
    }

    #[test]
    fn empty_text_completes_immediately() {
        let mut t = Typewriter::new("");
        assert!(t.is_empty());
        assert_eq!(t.tick(), TypeStep::Complete);
    }

    #[test]
    fn multibyte_chars_are_typed_whole() {
        let mut t = Typewriter::new("Olá");
        t.tick();
        t.tick();
        assert_eq!(t.tick(), TypeStep::Char('á'));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn finish_mid_typing_returns_full_text() {
        let mut t = Typewriter::new("Rust dev");
        t.tick();
        t.tick();
        assert_eq!(t.finish().as_deref(), Some("Rust dev"));
        assert_eq!(t.visible_text(), "Rust dev");
        assert!(t.is_complete());
        assert_eq!(t.tick(), TypeStep::Done);
    }

    #[test]
    fn finish_after_typing_has_nothing_to_restore() {
        let mut t = Typewriter::new("ok");
        while t.tick() != TypeStep::Done {}
        assert_eq!(t.finish(), None);
    }

    // -- glitch --

    #[test]
    fn glitch_expires_with_its_generation() {
        let mut g = Glitch::new();
        let generation = g.trigger();
        assert!(g.is_active());
        assert!(g.expire(generation));
        assert!(!g.is_active());
        assert!(!g.expire(generation));
    }

    #[test]
    fn stale_expiry_is_ignored_after_retrigger() {
        let mut g = Glitch::new();
        let first = g.trigger();
        let second = g.trigger();
        assert!(!g.expire(first));
        assert!(g.is_active());
        assert!(g.expire(second));
    }

    #[test]
    fn cancel_clears_active_glitch_and_stales_its_timer() {
        let mut g = Glitch::new();
        let generation = g.trigger();
        assert!(g.cancel());
        assert!(!g.is_active());
        assert!(!g.expire(generation));
        assert!(!g.cancel());
    }

    // -- icons --

    #[test]
    fn icons_are_staggered_and_in_range() {
        let labels: Vec<String> = ["Java", "JS", "AWS"].iter().map(|s| s.to_string()).collect();
        let icons = layout_icons(&labels, &mut Xorshift64::new(5));
        assert_eq!(icons.len(), 3);
        for (i, icon) in icons.iter().enumerate() {
            assert_eq!(icon.label, labels[i]);
            assert_eq!(icon.delay_s, i as f64 * 0.5);
            assert!((10.0..90.0).contains(&icon.left_percent));
            assert!((15.0..25.0).contains(&icon.duration_s));
        }
    }

    // -- ripple --

    #[test]
    fn ripple_centers_on_click() {
        let r = ripple_geometry((100.0, 50.0, 120.0, 40.0), (160.0, 70.0));
        assert_eq!(r.size, 120.0);
        assert_eq!(r.left, 0.0);
        assert_eq!(r.top, -40.0);
    }
}
