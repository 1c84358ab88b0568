//! Rate limiting for high-frequency DOM events.
//!
//! Both helpers take timestamps from the caller (`performance.now()` in the
//! browser) instead of reading a clock, so they behave the same under test.

/// Leading-edge throttle: the first event after a quiet period is accepted
/// immediately, later events inside the window are dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_accepted: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    /// Returns `true` and records `now_ms` if at least the interval has
    /// elapsed since the last accepted event.
    pub fn try_accept(&mut self, now_ms: f64) -> bool {
        match self.last_accepted {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_accepted = Some(now_ms);
                true
            }
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}

/// Trailing-edge debounce keyed by generation.
///
/// Each [`trigger`](Debounce::trigger) supersedes the previous one. The host
/// arms a timer per trigger and calls [`fire`](Debounce::fire) with the
/// generation it was given; only the latest generation fires, and only once.
#[derive(Debug, Clone, Default)]
pub struct Debounce {
    generation: u64,
    fired: bool,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an event and returns the generation to fire later.
    pub fn trigger(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.fired = false;
        self.generation
    }

    /// Returns `true` if `generation` is still the latest unfired trigger.
    pub fn fire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.fired {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Page-load durations read from a navigation timing entry, in ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadTimings {
    pub dom_content_loaded_ms: f64,
    pub load_event_ms: f64,
    /// From navigation start to the end of the `load` handlers.
    pub total_ms: f64,
}

impl LoadTimings {
    /// Builds timings from the entry's event marks. `None` while the load
    /// event has not finished, since the entry reports zeros until then.
    pub fn from_marks(
        dom_content_loaded: (f64, f64),
        load_event: (f64, f64),
    ) -> Option<Self> {
        let (_, load_end) = load_event;
        if !(load_end.is_finite() && load_end > 0.0) {
            return None;
        }
        Some(Self {
            dom_content_loaded_ms: dom_content_loaded.1 - dom_content_loaded.0,
            load_event_ms: load_event.1 - load_event.0,
            total_ms: load_end,
        })
    }
}

impl std::fmt::Display for LoadTimings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DOMContentLoaded {:.1} ms, load {:.1} ms, total {:.1} ms",
            self.dom_content_loaded_ms, self.load_event_ms, self.total_ms
        )
    }
}
