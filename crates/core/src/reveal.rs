//! One-way scroll reveal bookkeeping.
//!
//! Each tracked element is `Pending` until an intersection report says it is
//! in view, then `Revealed` forever. The visible-ratio threshold belongs to
//! the observer that produces the reports, so very tall elements that can
//! never reach it still reveal once they start intersecting. When observation is impossible (no IntersectionObserver) or
//! unwanted (reduced motion), everything is revealed up front.

use std::collections::HashMap;
use std::hash::Hash;

/// Per-element reveal state. `Revealed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// How a page's reveal elements are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// Elements are observed and revealed as they scroll into view.
    Observed,
    /// Elements are revealed immediately; the reason is kept for logging.
    Immediate(ImmediateReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateReason {
    ReducedMotion,
    ObserverUnavailable,
}

impl RevealMode {
    /// Reduced motion wins over observer support.
    pub fn choose(observer_available: bool, prefers_reduced_motion: bool) -> Self {
        if prefers_reduced_motion {
            RevealMode::Immediate(ImmediateReason::ReducedMotion)
        } else if !observer_available {
            RevealMode::Immediate(ImmediateReason::ObserverUnavailable)
        } else {
            RevealMode::Observed
        }
    }
}

/// Tracks reveal state for a set of elements keyed by `K`.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    states: HashMap<K, RevealState>,
}

impl<K: Eq + Hash + Clone> RevealTracker<K> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Starts tracking `key` as pending. Already-tracked keys keep their
    /// state. Returns `true` if the key was new.
    pub fn register(&mut self, key: K) -> bool {
        if self.states.contains_key(&key) {
            return false;
        }
        self.states.insert(key, RevealState::Pending);
        true
    }

    /// Handles one intersection report. Returns `true` exactly once per
    /// element, on its pending-to-revealed transition; the caller should then
    /// apply the revealed styling and stop observing it.
    pub fn on_intersection(&mut self, key: &K, is_intersecting: bool) -> bool {
        if !is_intersecting {
            return false;
        }
        match self.states.get_mut(key) {
            Some(state) if *state == RevealState::Pending => {
                *state = RevealState::Revealed;
                true
            }
            _ => false,
        }
    }

    /// Reveals every pending element and returns the ones that changed.
    pub fn reveal_all(&mut self) -> Vec<K> {
        self.states
            .iter_mut()
            .filter(|(_, s)| **s == RevealState::Pending)
            .map(|(k, s)| {
                *s = RevealState::Revealed;
                k.clone()
            })
            .collect()
    }

    pub fn state(&self, key: &K) -> Option<RevealState> {
        self.states.get(key).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| **s == RevealState::Pending)
            .count()
    }

    pub fn revealed_count(&self) -> usize {
        self.states.len() - self.pending_count()
    }
}

impl<K: Eq + Hash + Clone> Default for RevealTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
