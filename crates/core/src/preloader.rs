//! Two-stage preloader dismissal.
//!
//! After the page's `load` event the overlay waits `duration`, fades out
//! (`Hidden`), then after `fade` more is taken out of layout (`Removed`).

use crate::config::TimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloaderPhase {
    Visible,
    Hidden,
    Removed,
}

/// Preloader phase machine. Transitions only move forward.
#[derive(Debug, Clone)]
pub struct Preloader {
    phase: PreloaderPhase,
    hide_delay_ms: u32,
    removal_delay_ms: u32,
}

impl Preloader {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            phase: PreloaderPhase::Visible,
            hide_delay_ms: timing.preloader_duration_ms,
            removal_delay_ms: timing.preloader_fade_ms,
        }
    }

    pub fn phase(&self) -> PreloaderPhase {
        self.phase
    }

    /// Delay between the load event and [`hide`](Self::hide).
    pub fn hide_delay_ms(&self) -> u32 {
        self.hide_delay_ms
    }

    /// Delay between [`hide`](Self::hide) and [`remove`](Self::remove).
    pub fn removal_delay_ms(&self) -> u32 {
        self.removal_delay_ms
    }

    /// `Visible -> Hidden`. Returns `false` if already past it.
    pub fn hide(&mut self) -> bool {
        if self.phase != PreloaderPhase::Visible {
            return false;
        }
        self.phase = PreloaderPhase::Hidden;
        true
    }

    /// `Hidden -> Removed`. Returns `false` unless currently hidden.
    pub fn remove(&mut self) -> bool {
        if self.phase != PreloaderPhase::Hidden {
            return false;
        }
        self.phase = PreloaderPhase::Removed;
        true
    }
}
