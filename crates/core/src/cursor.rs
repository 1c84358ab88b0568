//! Custom cursor follower state.
//!
//! Two points trail the pointer with exponential smoothing: the main ring
//! with a small lag factor (slow, smooth) and the dot with a larger one
//! (snappier). Pointer samples are throttled on the leading edge. The
//! follower never exactly reaches its target; the gap shrinks by `1 - lag`
//! each frame.

use crate::config::CursorConfig;
use crate::timing::Throttle;
use glam::DVec2;

/// A coordinate pair that eases toward a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPoint {
    position: DVec2,
    lag: f64,
}

impl SmoothedPoint {
    pub fn new(position: DVec2, lag: f64) -> Self {
        Self { position, lag }
    }

    /// Moves `lag` of the remaining way toward `target` and returns the new
    /// position.
    pub fn advance(&mut self, target: DVec2) -> DVec2 {
        self.position += (target - self.position) * self.lag;
        self.position
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }
}

/// Positions to apply to the two cursor elements for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFrame {
    pub main: DVec2,
    pub dot: DVec2,
}

/// CSS `transform` value placing an element at `p`.
pub fn translate_css(p: DVec2) -> String {
    format!("translate({}px, {}px)", p.x, p.y)
}

/// Pointer-following state for the custom cursor.
#[derive(Debug, Clone)]
pub struct CursorFollower {
    target: DVec2,
    main: SmoothedPoint,
    dot: SmoothedPoint,
    throttle: Throttle,
    visible: bool,
    hovering: bool,
}

impl CursorFollower {
    /// Starts at the origin, visible, not hovering.
    pub fn new(config: &CursorConfig) -> Self {
        Self {
            target: DVec2::ZERO,
            main: SmoothedPoint::new(DVec2::ZERO, config.lag_factor),
            dot: SmoothedPoint::new(DVec2::ZERO, config.dot_lag_factor),
            throttle: Throttle::new(config.update_throttle_ms),
            visible: true,
            hovering: false,
        }
    }

    /// Records a pointer sample. Any move shows the cursor; the target only
    /// changes if the throttle accepts the sample. Returns whether it did.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        self.visible = true;
        if !self.throttle.try_accept(now_ms) {
            return false;
        }
        self.target = DVec2::new(x, y);
        true
    }

    pub fn on_pointer_enter(&mut self) {
        self.visible = true;
    }

    pub fn on_pointer_leave(&mut self) {
        self.visible = false;
    }

    /// Sets the hover flag; returns `true` if it changed.
    pub fn set_hovering(&mut self, hovering: bool) -> bool {
        let changed = self.hovering != hovering;
        self.hovering = hovering;
        changed
    }

    /// Advances both trailing points one frame toward the target.
    pub fn render_frame(&mut self) -> CursorFrame {
        CursorFrame {
            main: self.main.advance(self.target),
            dot: self.dot.advance(self.target),
        }
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }

    pub fn main(&self) -> DVec2 {
        self.main.position()
    }

    pub fn dot(&self) -> DVec2 {
        self.dot.position()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// CSS opacity for both elements.
    pub fn opacity(&self) -> &'static str {
        if self.visible {
            "1"
        } else {
            "0"
        }
    }
}
