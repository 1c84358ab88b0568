//! Site-wide effect configuration.
//!
//! [`FxConfig::default`] holds the values the portfolio ships with. Every
//! module receives the config (or its own section of it) at construction; no
//! module reads a global. Partial JSON overrides are accepted via
//! [`FxConfig::from_json`]: omitted keys keep their defaults.

use crate::color::Rgba;
use crate::error::FxError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level configuration for every page effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    pub enable_particles: bool,
    pub enable_custom_cursor: bool,
    pub enable_floating_icons: bool,
    pub particles: ParticleConfig,
    pub cursor: CursorConfig,
    pub reveal: RevealConfig,
    pub timing: TimingConfig,
    pub nav: NavConfig,
    pub breakpoints: Breakpoints,
    pub selectors: Selectors,
    pub hero: HeroConfig,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            enable_particles: true,
            enable_custom_cursor: true,
            enable_floating_icons: true,
            particles: ParticleConfig::default(),
            cursor: CursorConfig::default(),
            reveal: RevealConfig::default(),
            timing: TimingConfig::default(),
            nav: NavConfig::default(),
            breakpoints: Breakpoints::default(),
            selectors: Selectors::default(),
            hero: HeroConfig::default(),
        }
    }
}

impl FxConfig {
    /// Builds a config from a (possibly partial) JSON object and validates it.
    pub fn from_json(value: &Value) -> Result<Self, FxError> {
        if !value.is_object() {
            return Err(FxError::InvalidConfig("expected a JSON object".into()));
        }
        let config: FxConfig = serde_json::from_value(value.clone())
            .map_err(|e| FxError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON override string.
    pub fn from_json_str(s: &str) -> Result<Self, FxError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| FxError::InvalidConfig(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Checks the numeric ranges the simulation relies on.
    pub fn validate(&self) -> Result<(), FxError> {
        let p = &self.particles;
        if !(p.min_radius.is_finite() && p.max_radius.is_finite()) || p.min_radius > p.max_radius {
            return Err(FxError::InvalidRange {
                name: "particles.radius".into(),
                min: p.min_radius,
                max: p.max_radius,
            });
        }
        if !(p.connection_distance.is_finite() && p.connection_distance > 0.0) {
            return Err(FxError::InvalidConfig(format!(
                "particles.connection_distance must be positive, got {}",
                p.connection_distance
            )));
        }
        if !(p.speed.is_finite() && p.speed >= 0.0) {
            return Err(FxError::InvalidConfig(format!(
                "particles.speed must be non-negative, got {}",
                p.speed
            )));
        }
        for (name, lag) in [
            ("cursor.lag_factor", self.cursor.lag_factor),
            ("cursor.dot_lag_factor", self.cursor.dot_lag_factor),
        ] {
            if !(lag > 0.0 && lag <= 1.0) {
                return Err(FxError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {lag}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(FxError::InvalidConfig(format!(
                "reveal.threshold must be in [0, 1], got {}",
                self.reveal.threshold
            )));
        }
        Ok(())
    }

    /// Mobile layout check used by the cursor and particle count.
    pub fn is_mobile(&self, viewport_width: f64) -> bool {
        viewport_width <= self.breakpoints.tablet
    }

    /// Particle count for a viewport of the given width.
    pub fn particle_count(&self, viewport_width: f64) -> usize {
        if self.is_mobile(viewport_width) {
            self.particles.count_mobile
        } else {
            self.particles.count_desktop
        }
    }
}

/// Hero background particle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count_desktop: usize,
    pub count_mobile: usize,
    /// Pairs closer than this (in pixels) are joined by a line.
    pub connection_distance: f64,
    /// Full width of the velocity range; components lie in `[-speed/2, speed/2)`.
    pub speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub color: Rgba,
    /// RGB of connection lines; alpha is computed per pair.
    pub line_color: Rgba,
    /// Line alpha at zero distance.
    pub line_opacity: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count_desktop: 50,
            count_mobile: 30,
            connection_distance: 120.0,
            speed: 0.5,
            min_radius: 1.0,
            max_radius: 2.0,
            color: Rgba::new(51, 153, 204, 0.6),
            line_color: Rgba::new(51, 153, 204, 1.0),
            line_opacity: 0.2,
        }
    }
}

/// Custom cursor smoothing and sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub lag_factor: f64,
    pub dot_lag_factor: f64,
    pub size: f64,
    pub dot_size: f64,
    pub hover_size: f64,
    pub update_throttle_ms: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            lag_factor: 0.2,
            dot_lag_factor: 0.6,
            size: 20.0,
            dot_size: 5.0,
            hover_size: 40.0,
            update_throttle_ms: 16.0,
        }
    }
}

/// Scroll reveal observer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            root_margin: "0px 0px -50px 0px".into(),
        }
    }
}

/// Timer durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub preloader_duration_ms: u32,
    pub preloader_fade_ms: u32,
    pub typing_speed_ms: u32,
    pub typing_start_delay_ms: u32,
    pub glitch_duration_ms: u32,
    pub ripple_duration_ms: u32,
    pub scroll_throttle_ms: f64,
    pub resize_debounce_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            preloader_duration_ms: 2000,
            preloader_fade_ms: 500,
            typing_speed_ms: 50,
            typing_start_delay_ms: 600,
            glitch_duration_ms: 600,
            ripple_duration_ms: 600,
            scroll_throttle_ms: 100.0,
            resize_debounce_ms: 100,
        }
    }
}

/// Header and anchor scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// `scrollY` above which the header is marked `scrolled`.
    pub scroll_threshold_px: f64,
    /// Fixed header height subtracted from anchor targets.
    pub anchor_offset_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scroll_threshold_px: 50.0,
            anchor_offset_px: 80.0,
        }
    }
}

/// Viewport width breakpoints in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: f64,
    pub tablet: f64,
    pub desktop: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 768.0,
            tablet: 1024.0,
            desktop: 1440.0,
        }
    }
}

/// CSS selectors for the page elements each module binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub preloader: String,
    pub header: String,
    pub mobile_menu_toggle: String,
    pub nav_links: String,
    pub nav_link_items: String,
    pub anchors: String,
    pub hero: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub reveal_elements: String,
    pub buttons: String,
    pub interactive_elements: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            preloader: ".preloader".into(),
            header: "#main-header".into(),
            mobile_menu_toggle: ".mobile-menu-toggle".into(),
            nav_links: ".nav-links".into(),
            nav_link_items: ".nav-links a".into(),
            anchors: "a[href^=\"#\"]".into(),
            hero: "#hero".into(),
            hero_title: ".hero-text h1".into(),
            hero_subtitle: ".hero-text h2".into(),
            reveal_elements: ".about-text, .project-card, .section-title".into(),
            buttons: ".btn".into(),
            interactive_elements:
                "a:not(.highlight), button, .btn, .project-card, input, textarea, select".into(),
        }
    }
}

/// Hero decoration content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub tech_stack: Vec<String>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            tech_stack: ["Java", "JS", "AWS", "SQL", "Git", "React", "Node", "Docker"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_shipped_constants() {
        let c = FxConfig::default();
        assert_eq!(c.particles.count_desktop, 50);
        assert_eq!(c.particles.count_mobile, 30);
        assert_eq!(c.particles.connection_distance, 120.0);
        assert_eq!(c.cursor.update_throttle_ms, 16.0);
        assert_eq!(c.timing.preloader_duration_ms, 2000);
        assert_eq!(c.reveal.root_margin, "0px 0px -50px 0px");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(FxConfig::from_json(&json!({})).unwrap(), FxConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let c = FxConfig::from_json(&json!({
            "enable_particles": false,
            "particles": { "count_desktop": 80 }
        }))
        .unwrap();
        assert!(!c.enable_particles);
        assert_eq!(c.particles.count_desktop, 80);
        assert_eq!(c.particles.count_mobile, 30);
        assert!(c.enable_custom_cursor);
    }

    #[test]
    fn color_override_parses_css() {
        let c = FxConfig::from_json(&json!({
            "particles": { "color": "rgba(255, 0, 0, 0.5)" }
        }))
        .unwrap();
        assert_eq!(c.particles.color, Rgba::new(255, 0, 0, 0.5));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(FxConfig::from_json(&json!([1, 2])).is_err());
        assert!(FxConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = FxConfig::from_json(&json!({ "particles": { "speed": "fast" } }));
        assert!(matches!(err, Err(FxError::InvalidConfig(_))));
    }

    #[test]
    fn reversed_radius_range_is_rejected() {
        let err = FxConfig::from_json(&json!({
            "particles": { "min_radius": 3.0, "max_radius": 1.0 }
        }));
        assert!(matches!(err, Err(FxError::InvalidRange { .. })));
    }

    #[test]
    fn lag_factor_out_of_range_is_rejected() {
        assert!(FxConfig::from_json(&json!({ "cursor": { "lag_factor": 0.0 } })).is_err());
        assert!(FxConfig::from_json(&json!({ "cursor": { "dot_lag_factor": 1.5 } })).is_err());
    }

    #[test]
    fn zero_connection_distance_is_rejected() {
        assert!(
            FxConfig::from_json(&json!({ "particles": { "connection_distance": 0.0 } })).is_err()
        );
    }

    #[test]
    fn particle_count_follows_breakpoint() {
        let c = FxConfig::default();
        assert_eq!(c.particle_count(1024.0), 30);
        assert_eq!(c.particle_count(1025.0), 50);
        assert!(c.is_mobile(375.0));
    }

    #[test]
    fn serializes_round_trip() {
        let c = FxConfig::default();
        let s = serde_json::to_string(&c).unwrap();
        assert_eq!(FxConfig::from_json_str(&s).unwrap(), c);
    }
}
