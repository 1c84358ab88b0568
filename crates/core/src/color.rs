//! CSS color values used by the particle renderer.
//!
//! Colors round-trip through the same strings a 2D canvas accepts for
//! `fillStyle`/`strokeStyle`: `#rrggbb`, `rgb(r, g, b)` and
//! `rgba(r, g, b, a)`.

use crate::error::FxError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 8-bit RGB color with a floating-point alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Creates a color, clamping alpha to [0, 1].
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a: 0.0 }.with_alpha(a)
    }

    /// Same RGB with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) },
            ..self
        }
    }

    /// Parses `#rrggbb`, `rgb(...)` or `rgba(...)`.
    pub fn parse(input: &str) -> Result<Self, FxError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| FxError::InvalidColor(input.to_owned()));
        }
        let (body, expect_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(FxError::InvalidColor(input.to_owned()));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| FxError::InvalidColor(input.to_owned()))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if expect_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(FxError::InvalidColor(input.to_owned()));
        }
        let channel = |p: &str| {
            p.parse::<u8>()
                .map_err(|e| FxError::InvalidColor(format!("{input}: {e}")))
        };
        let a = if expect_alpha {
            let a: f64 = parts[3]
                .parse()
                .map_err(|e| FxError::InvalidColor(format!("{input}: {e}")))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(FxError::InvalidColor(format!("{input}: alpha out of range")));
            }
            a
        } else {
            1.0
        };
        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }

    /// CSS `rgba(...)` string suitable for canvas styles.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba::new(r, g, b, 1.0))
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}
