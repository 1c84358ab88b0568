//! Error types for the portfolio-fx core.

use thiserror::Error;

/// Errors produced by core construction and parsing.
///
/// None of these are surfaced to page visitors: browser modules log them and
/// stay inert.
#[derive(Debug, Error)]
pub enum FxError {
    /// A drawing surface or field was given a non-finite or negative extent.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// A min/max range had its bounds reversed or was not finite.
    #[error("invalid range for '{name}': min {min} > max {max}")]
    InvalidRange { name: String, min: f64, max: f64 },

    /// A CSS color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Configuration JSON could not be parsed or had the wrong shape.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
