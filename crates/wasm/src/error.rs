//! Why a page effect could not be mounted.

use portfolio_fx_core::FxError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Mount failures. Effects log these and stay unmounted; none reach the page.
#[derive(Debug, Error)]
pub enum DomError {
    /// A required element was not on the page.
    #[error("element not found: {0}")]
    Missing(String),

    /// The effect is switched off by config, viewport or user preference.
    #[error("disabled: {0}")]
    Disabled(&'static str),

    /// A browser API call threw.
    #[error("browser call failed: {0}")]
    Js(String),

    #[error(transparent)]
    Core(#[from] FxError),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl DomError {
    /// Expected absences are logged quietly; real failures as warnings.
    pub fn log(&self, effect: &str) {
        match self {
            DomError::Missing(_) | DomError::Disabled(_) => {
                log::debug!("{effect} not mounted: {self}");
            }
            DomError::Js(_) | DomError::Core(_) => log::warn!("{effect} not mounted: {self}"),
        }
    }
}

/// Converts a lookup result into a [`DomError::Missing`].
pub fn require<T>(value: Option<T>, what: &str) -> Result<T, DomError> {
    value.ok_or_else(|| DomError::Missing(what.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_names_the_missing_element() {
        let err = require::<()>(None, "#hero").unwrap_err();
        assert_eq!(err.to_string(), "element not found: #hero");
        assert!(require(Some(3), "#hero").is_ok());
    }

    #[test]
    fn core_errors_pass_through() {
        let err = DomError::from(FxError::InvalidDimensions {
            width: -1.0,
            height: 2.0,
        });
        assert_eq!(err.to_string(), "invalid dimensions: -1x2");
    }
}
