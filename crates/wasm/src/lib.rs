#![deny(unsafe_code)]
//! Browser bindings for the portfolio-fx page effects.
//!
//! The module start hook installs the console logger and panic hook. The page
//! then creates one [`App`] once the DOM is ready and keeps it alive:
//!
//! ```js
//! import init, { App } from "./pkg/portfolio_fx_wasm.js";
//! await init();
//! const app = new App();          // or new App('{"enable_particles": false}')
//! addEventListener("pagehide", () => app.destroy());
//! ```

mod app;
mod canvas;
mod cursor;
mod dom;
mod error;
mod hero;
mod logger;
mod navigation;
mod particles;
mod preloader;
mod reveal;
mod scheduler;

use app::PortfolioApp;
use portfolio_fx_core::FxConfig;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (module re-instantiated on the same page) keeps the first logger.
    console_log::init_with_level(logger::level_for_host(dom::hostname().as_deref())).ok();
}

/// Handle to the mounted page effects.
#[wasm_bindgen]
pub struct App {
    inner: Option<PortfolioApp>,
}

#[wasm_bindgen]
impl App {
    /// Mounts every effect. `config_json` is an optional partial override of
    /// the defaults; an invalid override is logged and the defaults are used.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> App {
        let config = match config_json.as_deref().map(FxConfig::from_json_str) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("ignoring config override: {e}");
                FxConfig::default()
            }
            None => FxConfig::default(),
        };
        App {
            inner: Some(PortfolioApp::boot(config)),
        }
    }

    /// Names of the effects that mounted.
    #[wasm_bindgen(js_name = effects)]
    pub fn effects(&self) -> Vec<String> {
        self.inner
            .as_ref()
            .map(|app| app.effect_names().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// The effective configuration as JSON.
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsError> {
        let config = self
            .inner
            .as_ref()
            .map(PortfolioApp::config)
            .ok_or_else(|| JsError::new("app destroyed"))?;
        serde_json::to_string(config).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Tears down every effect. Further calls do nothing.
    pub fn destroy(&mut self) {
        if let Some(app) = self.inner.take() {
            app.destroy();
        }
    }
}
