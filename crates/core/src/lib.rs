#![deny(unsafe_code)]
//! Core state and simulation for the portfolio site's visual effects.
//!
//! Everything here is browser-agnostic: the particle field draws through the
//! [`Surface`] trait, animation loops are driven by a [`FrameScheduler`], and
//! timers and pointer events arrive as plain values. The `portfolio-fx-wasm`
//! crate binds these to the DOM; `portfolio-fx-cli` drives them headless.

pub mod animation;
pub mod color;
pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod hero;
pub mod nav;
pub mod particle;
pub mod preloader;
pub mod prng;
pub mod reveal;
pub mod surface;
pub mod timing;

pub use animation::{
    AnimationLoop, CancellationToken, FrameHandle, FrameScheduler, ManualScheduler,
};
pub use color::Rgba;
pub use config::FxConfig;
pub use cursor::CursorFollower;
pub use error::FxError;
pub use field::ParticleField;
pub use particle::Particle;
pub use prng::Xorshift64;
pub use reveal::{RevealMode, RevealTracker};
pub use surface::{DrawCommand, RecordingSurface, Surface};
