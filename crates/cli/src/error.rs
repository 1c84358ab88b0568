//! Failures of the `portfolio-fx` commands and the exit code each maps to.
//!
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: the field could not be built (bad viewport size)
//! - 11: a file could not be read or written
//! - 12: rejected input: `--config`, `--background`, output extension
//! - 13: JSON output could not be produced

use portfolio_fx_core::FxError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot build particle field: {0}")]
    Field(#[from] FxError),

    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rejected --config: {0}")]
    Config(#[source] FxError),

    #[error("rejected --background: {0}")]
    Background(#[source] FxError),

    #[error("unsupported snapshot format for {} (use .svg or .png)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("cannot rasterize a {width}x{height} frame")]
    RasterSize { width: f64, height: f64 },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::ConfigRead { .. } | CliError::Write { .. } | CliError::Encode { .. } => 11,
            CliError::Config(_)
            | CliError::Background(_)
            | CliError::UnsupportedFormat(_)
            | CliError::RasterSize { .. } => 12,
            CliError::Json(_) => 13,
        }
    }
}
