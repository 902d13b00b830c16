//! Error types for flicker-io

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Flicker core error: {0}")]
    Core(#[from] flicker_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
