use std::{io, path::PathBuf};
use thiserror::Error;

/// The error type returned by capture operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not launch browser: {0:#}")]
    Launch(anyhow::Error),

    #[error("Page load failed: {0}")]
    Navigation(String),

    #[error("Browser session ended unexpectedly: {0}")]
    Browser(String),

    #[error("Interrupted before a matching request was captured")]
    Interrupted,

    #[error("Could not write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}
