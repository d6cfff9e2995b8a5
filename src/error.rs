use std::time::Duration;
use thiserror::Error;

/// Failures of the static HTTP fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP Error {code}: {reason}")]
    Status { code: u16, reason: String },
}

/// Failures of the rendering surface
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("WebDriver session could not be created: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),
    #[error("Timed out after {0:?} while {1}")]
    Timeout(Duration, String),
    #[error("{0}")]
    Other(String),
}

/// Failures loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
