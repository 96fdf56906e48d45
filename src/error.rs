//! Error types for Helmsman

use thiserror::Error;

/// Helmsman error type
#[derive(Error, Debug)]
pub enum HelmsmanError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hardware fault surfaced by a device driver. The mock rig never
    /// fails, so only real drivers behind the hardware traits construct
    /// this variant.
    #[error("Hardware error: {0}")]
    Hardware(String),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for HelmsmanError {
    fn from(e: toml::de::Error) -> Self {
        HelmsmanError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HelmsmanError>;
