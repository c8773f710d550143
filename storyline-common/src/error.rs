//! Common error types for Storyline

use thiserror::Error;

/// Common result type for Storyline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the wizard and its support code
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
