//! Error types for the pixel library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring a pixel buffer.
///
/// Pixel access itself never fails; these only surface while parsing
/// construction parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unknown byte order name.
    #[error("Invalid byte order: {0}")]
    InvalidByteOrder(String),

    /// Unknown channel order name.
    #[error("Invalid channel order: {0}")]
    InvalidChannelOrder(String),

    /// Malformed hex color string.
    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),
}
