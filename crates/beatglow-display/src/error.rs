//! Error types for the display drivers.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a display.
#[derive(Error, Debug)]
pub enum Error {
    /// Bus I/O error.
    #[error("Bus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The controller does not support the requested panel size.
    #[error("{driver}: unsupported size {width}x{height}")]
    UnsupportedSize {
        driver: &'static str,
        width: usize,
        height: usize,
    },

    /// Invalid rotation value.
    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),

    /// Unknown driver name.
    #[error("Unknown display driver: {0}")]
    UnknownDriver(String),

    /// GPIO line error on the SPI control pins.
    #[cfg(target_os = "linux")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] gpio_cdev::Error),

    /// SPI clock speed outside the supported set.
    #[error("Invalid SPI speed: {0} Hz")]
    InvalidSpiSpeed(u32),

    /// The connection has already been closed.
    #[error("Connection closed")]
    Closed,
}
