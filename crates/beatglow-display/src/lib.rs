//! BeatGlow Display Library
//!
//! Drivers for small OLED, LCD and VFD panels. Each driver owns a packed pixel
//! buffer from `beatglow-pixel` in the controller's native layout and
//! streams it to the panel over a [`Conn`]: I2C, SPI, or an in-memory
//! [`Recorder`].

pub mod config;
pub mod conn;
pub mod display;
pub mod driver;
pub mod error;
pub mod rotation;

pub use config::Config;
pub use conn::{
    Conn, Recorder, SpiMode, SpiSettings, Transfer, DEFAULT_GPIO_CHIP, DEFAULT_I2C_ADDR,
    DEFAULT_SPI_SPEED_HZ, VALID_SPI_SPEEDS,
};
#[cfg(target_os = "linux")]
pub use conn::{I2cConn, SpiConfig, SpiConn};
pub use display::Display;
pub use driver::{Driver, Gp1294, Sh1106, Sh1122, Ssd1305, Ssd1306, Ssd1322, St7735, St7789};
pub use error::{Error, Result};
pub use rotation::Rotation;
