//! The display contract shared by every driver.

use crate::{Result, Rotation};
use beatglow_pixel::{Color, Model, Rect, Surface};
use std::fmt;

/// A pixel display backed by a chip-specific driver.
///
/// Drawing goes to the driver's in-memory surface; nothing reaches the
/// panel until [`Display::refresh`]. `fmt::Display` gives a human-readable
/// name such as "SSD1306 OLED 128x64".
pub trait Display: fmt::Display {
    /// The surface the driver streams to the panel.
    fn surface(&self) -> &dyn Surface;

    fn surface_mut(&mut self) -> &mut dyn Surface;

    /// Turns the panel on or off without touching its memory.
    fn show(&mut self, on: bool) -> Result<()>;

    fn set_contrast(&mut self, level: u8) -> Result<()>;

    fn rotation(&self) -> Rotation;

    fn set_rotation(&mut self, rotation: Rotation) -> Result<()>;

    /// Sends the whole surface to the panel.
    fn refresh(&mut self) -> Result<()>;

    /// Turns the panel off until the next transfer wakes it.
    fn halt(&mut self) -> Result<()>;

    /// Turns the panel off and closes the connection.
    fn close(&mut self) -> Result<()>;

    fn bounds(&self) -> Rect {
        self.surface().bounds()
    }

    fn color_model(&self) -> Model {
        self.surface().color_model()
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.surface().at(x, y)
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.surface_mut().set(x, y, color)
    }
}
