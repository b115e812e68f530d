//! Command set and frame transfer shared by the ST7735 and ST7789 TFT
//! controllers.

use super::link::Link;
use crate::conn::{Conn, SpiMode, SpiSettings};
use crate::{Error, Result, Rotation};
use beatglow_pixel::{Rgb16Buffer, Surface};

pub const SWRESET: u8 = 0x01;
pub const SLPOUT: u8 = 0x11;
pub const NORON: u8 = 0x13;
pub const INVON: u8 = 0x21;
pub const DISPOFF: u8 = 0x28;
pub const DISPON: u8 = 0x29;
pub const CASET: u8 = 0x2A;
pub const RASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;
pub const MADCTL: u8 = 0x36;
pub const COLMOD: u8 = 0x3A;

/// COLMOD argument for 16 bits per pixel.
pub const COLMOD_RGB565: u8 = 0x05;

// MADCTL bits
const MADCTL_MV: u8 = 1 << 5;
const MADCTL_MX: u8 = 1 << 6;
const MADCTL_MY: u8 = 1 << 7;

/// Pixel bytes per data transfer.
pub const BATCH_SIZE: usize = 4096;

pub const SPI_SETTINGS: SpiSettings = SpiSettings {
    mode: SpiMode::Mode3,
    max_speed_hz: 40_000_000,
    args_as_data: true,
};

pub fn madctl(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::None => 0,
        Rotation::Rotate90 => MADCTL_MX | MADCTL_MV,
        Rotation::Rotate180 => MADCTL_MX | MADCTL_MY,
        Rotation::Rotate270 => MADCTL_MY | MADCTL_MV,
    }
}

/// Big-endian address window argument: start and end, two bytes each.
pub fn window(start: usize, end: usize) -> [u8; 4] {
    let [s0, s1] = (start as u16).to_be_bytes();
    let [e0, e1] = (end as u16).to_be_bytes();
    [s0, s1, e0, e1]
}

/// Rejects sizes larger than the controller RAM in the given rotation.
/// `max_width` x `max_height` is the portrait limit.
pub fn check_size(
    driver: &'static str,
    (width, height): (usize, usize),
    rotation: Rotation,
    (max_width, max_height): (usize, usize),
) -> Result<()> {
    let (max_width, max_height) = if rotation.is_transposed() {
        (max_height, max_width)
    } else {
        (max_width, max_height)
    };
    if width > max_width || height > max_height {
        return Err(Error::UnsupportedSize {
            driver,
            width,
            height,
        });
    }
    Ok(())
}

/// Opens a full-screen window and streams the frame buffer into it.
pub fn write_frame<C: Conn>(link: &mut Link<C>, buf: &Rgb16Buffer) -> Result<()> {
    let bounds = buf.bounds();
    link.command(CASET, &window(0, bounds.width.saturating_sub(1)))?;
    link.command(RASET, &window(0, bounds.height.saturating_sub(1)))?;
    link.command(RAMWR, &[])?;
    link.data_chunked(buf.pix(), BATCH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_madctl() {
        assert_eq!(madctl(Rotation::None), 0x00);
        assert_eq!(madctl(Rotation::Rotate90), 0x60);
        assert_eq!(madctl(Rotation::Rotate180), 0xC0);
        assert_eq!(madctl(Rotation::Rotate270), 0xA0);
    }

    #[test]
    fn test_window() {
        assert_eq!(window(0, 319), [0x00, 0x00, 0x01, 0x3F]);
    }

    #[test]
    fn test_check_size() {
        assert!(check_size("ST7789", (240, 320), Rotation::None, (240, 320)).is_ok());
        assert!(check_size("ST7789", (320, 240), Rotation::Rotate90, (240, 320)).is_ok());
        assert!(matches!(
            check_size("ST7735", (162, 132), Rotation::Rotate180, (132, 162)),
            Err(Error::UnsupportedSize { driver: "ST7735", width: 162, height: 132 })
        ));
    }
}
