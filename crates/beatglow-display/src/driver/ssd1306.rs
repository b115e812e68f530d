//! Solomon Systech SSD1306 monochrome OLED controller.

use super::link::Link;
use super::ssd1xxx::*;
use crate::conn::Conn;
use crate::{Config, Display, Error, Result, Rotation};
use beatglow_pixel::{MonoVerticalLsbBuffer, Surface};
use std::fmt;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 128;
pub const DEFAULT_HEIGHT: usize = 64;

/// Per-size panel wiring.
struct Geometry {
    width: usize,
    height: usize,
    clock_div: u8,
    com_pins: u8,
    col_start: u8,
}

const GEOMETRIES: [Geometry; 5] = [
    Geometry { width: 64, height: 32, clock_div: 0x80, com_pins: 0x12, col_start: 32 },
    Geometry { width: 64, height: 48, clock_div: 0x80, com_pins: 0x12, col_start: 32 },
    Geometry { width: 96, height: 16, clock_div: 0x60, com_pins: 0x02, col_start: 0 },
    Geometry { width: 128, height: 32, clock_div: 0x80, com_pins: 0x02, col_start: 0 },
    Geometry { width: 128, height: 64, clock_div: 0x80, com_pins: 0x12, col_start: 0 },
];

/// SSD1306 driver.
pub struct Ssd1306<C> {
    link: Link<C>,
    buf: MonoVerticalLsbBuffer,
    rotation: Rotation,
    col_start: u8,
    col_end: u8,
}

impl<C: Conn> Ssd1306<C> {
    /// Initializes the controller and clears the panel.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let geometry = GEOMETRIES
            .iter()
            .find(|g| g.width == width && g.height == height)
            .ok_or(Error::UnsupportedSize {
                driver: "SSD1306",
                width,
                height,
            })?;

        let mut d = Self {
            link: Link::new(conn, config.debug, SET_DISPLAY_ON, SET_DISPLAY_OFF),
            buf: MonoVerticalLsbBuffer::new(width, height),
            rotation: config.rotation,
            col_start: geometry.col_start,
            col_end: geometry.col_start + width as u8,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.link.commands(&[
            &[SET_DISPLAY_OFF],
            &[SET_DISPLAY_CLOCK_DIV, geometry.clock_div],
            &[SET_MULTIPLEX_RATIO, (height - 1) as u8],
            &[SET_DISPLAY_OFFSET, 0x00],
            &[SET_START_LINE],
            &[SET_CHARGE_PUMP, 0x14],
            &[SET_MEMORY_MODE, 0x00],
            &[SET_SEGMENT_REMAP],
            &[SET_COM_SCAN_DEC],
            &[SET_COM_PINS, geometry.com_pins],
            &[SET_PRECHARGE, 0xF1],
            &[SET_VCOM_DESELECT, 0x40],
            &[SET_DISPLAY_ALL_ON_RESUME],
            &[SET_NORMAL_DISPLAY],
        ])?;
        d.set_contrast(0xCF)?;
        d.refresh()?;
        d.show(true)?;

        debug!("Initialized {}", d);
        Ok(d)
    }
}

impl<C: Conn> Display for Ssd1306<C> {
    fn surface(&self) -> &dyn Surface {
        &self.buf
    }

    fn surface_mut(&mut self) -> &mut dyn Surface {
        &mut self.buf
    }

    fn show(&mut self, on: bool) -> Result<()> {
        self.link.show(on)
    }

    fn set_contrast(&mut self, level: u8) -> Result<()> {
        self.link.command(SET_CONTRAST, &[level])
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<()> {
        self.rotation = rotation;
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        for page in 0..self.buf.bands() {
            self.link.commands(&[
                &[SET_COLUMN_ADDR, self.col_start, self.col_end - 1],
                &[SET_START_LINE],
                &[SET_PAGE_ADDR, page as u8, page as u8],
            ])?;
            self.link.data(self.buf.band(page))?;
        }
        Ok(())
    }

    fn halt(&mut self) -> Result<()> {
        self.link.halt()
    }

    fn close(&mut self) -> Result<()> {
        self.link.close()
    }
}

impl<C> fmt::Display for Ssd1306<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSD1306 OLED {}", self.buf.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::{Recorder, Transfer};
    use beatglow_pixel::{Color, Mono};

    #[test]
    fn test_default_size() {
        let rec = Recorder::new();
        let d = Ssd1306::new(rec.clone(), &Config::default()).unwrap();
        assert_eq!(d.to_string(), "SSD1306 OLED 128x64");
        assert_eq!(d.bounds().width, 128);

        let transfers = rec.transfers();
        assert_eq!(transfers[0], Transfer::Command(SET_DISPLAY_OFF, vec![]));
        assert_eq!(transfers[2], Transfer::Command(SET_MULTIPLEX_RATIO, vec![63]));
        assert!(transfers.contains(&Transfer::Command(SET_COM_PINS, vec![0x12])));
        assert!(transfers.contains(&Transfer::Command(SET_CONTRAST, vec![0xCF])));
        assert_eq!(transfers.last(), Some(&Transfer::Command(SET_DISPLAY_ON, vec![])));
        assert_eq!(rec.data_len(), 128 * 8);
        assert_eq!(rec.spi_settings(), Some(SPI_SETTINGS));
    }

    #[test]
    fn test_unsupported_size() {
        let err = Ssd1306::new(Recorder::new(), &Config::new(100, 50)).err().unwrap();
        assert!(matches!(
            err,
            Error::UnsupportedSize { driver: "SSD1306", width: 100, height: 50 }
        ));
    }

    #[test]
    fn test_refresh_pages_with_column_window() {
        let rec = Recorder::new();
        let mut d = Ssd1306::new(rec.clone(), &Config::new(64, 32)).unwrap();
        d.set(0, 9, Color::Mono(Mono::ON));
        rec.take();

        d.refresh().unwrap();
        let transfers = rec.take();
        assert_eq!(transfers.len(), 4 * 4);
        assert_eq!(transfers[0], Transfer::Command(SET_COLUMN_ADDR, vec![32, 95]));
        assert_eq!(transfers[6], Transfer::Command(SET_PAGE_ADDR, vec![1, 1]));
        match &transfers[7] {
            Transfer::Data(bytes) => {
                assert_eq!(bytes.len(), 64);
                assert_eq!(bytes[0], 0x02);
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn test_halt_and_wake() {
        let rec = Recorder::new();
        let mut d = Ssd1306::new(rec.clone(), &Config::new(128, 32)).unwrap();
        rec.take();
        d.halt().unwrap();
        d.set_contrast(0x10).unwrap();
        assert_eq!(
            rec.take(),
            vec![
                Transfer::Command(SET_DISPLAY_OFF, vec![]),
                Transfer::Command(SET_DISPLAY_ON, vec![]),
                Transfer::Command(SET_CONTRAST, vec![0x10]),
            ]
        );
    }

    #[test]
    fn test_close() {
        let rec = Recorder::new();
        let mut d = Ssd1306::new(rec.clone(), &Config::new(96, 16)).unwrap();
        d.close().unwrap();
        assert!(rec.is_closed());
        assert!(d.refresh().is_err());
    }
}
