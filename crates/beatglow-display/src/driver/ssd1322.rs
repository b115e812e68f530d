//! Solomon Systech SSD1322 4-bit grayscale OLED controller.
//!
//! The controller has 480x128 pixels of display RAM addressed in columns of
//! four pixels. Panels narrower than 480 pixels are centred in it.

use super::link::Link;
use crate::conn::{Conn, SpiMode, SpiSettings};
use crate::{Config, Display, Error, Result, Rotation};
use beatglow_pixel::{Gray4Buffer, Surface};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 256;
pub const DEFAULT_HEIGHT: usize = 64;

const SUPPORTED_WIDTHS: [usize; 3] = [256, 128, 64];
const SUPPORTED_HEIGHTS: [usize; 3] = [64, 48, 32];

const SPI_SETTINGS: SpiSettings = SpiSettings {
    mode: SpiMode::Mode3,
    max_speed_hz: 2_500_000,
    args_as_data: true,
};

const RAM_WIDTH: usize = 480;
const RAM_HEIGHT: usize = 128;

const SET_COLUMN_ADDRESS: u8 = 0x15;
const WRITE_RAM: u8 = 0x5C;
const SET_ROW_ADDRESS: u8 = 0x75;
const SET_REMAP: u8 = 0xA0;
const SET_DISPLAY_START_LINE: u8 = 0xA1;
const SET_DISPLAY_OFFSET: u8 = 0xA2;
const SET_NORMAL_DISPLAY: u8 = 0xA6;
const EXIT_PARTIAL_DISPLAY: u8 = 0xA9;
const SET_FUNCTION: u8 = 0xAB;
const SET_DISPLAY_OFF: u8 = 0xAE;
const SET_DISPLAY_ON: u8 = 0xAF;
const SET_PHASE_LENGTH: u8 = 0xB1;
const SET_FRONT_CLOCK_DIV: u8 = 0xB3;
const SET_DISPLAY_ENHANCEMENT_A: u8 = 0xB4;
const SET_GPIO: u8 = 0xB5;
const SET_SECOND_PRECHARGE: u8 = 0xB6;
const SET_DEFAULT_GRAYSCALE: u8 = 0xB9;
const SET_PRECHARGE_VOLTAGE: u8 = 0xBB;
const SET_VCOMH_VOLTAGE: u8 = 0xBE;
const SET_CONTRAST: u8 = 0xC1;
const SET_MASTER_CURRENT: u8 = 0xC7;
const SET_MULTIPLEX_RATIO: u8 = 0xCA;
const SET_DISPLAY_ENHANCEMENT_B: u8 = 0xD1;
const SET_COMMAND_LOCK: u8 = 0xFD;

/// SSD1322 driver.
pub struct Ssd1322<C> {
    link: Link<C>,
    buf: Gray4Buffer,
    rotation: Rotation,
}

impl<C: Conn> Ssd1322<C> {
    /// Resets and initializes the controller, then clears the panel.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        if !SUPPORTED_WIDTHS.contains(&width) || !SUPPORTED_HEIGHTS.contains(&height) {
            return Err(Error::UnsupportedSize {
                driver: "SSD1322",
                width,
                height,
            });
        }

        let mut d = Self {
            link: Link::new(conn, config.debug, SET_DISPLAY_ON, SET_DISPLAY_OFF),
            buf: Gray4Buffer::new(width, height),
            rotation: config.rotation,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.link.reset_pulse(&[
            (false, Duration::from_millis(150)),
            (true, Duration::from_millis(250)),
        ])?;

        d.link.commands(&[
            &[SET_COMMAND_LOCK, 0x12],
            &[SET_DISPLAY_OFF],
            &[SET_FRONT_CLOCK_DIV, 0x91],
            &[SET_MULTIPLEX_RATIO, (height - 1) as u8],
            &[SET_DISPLAY_OFFSET, 0x00],
            &[SET_DISPLAY_START_LINE, 0x00],
            &[SET_REMAP, 0x14, 0x11],
            &[SET_GPIO, 0x00],
            &[SET_FUNCTION, 0x01],
            &[SET_DISPLAY_ENHANCEMENT_A, 0xA0, 0xFD],
            &[SET_CONTRAST, 0x7F],
            &[SET_MASTER_CURRENT, 0x0F],
            &[SET_DEFAULT_GRAYSCALE],
            &[SET_PHASE_LENGTH, 0xE2],
            &[SET_DISPLAY_ENHANCEMENT_B, 0x82, 0x20],
            &[SET_PRECHARGE_VOLTAGE, 0x1F],
            &[SET_SECOND_PRECHARGE, 0x08],
            &[SET_VCOMH_VOLTAGE, 0x07],
            &[SET_NORMAL_DISPLAY],
            &[EXIT_PARTIAL_DISPLAY],
        ])?;
        thread::sleep(Duration::from_millis(2));

        d.clear_ram()?;
        d.set_contrast(0xFF)?;
        d.refresh()?;
        d.show(true)?;

        debug!("Initialized {}", d);
        Ok(d)
    }

    /// Zeroes the whole display RAM, including the columns outside the panel.
    fn clear_ram(&mut self) -> Result<()> {
        self.link.commands(&[
            &[SET_COLUMN_ADDRESS, 0x00, (RAM_WIDTH / 4 - 1) as u8],
            &[SET_ROW_ADDRESS, 0x00, (RAM_HEIGHT - 1) as u8],
            &[WRITE_RAM],
        ])?;
        let blank = [0u8; RAM_WIDTH / 4];
        for _ in 0..RAM_HEIGHT {
            self.link.data(&blank)?;
        }
        Ok(())
    }

    fn set_window(&mut self, x: usize, y: usize, width: usize, height: usize) -> Result<()> {
        let x0 = ((RAM_WIDTH - self.buf.bounds().width) / 8 + x / 4) as u8;
        let x1 = x0 + (width / 4) as u8 - 1;
        let y0 = y as u8;
        let y1 = y0 + height as u8 - 1;
        self.link.commands(&[
            &[SET_ROW_ADDRESS, y0, y1],
            &[SET_COLUMN_ADDRESS, x0, x1],
        ])
    }
}

impl<C: Conn> Display for Ssd1322<C> {
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
        let bounds = self.buf.bounds();
        self.set_window(0, 0, bounds.width, bounds.height)?;
        self.link.command(WRITE_RAM, &[])?;
        self.link.data(self.buf.pix())
    }

    fn halt(&mut self) -> Result<()> {
        self.link.halt()
    }

    fn close(&mut self) -> Result<()> {
        self.link.close()
    }
}

impl<C> fmt::Display for Ssd1322<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSD1322 OLED {}", self.buf.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::{Recorder, Transfer};
    use beatglow_pixel::{Color, Gray4, Model};

    #[test]
    fn test_init_sequence() {
        let rec = Recorder::new();
        let d = Ssd1322::new(rec.clone(), &Config::default()).unwrap();
        assert_eq!(d.to_string(), "SSD1322 OLED 256x64");
        assert_eq!(d.color_model(), Model::Gray4);

        let transfers = rec.transfers();
        assert_eq!(transfers[0], Transfer::Reset(false));
        assert_eq!(transfers[1], Transfer::Reset(true));
        assert_eq!(transfers[2], Transfer::Command(SET_COMMAND_LOCK, vec![0x12]));
        assert!(transfers.contains(&Transfer::Command(SET_MULTIPLEX_RATIO, vec![0x3F])));
        assert!(transfers.contains(&Transfer::Command(SET_CONTRAST, vec![0xFF])));
        assert_eq!(transfers.last(), Some(&Transfer::Command(SET_DISPLAY_ON, vec![])));
        assert_eq!(rec.spi_settings(), Some(SPI_SETTINGS));

        // RAM clear plus one full frame
        assert_eq!(rec.data_len(), 120 * 128 + 256 * 64 / 2);
    }

    #[test]
    fn test_refresh_window() {
        let rec = Recorder::new();
        let mut d = Ssd1322::new(rec.clone(), &Config::new(128, 32)).unwrap();
        d.set(0, 0, Color::from(Gray4::new(0x0F)));
        rec.take();

        d.refresh().unwrap();
        let transfers = rec.take();
        assert_eq!(
            &transfers[..3],
            &[
                Transfer::Command(SET_ROW_ADDRESS, vec![0, 31]),
                Transfer::Command(SET_COLUMN_ADDRESS, vec![44, 75]),
                Transfer::Command(WRITE_RAM, vec![]),
            ]
        );
        match &transfers[3] {
            Transfer::Data(bytes) => {
                assert_eq!(bytes.len(), 64 * 32);
                assert_eq!(bytes[0], 0xF0);
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_size() {
        assert!(matches!(
            Ssd1322::new(Recorder::new(), &Config::new(256, 128)),
            Err(Error::UnsupportedSize { driver: "SSD1322", width: 256, height: 128 })
        ));
    }
}
