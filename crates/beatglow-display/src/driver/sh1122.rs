//! Sino Wealth SH1122 4-bit grayscale OLED controller.

use super::link::Link;
use super::ssd1xxx::{
    SET_CONTRAST, SET_DISPLAY_CLOCK_DIV, SET_DISPLAY_OFF, SET_DISPLAY_OFFSET, SET_DISPLAY_ON,
    SET_HIGH_COLUMN, SET_LOW_COLUMN, SET_MULTIPLEX_RATIO, SET_NORMAL_DISPLAY, SET_PRECHARGE,
    SET_START_LINE, SET_VCOM_DESELECT,
};
use crate::conn::{Conn, SpiMode, SpiSettings, DEFAULT_SPI_SPEED_HZ};
use crate::{Config, Display, Error, Result, Rotation};
use beatglow_pixel::{Gray4Buffer, Surface};
use std::fmt;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 256;
pub const DEFAULT_HEIGHT: usize = 64;

const SET_DISCHARGE_VSL_LEVEL: u8 = 0x30;
const SET_REMAP: u8 = 0xA0;
const SET_DCDC: u8 = 0xAD;
/// Two-byte command; the argument is the first RAM row.
const SET_ROW_ADDRESS: u8 = 0xB0;
const SET_COM_SCAN_INC: u8 = 0xC0;
const SET_VSEGM_LEVEL: u8 = 0xDC;

/// Pixel bytes per data transfer.
const BATCH_SIZE: usize = 4096;

const SPI_SETTINGS: SpiSettings = SpiSettings {
    mode: SpiMode::Mode0,
    max_speed_hz: DEFAULT_SPI_SPEED_HZ,
    args_as_data: false,
};

/// SH1122 driver.
pub struct Sh1122<C> {
    link: Link<C>,
    buf: Gray4Buffer,
    rotation: Rotation,
}

impl<C: Conn> Sh1122<C> {
    /// Initializes the controller and clears the panel.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let display_offset = match (width, height) {
            (128, 32) => 0x0F,
            (128, 64) | (256, 64) => 0x00,
            (128, 128) => 0x02,
            _ => {
                return Err(Error::UnsupportedSize {
                    driver: "SH1122",
                    width,
                    height,
                })
            }
        };

        let mut d = Self {
            link: Link::new(conn, config.debug, SET_DISPLAY_ON, SET_DISPLAY_OFF),
            buf: Gray4Buffer::new(width, height),
            rotation: config.rotation,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.link.commands(&[
            &[SET_DISPLAY_OFF],
            &[SET_START_LINE],
            &[SET_REMAP],
            &[SET_COM_SCAN_INC],
            &[SET_MULTIPLEX_RATIO, (height - 1) as u8],
            &[SET_DCDC, 0x81],
            &[SET_DISPLAY_CLOCK_DIV, 0x50],
            &[SET_DISPLAY_OFFSET, display_offset],
            &[SET_PRECHARGE, 0x21],
            &[SET_VCOM_DESELECT, 0x35],
            &[SET_VSEGM_LEVEL, 0x35],
            &[SET_DISCHARGE_VSL_LEVEL],
            &[SET_NORMAL_DISPLAY],
        ])?;
        d.set_contrast(0x7F)?;
        d.refresh()?;
        d.show(true)?;

        debug!("Initialized {}", d);
        Ok(d)
    }
}

impl<C: Conn> Display for Sh1122<C> {
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
        self.link.commands(&[
            &[SET_LOW_COLUMN],
            &[SET_HIGH_COLUMN],
            &[SET_ROW_ADDRESS, 0x00],
        ])?;
        self.link.data_chunked(self.buf.pix(), BATCH_SIZE)
    }

    fn halt(&mut self) -> Result<()> {
        self.link.halt()
    }

    fn close(&mut self) -> Result<()> {
        self.link.close()
    }
}

impl<C> fmt::Display for Sh1122<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SH1122 OLED {}", self.buf.bounds())
    }
}
