//! Sino Wealth SH1106 monochrome OLED controller.
//!
//! The SH1106 has 132 columns of RAM and no horizontal addressing mode, so
//! each page is written separately starting at column 2.

use super::link::Link;
use super::ssd1xxx::*;
use crate::conn::Conn;
use crate::{Config, Display, Error, Result, Rotation};
use beatglow_pixel::{MonoVerticalLsbBuffer, Surface};
use std::fmt;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 128;
pub const DEFAULT_HEIGHT: usize = 64;

/// First visible column in the 132-column RAM.
const COLUMN_OFFSET: u8 = 2;

/// SH1106 driver.
pub struct Sh1106<C> {
    link: Link<C>,
    buf: MonoVerticalLsbBuffer,
    rotation: Rotation,
}

impl<C: Conn> Sh1106<C> {
    /// Initializes the controller and clears the panel.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let (multiplex_ratio, display_offset) = match (width, height) {
            (128, 32) => (0x20, 0x0F),
            (128, 64) => (0x3F, 0x00),
            (128, 128) => (0xFF, 0x02),
            _ => {
                return Err(Error::UnsupportedSize {
                    driver: "SH1106",
                    width,
                    height,
                })
            }
        };

        let mut d = Self {
            link: Link::new(conn, config.debug, SET_DISPLAY_ON, SET_DISPLAY_OFF),
            buf: MonoVerticalLsbBuffer::new(width, height),
            rotation: config.rotation,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.link.commands(&[
            &[SET_DISPLAY_OFF],
            &[SET_MEMORY_MODE],
            &[SET_HIGH_COLUMN],
            &[0x80],
            &[SET_COM_SCAN_DEC],
            &[SET_LOW_COLUMN],
            &[SET_HIGH_COLUMN],
            &[SET_START_LINE],
            &[SET_SEGMENT_REMAP],
            &[SET_NORMAL_DISPLAY],
            &[SET_MULTIPLEX_RATIO, multiplex_ratio],
            &[SET_DISPLAY_ALL_ON_RESUME],
            &[SET_DISPLAY_OFFSET, display_offset],
            &[SET_DISPLAY_CLOCK_DIV, 0xF0],
            &[SET_PRECHARGE, 0x22],
            &[SET_COM_PINS, 0x12],
            &[SET_VCOM_DESELECT, 0x20],
            &[SET_CHARGE_PUMP, 0x14],
        ])?;
        d.set_contrast(0x7F)?;
        d.refresh()?;
        d.show(true)?;

        debug!("Initialized {}", d);
        Ok(d)
    }
}

impl<C: Conn> Display for Sh1106<C> {
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
                &[SET_PAGE_START | (page as u8 & 0x0F)],
                &[SET_LOW_COLUMN | COLUMN_OFFSET],
                &[SET_HIGH_COLUMN],
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

impl<C> fmt::Display for Sh1106<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SH1106 OLED {}", self.buf.bounds())
    }
}
