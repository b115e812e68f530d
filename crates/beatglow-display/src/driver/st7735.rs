//! Sitronix ST7735 16-bit color TFT controller.

use super::link::Link;
use super::st77xx::*;
use crate::conn::Conn;
use crate::{Config, Display, Result, Rotation};
use beatglow_pixel::{ByteOrder, Rgb16Buffer, Surface};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 128;
pub const DEFAULT_HEIGHT: usize = 160;

/// Controller RAM in the native (portrait) orientation.
const MAX_SIZE: (usize, usize) = (132, 162);

const FRMCTR1: u8 = 0xB1;
const FRMCTR2: u8 = 0xB2;
const FRMCTR3: u8 = 0xB3;
const INVCTR: u8 = 0xB4;
const PWCTR1: u8 = 0xC0;
const PWCTR2: u8 = 0xC1;
const PWCTR3: u8 = 0xC2;
const PWCTR4: u8 = 0xC3;
const PWCTR5: u8 = 0xC4;
const VMCTR1: u8 = 0xC5;
const GMCTRP1: u8 = 0xE0;
const GMCTRN1: u8 = 0xE1;

/// ST7735 driver.
pub struct St7735<C> {
    link: Link<C>,
    buf: Rgb16Buffer,
    rotation: Rotation,
}

impl<C: Conn> St7735<C> {
    /// Resets and initializes the controller.
    ///
    /// The default size follows the rotation: 128x160 upright, 160x128
    /// when turned a quarter.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = if config.rotation.is_transposed() {
            config.size_or(DEFAULT_HEIGHT, DEFAULT_WIDTH)
        } else {
            config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        };
        check_size("ST7735", (width, height), config.rotation, MAX_SIZE)?;

        let mut d = Self {
            link: Link::new(conn, config.debug, DISPON, DISPOFF),
            buf: Rgb16Buffer::new(width, height, ByteOrder::BigEndian),
            rotation: config.rotation,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.link.reset_pulse(&[
            (true, Duration::from_millis(100)),
            (false, Duration::from_millis(100)),
            (true, Duration::from_millis(10)),
        ])?;
        d.link.command(SWRESET, &[])?;
        thread::sleep(Duration::from_millis(150));
        d.link.command(SLPOUT, &[])?;
        thread::sleep(Duration::from_millis(150));

        d.link.commands(&[
            &[FRMCTR1, 0x01, 0x2C, 0x2D],
            &[FRMCTR2, 0x01, 0x2C, 0x2D],
            &[FRMCTR3, 0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D],
            &[INVCTR, 0x07],
            &[PWCTR1, 0xA2, 0x02, 0x84],
            &[PWCTR2, 0xC5],
            &[PWCTR3, 0x0A, 0x00],
            &[PWCTR4, 0x8A, 0x2A],
            &[PWCTR5, 0x8A, 0xEE],
            &[VMCTR1, 0x0E],
            &[COLMOD, COLMOD_RGB565],
            &[
                GMCTRP1, 0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39,
                0x00, 0x01, 0x03, 0x10,
            ],
            &[
                GMCTRN1, 0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F,
                0x00, 0x00, 0x02, 0x10,
            ],
            &[NORON],
            &[DISPON],
        ])?;
        thread::sleep(Duration::from_millis(100));

        d.set_rotation(config.rotation)?;

        debug!("Initialized {}", d);
        Ok(d)
    }
}

impl<C: Conn> Display for St7735<C> {
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
        debug!("ST7735 ignores contrast level {}", level);
        Ok(())
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<()> {
        self.link.command(MADCTL, &[madctl(rotation)])?;
        self.rotation = rotation;
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        write_frame(&mut self.link, &self.buf)
    }

    fn halt(&mut self) -> Result<()> {
        self.link.halt()
    }

    fn close(&mut self) -> Result<()> {
        self.link.close()
    }
}

impl<C> fmt::Display for St7735<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ST7735 LCD {}", self.buf.bounds())
    }
}
