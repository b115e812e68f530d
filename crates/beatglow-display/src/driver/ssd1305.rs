//! Solomon Systech SSD1305 monochrome OLED controller.
//!
//! Like the SH1106 it has 132 columns of RAM and is written one page at a
//! time. 128x64 modules start four columns in.

use super::link::Link;
use super::ssd1xxx::*;
use crate::conn::Conn;
use crate::{Config, Display, Error, Result, Rotation};
use beatglow_pixel::{MonoVerticalLsbBuffer, Surface};
use std::fmt;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 128;
pub const DEFAULT_HEIGHT: usize = 32;

const SET_LUT: u8 = 0x91;
const SET_MASTER_CONFIG: u8 = 0xAD;
const SET_AREA_COLOR: u8 = 0xD8;

/// SSD1305 driver.
pub struct Ssd1305<C> {
    link: Link<C>,
    buf: MonoVerticalLsbBuffer,
    rotation: Rotation,
    col_start: u8,
}

impl<C: Conn> Ssd1305<C> {
    /// Initializes the controller and clears the panel.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let col_start = match (width, height) {
            (128, 32) => 0,
            (128, 64) => 4,
            _ => {
                return Err(Error::UnsupportedSize {
                    driver: "SSD1305",
                    width,
                    height,
                })
            }
        };

        let mut d = Self {
            link: Link::new(conn, config.debug, SET_DISPLAY_ON, SET_DISPLAY_OFF),
            buf: MonoVerticalLsbBuffer::new(width, height),
            rotation: config.rotation,
            col_start,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.link.commands(&[
            &[SET_DISPLAY_OFF],
            &[SET_LOW_COLUMN | (col_start & 0x0F)],
            &[SET_HIGH_COLUMN | (col_start >> 4)],
            &[SET_START_LINE],
            &[SET_SEGMENT_REMAP],
            &[SET_NORMAL_DISPLAY],
            &[SET_MULTIPLEX_RATIO, (height - 1) as u8],
            &[SET_MASTER_CONFIG, 0x8E],
            &[SET_COM_SCAN_DEC],
            &[SET_DISPLAY_OFFSET, 0x40],
            &[SET_DISPLAY_CLOCK_DIV, 0xF0],
            &[SET_AREA_COLOR, 0x05],
            &[SET_PRECHARGE, 0xF1],
            &[SET_COM_PINS, 0x12],
            &[SET_LUT, 0x3F, 0x3F, 0x3F, 0x3F],
        ])?;
        d.set_contrast(0x7F)?;
        d.refresh()?;
        d.show(true)?;

        debug!("Initialized {}", d);
        Ok(d)
    }
}

impl<C: Conn> Display for Ssd1305<C> {
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
                &[SET_PAGE_START | (page as u8 & 0x07)],
                &[SET_LOW_COLUMN | (self.col_start & 0x0F)],
                &[SET_HIGH_COLUMN | (self.col_start >> 4)],
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

impl<C> fmt::Display for Ssd1305<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSD1305 OLED {}", self.buf.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::{Recorder, Transfer};
    use beatglow_pixel::{Color, Mono};

    #[test]
    fn test_init_sequence() {
        let rec = Recorder::new();
        let d = Ssd1305::new(rec.clone(), &Config::default()).unwrap();
        assert_eq!(d.to_string(), "SSD1305 OLED 128x32");
        assert_eq!(rec.spi_settings(), Some(SPI_SETTINGS));

        let transfers = rec.transfers();
        assert_eq!(transfers[0], Transfer::Command(SET_DISPLAY_OFF, vec![]));
        assert!(transfers.contains(&Transfer::Command(SET_MULTIPLEX_RATIO, vec![31])));
        assert!(transfers.contains(&Transfer::Command(SET_MASTER_CONFIG, vec![0x8E])));
        assert!(transfers.contains(&Transfer::Command(SET_LUT, vec![0x3F; 4])));
        assert!(transfers.contains(&Transfer::Command(SET_CONTRAST, vec![0x7F])));
        assert_eq!(transfers.last(), Some(&Transfer::Command(SET_DISPLAY_ON, vec![])));
        assert_eq!(rec.data_len(), 128 * 4);
    }

    #[test]
    fn test_refresh_with_column_offset() {
        let rec = Recorder::new();
        let mut d = Ssd1305::new(rec.clone(), &Config::new(128, 64)).unwrap();
        d.set(3, 63, Color::Mono(Mono::ON));
        rec.take();

        d.refresh().unwrap();
        let transfers = rec.take();
        assert_eq!(transfers.len(), 8 * 4);
        for page in 0..8 {
            let t = &transfers[page * 4..page * 4 + 4];
            assert_eq!(t[0], Transfer::Command(0xB0 | page as u8, vec![]));
            assert_eq!(t[1], Transfer::Command(0x04, vec![]));
            assert_eq!(t[2], Transfer::Command(0x10, vec![]));
        }
        match &transfers[31] {
            Transfer::Data(bytes) => {
                assert_eq!(bytes.len(), 128);
                assert_eq!(bytes[3], 0x80);
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_size() {
        assert!(matches!(
            Ssd1305::new(Recorder::new(), &Config::new(96, 16)),
            Err(Error::UnsupportedSize { driver: "SSD1305", .. })
        ));
    }
}
