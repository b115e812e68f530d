//! Futaba GP1294AI 256x48 VFD module.
//!
//! The module shifts every byte in LSB-first, commands included, and stores
//! its graphic RAM column by column: each column is `height / 8` bytes, top
//! band first.

use super::link::Link;
use crate::conn::{Conn, SpiMode, SpiSettings};
use crate::{Config, Display, Error, Result, Rotation};
use beatglow_pixel::{reverse_bits, MonoVerticalLsbBuffer, Surface};
use std::fmt;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 256;
pub const DEFAULT_HEIGHT: usize = 48;

const DEFAULT_BRIGHTNESS: u16 = 0x0028;

const DISPLAY_OFF: u8 = 0x61;
const DISPLAY_ON: u8 = 0x6D;
const OSC_SETTING: u8 = 0x78;
const DISPLAY_MODE: u8 = 0x80;
const BRIGHTNESS: u8 = 0xA0;
const RESET: u8 = 0xAA;
const VFD_MODE: u8 = 0xCC;
const WRITE_GRAM: u8 = 0xF0;

/// The module has no D/C line; a command and its arguments go out in one
/// chip-select cycle.
const SPI_SETTINGS: SpiSettings = SpiSettings {
    mode: SpiMode::Mode0,
    max_speed_hz: 500_000,
    args_as_data: false,
};

/// GP1294 driver.
pub struct Gp1294<C> {
    link: Link<C>,
    buf: MonoVerticalLsbBuffer,
    rotation: Rotation,
}

impl<C: Conn> Gp1294<C> {
    /// Initializes the module and clears the graphic RAM.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        if width > 256 || height > 256 || height % 8 != 0 {
            return Err(Error::UnsupportedSize {
                driver: "GP1294",
                width,
                height,
            });
        }

        let mut d = Self {
            link: Link::new(
                conn,
                config.debug,
                DISPLAY_ON.reverse_bits(),
                DISPLAY_OFF.reverse_bits(),
            ),
            buf: MonoVerticalLsbBuffer::new(width, height),
            rotation: config.rotation,
        };

        d.link.configure_spi(SPI_SETTINGS)?;
        d.send(RESET, &[])?;
        d.send(VFD_MODE, &[0x01, 0x1F, 0x00, 0xFF, 0x2F, 0x00, 0x20])?;
        d.send(BRIGHTNESS, &DEFAULT_BRIGHTNESS.to_le_bytes())?;
        d.refresh()?;
        d.send(DISPLAY_MODE, &[0x00])?;
        d.send(OSC_SETTING, &[0x08])?;
        d.show(true)?;

        debug!("Initialized {}", d);
        Ok(d)
    }

    fn send(&mut self, cmd: u8, args: &[u8]) -> Result<()> {
        self.link.command(cmd.reverse_bits(), &reverse_bits(args))
    }

    /// GRAM write arguments: start column, start row, last row, then the
    /// frame in column-major order.
    fn gram(&self) -> Vec<u8> {
        let bounds = self.buf.bounds();
        let bands = self.buf.bands();
        let mut out = Vec::with_capacity(3 + bounds.width * bands);
        out.extend_from_slice(&[0, 0, (bounds.height - 1) as u8]);
        for x in 0..bounds.width {
            for band in 0..bands {
                out.push(self.buf.band(band)[x]);
            }
        }
        out
    }
}

impl<C: Conn> Display for Gp1294<C> {
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
        let value = u16::from(level) << 2;
        self.send(BRIGHTNESS, &value.to_le_bytes())
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<()> {
        self.rotation = rotation;
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        let gram = self.gram();
        self.send(WRITE_GRAM, &gram)
    }

    fn halt(&mut self) -> Result<()> {
        self.link.halt()
    }

    fn close(&mut self) -> Result<()> {
        self.link.close()
    }
}

impl<C> fmt::Display for Gp1294<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GP1294 VFD {}", self.buf.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::{Recorder, Transfer};
    use beatglow_pixel::{Color, Model, Mono};

    #[test]
    fn test_init_sequence() {
        let rec = Recorder::new();
        let d = Gp1294::new(rec.clone(), &Config::default()).unwrap();
        assert_eq!(d.to_string(), "GP1294 VFD 256x48");
        assert_eq!(d.color_model(), Model::Mono);
        assert_eq!(rec.spi_settings(), Some(SPI_SETTINGS));

        let transfers = rec.transfers();
        assert_eq!(transfers[0], Transfer::Command(0x55, vec![]));
        assert_eq!(transfers[2], Transfer::Command(0x05, vec![0x14, 0x00]));
        assert_eq!(transfers.last(), Some(&Transfer::Command(0xB6, vec![])));
        assert_eq!(rec.data_len(), 0);
    }

    #[test]
    fn test_refresh_column_major_lsb_first() {
        let rec = Recorder::new();
        let mut d = Gp1294::new(rec.clone(), &Config::default()).unwrap();
        d.set(1, 9, Color::Mono(Mono::ON));
        rec.take();

        d.refresh().unwrap();
        let transfers = rec.take();
        assert_eq!(transfers.len(), 1);
        match &transfers[0] {
            Transfer::Command(cmd, args) => {
                assert_eq!(*cmd, 0x0F);
                assert_eq!(args.len(), 3 + 256 * 6);
                assert_eq!(&args[..3], &[0x00, 0x00, 0xF4]);
                // column 1, band 1, row bit 1
                assert_eq!(args[3 + 6 + 1], 0x40);
                assert_eq!(args.iter().filter(|&&b| b != 0).count(), 2);
            }
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_contrast_scales_brightness() {
        let rec = Recorder::new();
        let mut d = Gp1294::new(rec.clone(), &Config::default()).unwrap();
        rec.take();
        d.set_contrast(0xFF).unwrap();
        assert_eq!(rec.take(), vec![Transfer::Command(0x05, vec![0x3F, 0xC0])]);
    }

    #[test]
    fn test_unsupported_size() {
        assert!(matches!(
            Gp1294::new(Recorder::new(), &Config::new(256, 50)),
            Err(Error::UnsupportedSize { driver: "GP1294", .. })
        ));
    }
}
