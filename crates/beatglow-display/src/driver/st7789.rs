//! Sitronix ST7789 16-bit color TFT controller.

use super::link::Link;
use super::st77xx::*;
use crate::conn::Conn;
use crate::{Config, Display, Result, Rotation};
use beatglow_pixel::{ByteOrder, Rgb16Buffer, Surface};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 240;
pub const DEFAULT_HEIGHT: usize = 240;

/// Largest panel in the native (portrait) orientation.
const MAX_SIZE: (usize, usize) = (240, 320);

const PORCTRL: u8 = 0xB2;
const GCTRL: u8 = 0xB7;
const VCOMS: u8 = 0xBB;
const LCMCTRL: u8 = 0xC0;
const VDVVRHEN: u8 = 0xC2;
const VRHS: u8 = 0xC3;
const VDVSET: u8 = 0xC4;
const VCMOFSET: u8 = 0xC5;
const FRCTR2: u8 = 0xC6;
const PWCTRL1: u8 = 0xD0;
const PVGAMCTRL: u8 = 0xE0;
const NVGAMCTRL: u8 = 0xE1;

/// ST7789 driver.
pub struct St7789<C> {
    link: Link<C>,
    buf: Rgb16Buffer,
    rotation: Rotation,
}

impl<C: Conn> St7789<C> {
    /// Resets and initializes the controller.
    ///
    /// Width and height are in the configured rotation, so a 320x240 panel
    /// needs a 90° or 270° rotation.
    pub fn new(conn: C, config: &Config) -> Result<Self> {
        let (width, height) = config.size_or(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        check_size("ST7789", (width, height), config.rotation, MAX_SIZE)?;

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
        d.link.command(SLPOUT, &[])?;
        thread::sleep(Duration::from_millis(150));

        d.link.commands(&[
            &[MADCTL, 0x00],
            &[COLMOD, COLMOD_RGB565],
            &[PORCTRL, 0x0C, 0x0C],
            &[GCTRL, 0x35],
            &[VCOMS, 0x1A],
            &[LCMCTRL, 0x2C],
            &[VDVVRHEN, 0x01],
            &[VRHS, 0x0B],
            &[VDVSET, 0x20],
            &[VCMOFSET, 0x20],
            &[FRCTR2, 0x0F],
            &[PWCTRL1, 0xA4, 0xA1],
            &[INVON],
            &[
                PVGAMCTRL, 0x00, 0x19, 0x1E, 0x0A, 0x09, 0x15, 0x3D, 0x44, 0x51, 0x12, 0x03, 0x00,
                0x3F, 0x3F,
            ],
            &[
                NVGAMCTRL, 0x00, 0x18, 0x1E, 0x0A, 0x09, 0x25, 0x3F, 0x43, 0x52, 0x33, 0x03, 0x00,
                0x3F, 0x3F,
            ],
            &[DISPON],
        ])?;
        thread::sleep(Duration::from_millis(100));

        d.set_rotation(config.rotation)?;

        debug!("Initialized {}", d);
        Ok(d)
    }
}

impl<C: Conn> Display for St7789<C> {
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
        // Brightness is a backlight PWM matter on these panels.
        debug!("ST7789 ignores contrast level {}", level);
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

impl<C> fmt::Display for St7789<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ST7789 LCD {}", self.buf.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::{Recorder, Transfer};
    use crate::Error;
    use beatglow_pixel::{Color, Model};

    #[test]
    fn test_init_sequence() {
        let rec = Recorder::new();
        let d = St7789::new(rec.clone(), &Config::default()).unwrap();
        assert_eq!(d.to_string(), "ST7789 LCD 240x240");
        assert_eq!(d.color_model(), Model::Rgb16);
        assert_eq!(d.buf.byte_order(), ByteOrder::BigEndian);

        let transfers = rec.transfers();
        assert_eq!(
            &transfers[..4],
            &[
                Transfer::Reset(true),
                Transfer::Reset(false),
                Transfer::Reset(true),
                Transfer::Command(SLPOUT, vec![]),
            ]
        );
        assert_eq!(transfers.last(), Some(&Transfer::Command(MADCTL, vec![0x00])));
        assert_eq!(rec.data_len(), 0);
        assert_eq!(rec.spi_settings(), Some(SPI_SETTINGS));
    }

    #[test]
    fn test_size_limits_follow_rotation() {
        let mut config = Config::new(320, 240);
        assert!(matches!(
            St7789::new(Recorder::new(), &config),
            Err(Error::UnsupportedSize { driver: "ST7789", .. })
        ));

        config.rotation = Rotation::Rotate270;
        let rec = Recorder::new();
        let d = St7789::new(rec.clone(), &config).unwrap();
        assert_eq!(d.rotation(), Rotation::Rotate270);
        assert_eq!(rec.transfers().last(), Some(&Transfer::Command(MADCTL, vec![0xA0])));
    }

    #[test]
    fn test_refresh_batches() {
        let rec = Recorder::new();
        let mut d = St7789::new(rec.clone(), &Config::new(240, 320)).unwrap();
        d.set(0, 0, Color::from_hex("#ff0000").unwrap());
        rec.take();

        d.refresh().unwrap();
        let frame = rec.data_bytes();
        let transfers = rec.take();
        assert_eq!(
            &transfers[..3],
            &[
                Transfer::Command(CASET, vec![0x00, 0x00, 0x00, 0xEF]),
                Transfer::Command(RASET, vec![0x00, 0x00, 0x01, 0x3F]),
                Transfer::Command(RAMWR, vec![]),
            ]
        );
        let total: usize = 240 * 320 * 2;
        assert_eq!(transfers.len(), 3 + total.div_ceil(BATCH_SIZE));
        assert!(transfers[3..]
            .iter()
            .all(|t| matches!(t, Transfer::Data(b) if b.len() <= BATCH_SIZE)));

        assert_eq!(frame.len(), total);
        assert_eq!(&frame[..4], &[0xF8, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_contrast_is_ignored() {
        let rec = Recorder::new();
        let mut d = St7789::new(rec.clone(), &Config::default()).unwrap();
        rec.take();
        d.set_contrast(0x80).unwrap();
        assert!(rec.transfers().is_empty());
    }
}
