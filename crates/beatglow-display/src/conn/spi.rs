//! SPI connection via spidev, with the D/C and reset lines on a GPIO chip.

use super::{
    Conn, SpiMode, SpiSettings, DEFAULT_GPIO_CHIP, DEFAULT_SPI_SPEED_HZ, VALID_SPI_SPEEDS,
};
use crate::{Error, Result};
use gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use spidev::{SpiModeFlags, Spidev, SpidevOptions};
use std::fmt;
use std::io::Write;
use tracing::{debug, info};

/// Bytes per spidev write; the kernel's default `bufsiz`.
const BATCH_SIZE: usize = 4096;

/// SPI bus configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiConfig {
    /// Bus number (/dev/spidevB.d)
    pub bus: u32,
    /// Chip select on the bus (/dev/spidevb.D)
    pub device: u32,
    /// Initial clock speed; must be one of [`VALID_SPI_SPEEDS`]
    pub speed_hz: u32,
    /// GPIO chip device path
    pub gpio_chip: String,
    /// Data/command line offset
    pub dc_pin: u32,
    /// Reset line offset, if wired
    pub reset_pin: Option<u32>,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            speed_hz: DEFAULT_SPI_SPEED_HZ,
            gpio_chip: DEFAULT_GPIO_CHIP.to_string(),
            dc_pin: 24,
            reset_pin: Some(25),
        }
    }
}

fn check_speed(hz: u32) -> Result<()> {
    if VALID_SPI_SPEEDS.contains(&hz) {
        Ok(())
    } else {
        Err(Error::InvalidSpiSpeed(hz))
    }
}

fn mode_flags(mode: SpiMode) -> SpiModeFlags {
    match mode {
        SpiMode::Mode0 => SpiModeFlags::SPI_MODE_0,
        SpiMode::Mode1 => SpiModeFlags::SPI_MODE_1,
        SpiMode::Mode2 => SpiModeFlags::SPI_MODE_2,
        SpiMode::Mode3 => SpiModeFlags::SPI_MODE_3,
    }
}

/// Splits a command into the bytes sent with D/C low and those sent with
/// D/C high.
fn command_parts(cmd: u8, args: &[u8], args_as_data: bool) -> (Vec<u8>, &[u8]) {
    if args_as_data {
        (vec![cmd], args)
    } else {
        let mut bytes = Vec::with_capacity(args.len() + 1);
        bytes.push(cmd);
        bytes.extend_from_slice(args);
        (bytes, &[])
    }
}

/// Display connection over a 4-wire SPI bus.
pub struct SpiConn {
    spi: Spidev,
    path: String,
    dc: LineHandle,
    dc_high: Option<bool>,
    reset: Option<LineHandle>,
    settings: SpiSettings,
}

impl SpiConn {
    /// Opens `/dev/spidev<bus>.<device>` and claims the D/C and reset lines.
    pub fn open(config: &SpiConfig) -> Result<Self> {
        check_speed(config.speed_hz)?;

        let path = format!("/dev/spidev{}.{}", config.bus, config.device);
        let spi = Spidev::open(&path)?;

        let mut chip = Chip::new(&config.gpio_chip)?;
        let dc = chip
            .get_line(config.dc_pin)?
            .request(LineRequestFlags::OUTPUT, 0, "beatglow-dc")?;
        let reset = match config.reset_pin {
            Some(pin) => Some(
                chip.get_line(pin)?
                    .request(LineRequestFlags::OUTPUT, 1, "beatglow-reset")?,
            ),
            None => None,
        };

        let mut conn = Self {
            spi,
            path,
            dc,
            dc_high: None,
            reset,
            settings: SpiSettings::default(),
        };
        conn.configure_spi(SpiSettings {
            max_speed_hz: config.speed_hz,
            ..SpiSettings::default()
        })?;

        info!("SPI device opened at {}", conn);
        Ok(conn)
    }

    fn set_dc(&mut self, high: bool) -> Result<()> {
        if self.dc_high != Some(high) {
            self.dc.set_value(u8::from(high))?;
            self.dc_high = Some(high);
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        for chunk in bytes.chunks(BATCH_SIZE) {
            self.spi.write_all(chunk)?;
        }
        Ok(())
    }
}

impl Conn for SpiConn {
    fn command(&mut self, cmd: u8, args: &[u8]) -> Result<()> {
        let (command, data) = command_parts(cmd, args, self.settings.args_as_data);
        self.set_dc(false)?;
        self.write(&command)?;
        self.data(data)
    }

    fn data(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.set_dc(true)?;
        self.write(data)
    }

    fn reset(&mut self, high: bool) -> Result<()> {
        match &self.reset {
            Some(line) => Ok(line.set_value(u8::from(high))?),
            None => Ok(()),
        }
    }

    fn configure_spi(&mut self, settings: SpiSettings) -> Result<()> {
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(settings.max_speed_hz)
            .mode(mode_flags(settings.mode))
            .build();
        self.spi.configure(&options)?;
        self.settings = settings;
        debug!("SPI reconfigured: {}", self);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        debug!("Closing SPI device {}", self.path);
        self.spi.flush()?;
        Ok(())
    }
}

impl fmt::Display for SpiConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPI {} mode {} at {} Hz",
            self.path,
            self.settings.mode.bits(),
            self.settings.max_speed_hz
        )
    }
}
