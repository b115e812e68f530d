//! Bus connections.
//!
//! A [`Conn`] is the only thing a driver needs from the transport: a way to
//! send command bytes and a way to send display data. How the two are told
//! apart on the wire (I2C control byte, SPI D/C line) is up to the transport.

#[cfg(target_os = "linux")]
mod i2c;
#[cfg(target_os = "linux")]
mod spi;

#[cfg(target_os = "linux")]
pub use i2c::I2cConn;
#[cfg(target_os = "linux")]
pub use spi::{SpiConfig, SpiConn};

use crate::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Default 7-bit I2C address of SSD1xxx and SH1106 modules.
pub const DEFAULT_I2C_ADDR: u16 = 0x3C;

/// GPIO character device holding the SPI D/C and reset lines.
pub const DEFAULT_GPIO_CHIP: &str = "/dev/gpiochip0";

/// Default SPI clock.
pub const DEFAULT_SPI_SPEED_HZ: u32 = 8_000_000;

/// SPI clock rates accepted when opening an SPI bus.
pub const VALID_SPI_SPEEDS: [u32; 15] = [
    500_000, 1_000_000, 2_000_000, 4_000_000, 8_000_000, 16_000_000, 20_000_000, 24_000_000,
    28_000_000, 32_000_000, 36_000_000, 40_000_000, 48_000_000, 50_000_000, 52_000_000,
];

/// SPI clock polarity (CPOL) and phase (CPHA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

impl SpiMode {
    /// Mode bits as in linux/spi/spidev.h.
    pub fn bits(self) -> u8 {
        match self {
            SpiMode::Mode0 => 0x00,
            SpiMode::Mode1 => 0x01,
            SpiMode::Mode2 => 0x02,
            SpiMode::Mode3 => 0x03,
        }
    }
}

/// What a driver needs from an SPI transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiSettings {
    pub mode: SpiMode,
    pub max_speed_hz: u32,
    /// Command arguments are clocked out with D/C high, as display data.
    /// SSD1306-style controllers want them with D/C low instead.
    pub args_as_data: bool,
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self {
            mode: SpiMode::Mode0,
            max_speed_hz: DEFAULT_SPI_SPEED_HZ,
            args_as_data: true,
        }
    }
}

/// A connection to a display controller.
pub trait Conn {
    /// Sends a command byte followed by its argument bytes.
    fn command(&mut self, cmd: u8, args: &[u8]) -> Result<()>;

    /// Sends display data bytes.
    fn data(&mut self, data: &[u8]) -> Result<()>;

    /// Sends raw bytes, either as a command (first byte is the opcode) or as data.
    fn send(&mut self, bytes: &[u8], is_command: bool) -> Result<()> {
        match (is_command, bytes.split_first()) {
            (true, Some((&cmd, args))) => self.command(cmd, args),
            (true, None) => Ok(()),
            (false, _) => self.data(bytes),
        }
    }

    /// Drives the reset line, if the transport has one.
    fn reset(&mut self, _high: bool) -> Result<()> {
        Ok(())
    }

    /// Applies SPI settings. Other transports ignore them.
    fn configure_spi(&mut self, _settings: SpiSettings) -> Result<()> {
        Ok(())
    }

    /// Closes the connection.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<C: Conn + ?Sized> Conn for Box<C> {
    fn command(&mut self, cmd: u8, args: &[u8]) -> Result<()> {
        (**self).command(cmd, args)
    }

    fn data(&mut self, data: &[u8]) -> Result<()> {
        (**self).data(data)
    }

    fn send(&mut self, bytes: &[u8], is_command: bool) -> Result<()> {
        (**self).send(bytes, is_command)
    }

    fn reset(&mut self, high: bool) -> Result<()> {
        (**self).reset(high)
    }

    fn configure_spi(&mut self, settings: SpiSettings) -> Result<()> {
        (**self).configure_spi(settings)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// One transfer seen by a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Command(u8, Vec<u8>),
    Data(Vec<u8>),
    Reset(bool),
}

#[derive(Debug, Default)]
struct Log {
    transfers: Vec<Transfer>,
    spi: Option<SpiSettings>,
    closed: bool,
}

/// In-memory connection that records every transfer.
///
/// Clones share the same log, so a caller can keep one handle while a driver
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Log>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all transfers so far.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.log.borrow().transfers.clone()
    }

    /// Removes and returns all transfers so far.
    pub fn take(&self) -> Vec<Transfer> {
        std::mem::take(&mut self.log.borrow_mut().transfers)
    }

    /// Total number of data bytes sent.
    pub fn data_len(&self) -> usize {
        self.log
            .borrow()
            .transfers
            .iter()
            .map(|t| match t {
                Transfer::Data(bytes) => bytes.len(),
                _ => 0,
            })
            .sum()
    }

    /// All data bytes sent, concatenated.
    pub fn data_bytes(&self) -> Vec<u8> {
        let log = self.log.borrow();
        let mut out = Vec::new();
        for t in &log.transfers {
            if let Transfer::Data(bytes) = t {
                out.extend_from_slice(bytes);
            }
        }
        out
    }

    /// Number of commands sent.
    pub fn command_count(&self) -> usize {
        self.log
            .borrow()
            .transfers
            .iter()
            .filter(|t| matches!(t, Transfer::Command(..)))
            .count()
    }

    /// Last SPI settings a driver asked for.
    pub fn spi_settings(&self) -> Option<SpiSettings> {
        self.log.borrow().spi
    }

    pub fn is_closed(&self) -> bool {
        self.log.borrow().closed
    }

    fn push(&self, transfer: Transfer) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.closed {
            return Err(Error::Closed);
        }
        log.transfers.push(transfer);
        Ok(())
    }
}

impl Conn for Recorder {
    fn command(&mut self, cmd: u8, args: &[u8]) -> Result<()> {
        self.push(Transfer::Command(cmd, args.to_vec()))
    }

    fn data(&mut self, data: &[u8]) -> Result<()> {
        self.push(Transfer::Data(data.to_vec()))
    }

    fn reset(&mut self, high: bool) -> Result<()> {
        self.push(Transfer::Reset(high))
    }

    fn configure_spi(&mut self, settings: SpiSettings) -> Result<()> {
        self.log.borrow_mut().spi = Some(settings);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.log.borrow_mut().closed = true;
        Ok(())
    }
}

impl fmt::Display for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dry run ({} transfers)", self.log.borrow().transfers.len())
    }
}
