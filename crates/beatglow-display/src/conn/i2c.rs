//! I2C connection via the Linux i2c-dev interface.

use super::Conn;
use crate::Result;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::io::AsRawFd;
use tracing::{debug, info};

/// `I2C_SLAVE` ioctl request from linux/i2c-dev.h.
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// Control byte announcing a command stream.
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a data stream.
const CONTROL_DATA: u8 = 0x40;

/// Maximum payload per I2C write, excluding the control byte.
const MAX_PAYLOAD: usize = 1024;

/// Splits a transfer into control-byte prefixed I2C writes.
fn frames(bytes: &[u8], is_command: bool) -> impl Iterator<Item = Vec<u8>> + '_ {
    let control = if is_command {
        CONTROL_COMMAND
    } else {
        CONTROL_DATA
    };
    bytes.chunks(MAX_PAYLOAD).map(move |chunk| {
        let mut frame = Vec::with_capacity(chunk.len() + 1);
        frame.push(control);
        frame.extend_from_slice(chunk);
        frame
    })
}

/// Display connection over an I2C bus.
pub struct I2cConn {
    file: File,
    path: String,
    addr: u16,
}

impl I2cConn {
    /// Opens `/dev/i2c-<bus>` and selects the device at `addr`.
    pub fn open(bus: u32, addr: u16) -> Result<Self> {
        let path = format!("/dev/i2c-{}", bus);
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        // SAFETY: the descriptor is owned by `file` and stays open for the
        // call; I2C_SLAVE takes the address by value.
        let rc = unsafe { libc::ioctl(file.as_raw_fd(), I2C_SLAVE as _, libc::c_ulong::from(addr)) };
        if rc < 0 {
            return Err(std::io::Error::last_os_error().into());
        }

        let conn = Self { file, path, addr };
        info!("I2C device opened at {}", conn);
        Ok(conn)
    }

    fn write_frames(&mut self, bytes: &[u8], is_command: bool) -> Result<()> {
        for frame in frames(bytes, is_command) {
            self.file.write_all(&frame)?;
        }
        Ok(())
    }
}

impl Conn for I2cConn {
    fn command(&mut self, cmd: u8, args: &[u8]) -> Result<()> {
        let mut bytes = Vec::with_capacity(args.len() + 1);
        bytes.push(cmd);
        bytes.extend_from_slice(args);
        self.write_frames(&bytes, true)
    }

    fn data(&mut self, data: &[u8]) -> Result<()> {
        self.write_frames(data, false)
    }

    fn close(&mut self) -> Result<()> {
        debug!("Closing I2C device {}", self.path);
        self.file.flush()?;
        Ok(())
    }
}

impl fmt::Display for I2cConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I2C {} addr {:#04x}", self.path, self.addr)
    }
}
