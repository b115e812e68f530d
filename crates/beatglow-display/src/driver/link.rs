//! Command/data link shared by the drivers.

use crate::conn::{Conn, SpiSettings};
use crate::Result;
use std::fmt::Write;
use std::thread;
use std::time::Duration;
use tracing::debug;

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Wraps a [`Conn`] with the panel's power state.
///
/// Any transfer while halted turns the panel back on first.
pub(crate) struct Link<C> {
    conn: C,
    debug: bool,
    halted: bool,
    on: u8,
    off: u8,
}

impl<C: Conn> Link<C> {
    /// Creates a link; `on` and `off` are the controller's display on/off
    /// opcodes.
    pub fn new(conn: C, debug: bool, on: u8, off: u8) -> Self {
        Self {
            conn,
            debug,
            halted: false,
            on,
            off,
        }
    }

    /// Passes SPI settings to the transport.
    pub fn configure_spi(&mut self, settings: SpiSettings) -> Result<()> {
        self.conn.configure_spi(settings)
    }

    fn wake(&mut self) -> Result<()> {
        if self.is_halted() {
            self.show(true)?;
            self.halted = false;
        }
        Ok(())
    }

    pub fn command(&mut self, cmd: u8, args: &[u8]) -> Result<()> {
        self.wake()?;
        if self.debug {
            debug!("command {:#04x} args {}", cmd, hex(args));
        }
        self.conn.command(cmd, args)
    }

    /// Sends a sequence of commands, each slice starting with its opcode.
    pub fn commands(&mut self, cmds: &[&[u8]]) -> Result<()> {
        for cmd in cmds {
            if let Some((&op, args)) = cmd.split_first() {
                self.command(op, args)?;
            }
        }
        Ok(())
    }

    pub fn data(&mut self, bytes: &[u8]) -> Result<()> {
        self.wake()?;
        if self.debug {
            debug!("data {}", hex(bytes));
        }
        self.conn.data(bytes)
    }

    /// Sends data in batches of at most `size` bytes.
    pub fn data_chunked(&mut self, bytes: &[u8], size: usize) -> Result<()> {
        for chunk in bytes.chunks(size.max(1)) {
            self.data(chunk)?;
        }
        Ok(())
    }

    /// Switches the panel on or off. Does not wake a halted link.
    pub fn show(&mut self, on: bool) -> Result<()> {
        let cmd = if on { self.on } else { self.off };
        if self.debug {
            debug!("show {}", on);
        }
        self.conn.command(cmd, &[])
    }

    pub fn halt(&mut self) -> Result<()> {
        if !self.halted {
            self.show(false)?;
            self.halted = true;
        }
        Ok(())
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Drives the reset line through `steps`, holding each level for its
    /// duration.
    pub fn reset_pulse(&mut self, steps: &[(bool, Duration)]) -> Result<()> {
        for &(level, hold) in steps {
            self.conn.reset(level)?;
            thread::sleep(hold);
        }
        Ok(())
    }

    /// Halts the panel and closes the connection. The connection is closed
    /// even when switching the panel off fails.
    pub fn close(&mut self) -> Result<()> {
        if let Err(e) = self.halt() {
            let _ = self.conn.close();
            return Err(e);
        }
        self.conn.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::{Recorder, Transfer};

    fn link() -> (Recorder, Link<Recorder>) {
        let rec = Recorder::new();
        (rec.clone(), Link::new(rec, true, 0xAF, 0xAE))
    }

    #[test]
    fn test_halted_link_wakes_on_transfer() {
        let (rec, mut link) = link();
        link.halt().unwrap();
        link.halt().unwrap();
        assert!(link.is_halted());
        link.data(&[1, 2]).unwrap();
        assert!(!link.is_halted());
        assert_eq!(
            rec.take(),
            vec![
                Transfer::Command(0xAE, vec![]),
                Transfer::Command(0xAF, vec![]),
                Transfer::Data(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_show_does_not_wake() {
        let (rec, mut link) = link();
        link.halt().unwrap();
        link.show(false).unwrap();
        assert!(link.is_halted());
        assert_eq!(rec.command_count(), 2);
    }

    #[test]
    fn test_commands_and_chunks() {
        let (rec, mut link) = link();
        link.commands(&[&[0x81, 0x7F], &[], &[0xA6]]).unwrap();
        link.data_chunked(&[0; 10], 4).unwrap();
        assert_eq!(
            rec.take(),
            vec![
                Transfer::Command(0x81, vec![0x7F]),
                Transfer::Command(0xA6, vec![]),
                Transfer::Data(vec![0; 4]),
                Transfer::Data(vec![0; 4]),
                Transfer::Data(vec![0; 2]),
            ]
        );
    }

    #[test]
    fn test_close_turns_panel_off() {
        let (rec, mut link) = link();
        link.close().unwrap();
        assert!(rec.is_closed());
        assert_eq!(rec.transfers(), vec![Transfer::Command(0xAE, vec![])]);
        assert!(link.data(&[0]).is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[0x00, 0xAB, 0x7f]), "00ab7f");
    }
}
