//! Packed pixel buffers.
//!
//! Each buffer owns a zero-initialized byte array laid out exactly as the
//! display controller expects it on the wire. All buffers have their origin
//! at (0, 0); writes outside the bounds are ignored and reads outside the
//! bounds return `None` from the typed accessors.

mod gray;
mod mono;
mod rgb;

pub use gray::{Gray2Buffer, Gray4Buffer};
pub use mono::{MonoBuffer, MonoVerticalLsbBuffer};
pub use rgb::{Rgb15Buffer, Rgb16Buffer};

use crate::{Error, Result};
use std::str::FromStr;

/// Axis-aligned bounds `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns true if (x, y) lies inside the bounds.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Byte order of 16-bit pixel words on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// High byte first.
    #[default]
    BigEndian,
    /// Low byte first.
    LittleEndian,
}

impl ByteOrder {
    #[inline]
    pub fn encode(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        }
    }

    #[inline]
    pub fn decode(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "big" | "be" | "big-endian" | "big_endian" => Ok(ByteOrder::BigEndian),
            "little" | "le" | "little-endian" | "little_endian" => Ok(ByteOrder::LittleEndian),
            _ => Err(Error::InvalidByteOrder(s.to_string())),
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteOrder::BigEndian => write!(f, "big-endian"),
            ByteOrder::LittleEndian => write!(f, "little-endian"),
        }
    }
}

/// Order of the red and blue fields in a 15/16-bit pixel word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelOrder {
    /// Red in the high bits.
    #[default]
    Rgb,
    /// Blue in the high bits.
    Bgr,
}

impl FromStr for ChannelOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "bgr" => Ok(ChannelOrder::Bgr),
            _ => Err(Error::InvalidChannelOrder(s.to_string())),
        }
    }
}

impl std::fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOrder::Rgb => write!(f, "rgb"),
            ChannelOrder::Bgr => write!(f, "bgr"),
        }
    }
}

/// Byte storage shared by every buffer format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pixels {
    pub(crate) rect: Rect,
    pub(crate) stride: usize,
    pub(crate) pix: Vec<u8>,
}

impl Pixels {
    pub(crate) fn new(width: usize, height: usize, stride: usize, size: usize) -> Self {
        Self {
            rect: Rect::new(width, height),
            stride,
            pix: vec![0; size],
        }
    }

    /// Returns the unsigned coordinates if (x, y) is in bounds.
    #[inline]
    pub(crate) fn locate(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if self.rect.contains(x, y) {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    pub(crate) fn stamp(&mut self, value: u8) {
        self.pix.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(4, 2);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(3, 1));
        assert!(!rect.contains(4, 1));
        assert!(!rect.contains(3, 2));
        assert!(!rect.contains(-1, 0));
        assert!(!rect.contains(0, -1));
        assert!(!Rect::new(0, 0).contains(0, 0));
    }

    #[test]
    fn test_byte_order_from_str() {
        assert_eq!("big".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert_eq!("LE".parse::<ByteOrder>().unwrap(), ByteOrder::LittleEndian);
        assert_eq!(
            "little-endian".parse::<ByteOrder>().unwrap(),
            ByteOrder::LittleEndian
        );
        assert_eq!(
            "middle".parse::<ByteOrder>(),
            Err(Error::InvalidByteOrder("middle".to_string()))
        );
    }

    #[test]
    fn test_byte_order_bytes() {
        assert_eq!(ByteOrder::BigEndian.encode(0x1234), [0x12, 0x34]);
        assert_eq!(ByteOrder::LittleEndian.encode(0x1234), [0x34, 0x12]);
        assert_eq!(ByteOrder::LittleEndian.decode([0x34, 0x12]), 0x1234);
    }

    #[test]
    fn test_channel_order_from_str() {
        assert_eq!("BGR".parse::<ChannelOrder>().unwrap(), ChannelOrder::Bgr);
        assert!("grb".parse::<ChannelOrder>().is_err());
    }
}
