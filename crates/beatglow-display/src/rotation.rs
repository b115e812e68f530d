//! Display rotation.
//!
//! Controllers with a memory access control register (ST7789) rotate in
//! hardware. The page-addressed OLED drivers only record the setting.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Clockwise display rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Rotated 90° clockwise.
    Rotate90,
    /// Rotated 180°.
    Rotate180,
    /// Rotated 270° clockwise.
    Rotate270,
}

impl Rotation {
    /// Returns the rotation in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// Returns true if this rotation swaps rows and columns.
    pub fn is_transposed(&self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

impl FromStr for Rotation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "0" | "no" | "none" => Ok(Rotation::None),
            "90" | "cw" | "right" => Ok(Rotation::Rotate90),
            "180" | "flip" => Ok(Rotation::Rotate180),
            "270" | "ccw" | "left" => Ok(Rotation::Rotate270),
            _ => Err(Error::InvalidRotation(s.to_string())),
        }
    }
}

impl TryFrom<String> for Rotation {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rotation> for String {
    fn from(rotation: Rotation) -> Self {
        rotation.to_string()
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rotation::None => write!(f, "none"),
            Rotation::Rotate90 => write!(f, "90"),
            Rotation::Rotate180 => write!(f, "180"),
            Rotation::Rotate270 => write!(f, "270"),
        }
    }
}
