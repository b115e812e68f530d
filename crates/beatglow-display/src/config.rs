//! Driver configuration.

use crate::Rotation;
use serde::{Deserialize, Serialize};

/// Panel configuration handed to a driver at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Panel width in pixels (0 selects the driver default)
    #[serde(default)]
    pub width: usize,

    /// Panel height in pixels (0 selects the driver default)
    #[serde(default)]
    pub height: usize,

    /// Initial rotation
    #[serde(default)]
    pub rotation: Rotation,

    /// Log every bus transfer at debug level
    #[serde(default)]
    pub debug: bool,
}

impl Config {
    /// Creates a configuration for a panel of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Returns the configured size, substituting the driver default for
    /// unset dimensions.
    pub fn size_or(&self, width: usize, height: usize) -> (usize, usize) {
        (
            if self.width == 0 { width } else { self.width },
            if self.height == 0 { height } else { self.height },
        )
    }
}
