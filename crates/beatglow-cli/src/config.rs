//! Configuration file support.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file for `display-test`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Panel configuration handed to the driver
    #[serde(default)]
    pub display: beatglow_display::Config,

    /// Bus configuration
    #[serde(default)]
    pub bus: BusConfig,
}

/// Bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// I2C bus number (/dev/i2c-N)
    #[serde(default = "default_i2c_dev")]
    pub i2c_dev: u32,

    /// I2C device address
    #[serde(default = "default_i2c_addr")]
    pub i2c_addr: u16,

    /// SPI bus number (/dev/spidevB.d)
    #[serde(default)]
    pub spi_bus: u32,

    /// SPI chip select (/dev/spidevb.D)
    #[serde(default)]
    pub spi_dev: u32,

    /// SPI clock in Hz
    #[serde(default = "default_spi_speed")]
    pub spi_speed: u32,

    /// GPIO chip holding the D/C and reset lines
    #[serde(default = "default_gpio_chip")]
    pub gpio_chip: String,

    /// Data/command GPIO line
    #[serde(default = "default_dc_pin")]
    pub dc_pin: u32,

    /// Reset GPIO line
    #[serde(default = "default_reset_pin")]
    pub reset_pin: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            i2c_dev: default_i2c_dev(),
            i2c_addr: default_i2c_addr(),
            spi_bus: 0,
            spi_dev: 0,
            spi_speed: default_spi_speed(),
            gpio_chip: default_gpio_chip(),
            dc_pin: default_dc_pin(),
            reset_pin: default_reset_pin(),
        }
    }
}

fn default_i2c_dev() -> u32 {
    1
}

fn default_i2c_addr() -> u16 {
    beatglow_display::DEFAULT_I2C_ADDR
}

fn default_spi_speed() -> u32 {
    beatglow_display::DEFAULT_SPI_SPEED_HZ
}

fn default_gpio_chip() -> String {
    beatglow_display::DEFAULT_GPIO_CHIP.to_string()
}

fn default_dc_pin() -> u32 {
    24
}

fn default_reset_pin() -> u32 {
    25
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }
}
