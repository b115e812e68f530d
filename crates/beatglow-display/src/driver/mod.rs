//! Chip-specific display drivers.

mod link;
mod ssd1xxx;
mod st77xx;

pub mod gp1294;
pub mod sh1106;
pub mod sh1122;
pub mod ssd1305;
pub mod ssd1306;
pub mod ssd1322;
pub mod st7735;
pub mod st7789;

pub use gp1294::Gp1294;
pub use sh1106::Sh1106;
pub use sh1122::Sh1122;
pub use ssd1305::Ssd1305;
pub use ssd1306::Ssd1306;
pub use ssd1322::Ssd1322;
pub use st7735::St7735;
pub use st7789::St7789;

use crate::conn::Conn;
use crate::{Config, Display, Error, Result};
use std::str::FromStr;

/// Supported display controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Ssd1305,
    Ssd1306,
    Sh1106,
    Sh1122,
    Ssd1322,
    St7735,
    St7789,
    Gp1294,
}

impl Driver {
    pub const ALL: [Driver; 8] = [
        Driver::Ssd1305,
        Driver::Ssd1306,
        Driver::Sh1106,
        Driver::Sh1122,
        Driver::Ssd1322,
        Driver::St7735,
        Driver::St7789,
        Driver::Gp1294,
    ];

    /// Initializes the controller behind `conn`.
    pub fn open<C: Conn + 'static>(self, conn: C, config: &Config) -> Result<Box<dyn Display>> {
        Ok(match self {
            Driver::Ssd1305 => Box::new(Ssd1305::new(conn, config)?),
            Driver::Ssd1306 => Box::new(Ssd1306::new(conn, config)?),
            Driver::Sh1106 => Box::new(Sh1106::new(conn, config)?),
            Driver::Sh1122 => Box::new(Sh1122::new(conn, config)?),
            Driver::Ssd1322 => Box::new(Ssd1322::new(conn, config)?),
            Driver::St7735 => Box::new(St7735::new(conn, config)?),
            Driver::St7789 => Box::new(St7789::new(conn, config)?),
            Driver::Gp1294 => Box::new(Gp1294::new(conn, config)?),
        })
    }
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ssd1305" => Ok(Driver::Ssd1305),
            "ssd1306" => Ok(Driver::Ssd1306),
            "sh1106" => Ok(Driver::Sh1106),
            "sh1122" => Ok(Driver::Sh1122),
            "ssd1322" => Ok(Driver::Ssd1322),
            "st7735" => Ok(Driver::St7735),
            "st7789" => Ok(Driver::St7789),
            "gp1294" => Ok(Driver::Gp1294),
            _ => Err(Error::UnknownDriver(s.to_string())),
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Driver::Ssd1305 => write!(f, "ssd1305"),
            Driver::Ssd1306 => write!(f, "ssd1306"),
            Driver::Sh1106 => write!(f, "sh1106"),
            Driver::Sh1122 => write!(f, "sh1122"),
            Driver::Ssd1322 => write!(f, "ssd1322"),
            Driver::St7735 => write!(f, "st7735"),
            Driver::St7789 => write!(f, "st7789"),
            Driver::Gp1294 => write!(f, "gp1294"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::Recorder;
    use beatglow_pixel::Model;

    #[test]
    fn test_from_str() {
        assert_eq!("SSD1306".parse::<Driver>().unwrap(), Driver::Ssd1306);
        assert_eq!("st7789".parse::<Driver>().unwrap(), Driver::St7789);
        assert_eq!("SH1122".parse::<Driver>().unwrap(), Driver::Sh1122);
        assert_eq!("GP1294".parse::<Driver>().unwrap(), Driver::Gp1294);
        assert!(matches!(
            "gp9002".parse::<Driver>(),
            Err(Error::UnknownDriver(s)) if s == "gp9002"
        ));
        for driver in Driver::ALL {
            assert_eq!(driver.to_string().parse::<Driver>().unwrap(), driver);
        }
    }

    #[test]
    fn test_open_every_driver() {
        let models = [
            Model::Mono,
            Model::Mono,
            Model::Mono,
            Model::Gray4,
            Model::Gray4,
            Model::Rgb16,
            Model::Rgb16,
            Model::Mono,
        ];
        for (driver, model) in Driver::ALL.into_iter().zip(models) {
            let rec = Recorder::new();
            let mut display = driver.open(rec.clone(), &Config::default()).unwrap();
            assert_eq!(display.color_model(), model, "{}", driver);
            assert!(!display.bounds().is_empty());
            display.close().unwrap();
            assert!(rec.is_closed());
        }
    }
}
