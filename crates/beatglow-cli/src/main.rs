//! BeatGlow display test tool
//!
//! Initializes a display, draws a test pattern and optionally writes a PNG
//! preview of what was sent to the panel.

mod config;
mod pattern;

use anyhow::{Context, Result};
use beatglow_display::{Conn, Display, Driver, Recorder, Rotation};
use beatglow_pixel::{to_rgba8, Surface};
use clap::Parser;
use config::Config;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum BusType {
    /// Linux I2C character device
    I2c,
    /// Linux spidev with GPIO D/C and reset lines
    Spi,
    /// Record bus traffic in memory
    DryRun,
}

#[derive(Parser)]
#[command(name = "display-test")]
#[command(about = "Draw a test pattern on a BeatGlow display")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Display width (0 for the driver default)
    #[arg(long)]
    width: Option<usize>,

    /// Display height (0 for the driver default)
    #[arg(long)]
    height: Option<usize>,

    /// Display rotation: 0, 90, 180, 270, cw, ccw, flip
    #[arg(long)]
    rotate: Option<Rotation>,

    /// Log every bus transfer
    #[arg(long)]
    debug: bool,

    /// I2C bus number
    #[arg(long)]
    i2c_dev: Option<u32>,

    /// I2C device address (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_addr)]
    i2c_addr: Option<u16>,

    /// SPI bus number
    #[arg(long)]
    spi_bus: Option<u32>,

    /// SPI chip select
    #[arg(long)]
    spi_dev: Option<u32>,

    /// SPI clock in Hz
    #[arg(long)]
    spi_speed: Option<u32>,

    /// GPIO chip device for the D/C and reset lines
    #[arg(long)]
    gpio_chip: Option<String>,

    /// Data/command GPIO line
    #[arg(long)]
    dc: Option<u32>,

    /// Reset GPIO line
    #[arg(long)]
    reset: Option<u32>,

    /// Number of animation frames to draw
    #[arg(long, default_value = "1")]
    frames: usize,

    /// Write a PNG preview of the final frame
    #[arg(long)]
    png: Option<PathBuf>,

    /// Write the effective configuration to a file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Bus type
    #[arg(value_enum)]
    bus: BusType,

    /// Display driver: ssd1305, ssd1306, sh1106, sh1122, ssd1322, st7735, st7789, gp1294
    driver: Driver,
}

fn parse_addr(s: &str) -> std::result::Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address {:?}: {}", s, e))
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.display.width = width;
        }
        if let Some(height) = self.height {
            config.display.height = height;
        }
        if let Some(rotation) = self.rotate {
            config.display.rotation = rotation;
        }
        if self.debug {
            config.display.debug = true;
        }
        if let Some(dev) = self.i2c_dev {
            config.bus.i2c_dev = dev;
        }
        if let Some(addr) = self.i2c_addr {
            config.bus.i2c_addr = addr;
        }
        if let Some(bus) = self.spi_bus {
            config.bus.spi_bus = bus;
        }
        if let Some(dev) = self.spi_dev {
            config.bus.spi_dev = dev;
        }
        if let Some(speed) = self.spi_speed {
            config.bus.spi_speed = speed;
        }
        if let Some(chip) = &self.gpio_chip {
            config.bus.gpio_chip = chip.clone();
        }
        if let Some(pin) = self.dc {
            config.bus.dc_pin = pin;
        }
        if let Some(pin) = self.reset {
            config.bus.reset_pin = pin;
        }
    }
}

fn open_conn(bus: BusType, config: &Config) -> Result<(Box<dyn Conn>, Option<Recorder>)> {
    match bus {
        BusType::DryRun => {
            let recorder = Recorder::new();
            println!("using connection: {}", recorder);
            Ok((Box::new(recorder.clone()), Some(recorder)))
        }
        #[cfg(target_os = "linux")]
        BusType::I2c => {
            let conn = beatglow_display::I2cConn::open(config.bus.i2c_dev, config.bus.i2c_addr)
                .with_context(|| format!("Failed to open I2C bus {}", config.bus.i2c_dev))?;
            println!("using connection: {}", conn);
            Ok((Box::new(conn), None))
        }
        #[cfg(target_os = "linux")]
        BusType::Spi => {
            let spi = beatglow_display::SpiConfig {
                bus: config.bus.spi_bus,
                device: config.bus.spi_dev,
                speed_hz: config.bus.spi_speed,
                gpio_chip: config.bus.gpio_chip.clone(),
                dc_pin: config.bus.dc_pin,
                reset_pin: Some(config.bus.reset_pin),
            };
            let conn = beatglow_display::SpiConn::open(&spi).with_context(|| {
                format!(
                    "Failed to open SPI device {}.{}",
                    config.bus.spi_bus, config.bus.spi_dev
                )
            })?;
            println!("using connection: {}", conn);
            Ok((Box::new(conn), None))
        }
        #[cfg(not(target_os = "linux"))]
        BusType::I2c | BusType::Spi => {
            let _ = config;
            anyhow::bail!("{:?} is only supported on Linux", bus)
        }
    }
}

fn write_png(surface: &dyn Surface, path: &Path) -> Result<()> {
    let bounds = surface.bounds();
    let file = File::create(path).context("Failed to create PNG file")?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        bounds.width as u32,
        bounds.height as u32,
    );
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().context("Failed to write PNG header")?;
    writer
        .write_image_data(&to_rgba8(surface))
        .context("Failed to write PNG data")?;
    Ok(())
}

fn run(display: &mut dyn Display, frames: usize) -> Result<()> {
    for frame in 0..frames.max(1) {
        if frame > 0 {
            std::thread::sleep(Duration::from_millis(50));
        }
        pattern::draw(display.surface_mut(), frame);
        display.refresh().context("Failed to refresh display")?;
        debug!("Frame {} sent", frame);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };
    cli.apply(&mut config);

    if let Some(path) = &cli.save_config {
        config.save(path)?;
        println!("Configuration saved to {}", path.display());
    }

    let (conn, recorder) = open_conn(cli.bus, &config)?;
    let mut display = cli
        .driver
        .open(conn, &config.display)
        .with_context(|| format!("Failed to initialize {}", cli.driver))?;

    println!("using driver: {}", display);
    println!("using color model: {}", display.color_model());
    println!("using rotation: {}", display.rotation());

    let result = run(&mut *display, cli.frames).and_then(|()| match &cli.png {
        Some(path) => {
            write_png(display.surface(), path)?;
            println!("Preview saved to {}", path.display());
            Ok(())
        }
        None => Ok(()),
    });

    if let Some(recorder) = recorder {
        println!(
            "dry run: {} commands, {} data bytes",
            recorder.command_count(),
            recorder.data_len()
        );
    }

    finish(&mut *display, result)
}

/// Closes the display, keeping the first error.
fn finish(display: &mut dyn Display, result: Result<()>) -> Result<()> {
    let closed = display.close().context("Failed to close display");
    result.and(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr("0x3c"), Ok(0x3C));
        assert_eq!(parse_addr("0X3D"), Ok(0x3D));
        assert_eq!(parse_addr("60"), Ok(60));
        assert!(parse_addr("0xZZ").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let cli = Cli::parse_from([
            "display-test",
            "--width",
            "128",
            "--rotate",
            "flip",
            "--i2c-addr",
            "0x3d",
            "--debug",
            "--dc",
            "22",
            "--spi-speed",
            "40000000",
            "spi",
            "st7735",
        ]);
        let mut config = Config::default();
        config.display.height = 32;
        cli.apply(&mut config);

        assert_eq!(config.display.width, 128);
        assert_eq!(config.display.height, 32);
        assert_eq!(config.display.rotation, Rotation::Rotate180);
        assert!(config.display.debug);
        assert_eq!(config.bus.i2c_addr, 0x3D);
        assert_eq!(config.bus.i2c_dev, 1);
        assert_eq!(config.bus.dc_pin, 22);
        assert_eq!(config.bus.reset_pin, 25);
        assert_eq!(config.bus.spi_speed, 40_000_000);
        assert!(matches!(cli.bus, BusType::Spi));
        assert_eq!(cli.driver, Driver::St7735);
    }

    #[test]
    fn test_dry_run_with_preview() {
        let config = Config::default();
        let (conn, recorder) = open_conn(BusType::DryRun, &config).unwrap();
        let recorder = recorder.unwrap();
        let mut display = Driver::Sh1106.open(conn, &config.display).unwrap();
        let before = recorder.data_len();

        run(&mut *display, 2).unwrap();
        assert_eq!(recorder.data_len() - before, 2 * 128 * 8);

        let path = std::env::temp_dir().join(format!("display-test-{}.png", std::process::id()));
        write_png(display.surface(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        display.close().unwrap();
        assert!(recorder.is_closed());
    }

    #[test]
    fn test_finish_keeps_first_error() {
        let config = Config::default();
        let open = || {
            let recorder = Recorder::new();
            let display = Driver::Ssd1306
                .open(Box::new(recorder.clone()), &config.display)
                .unwrap();
            (recorder, display)
        };

        let (recorder, mut display) = open();
        finish(&mut *display, Ok(())).unwrap();
        assert!(recorder.is_closed());

        // Closing the bus underneath the driver makes its final halt fail.
        let (mut recorder, mut display) = open();
        recorder.close().unwrap();
        let err = finish(&mut *display, Err(anyhow::anyhow!("preview failed"))).unwrap_err();
        assert_eq!(err.to_string(), "preview failed");

        let (mut recorder, mut display) = open();
        recorder.close().unwrap();
        let err = finish(&mut *display, Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "Failed to close display");
    }
}
