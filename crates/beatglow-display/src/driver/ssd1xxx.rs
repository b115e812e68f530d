//! Command set shared by the SSD1305, SSD1306 and SH1106 page-addressed
//! controllers.

use crate::conn::{SpiMode, SpiSettings, DEFAULT_SPI_SPEED_HZ};

/// These controllers take command arguments with D/C low.
pub const SPI_SETTINGS: SpiSettings = SpiSettings {
    mode: SpiMode::Mode0,
    max_speed_hz: DEFAULT_SPI_SPEED_HZ,
    args_as_data: false,
};

pub const SET_LOW_COLUMN: u8 = 0x00;
pub const SET_HIGH_COLUMN: u8 = 0x10;
pub const SET_MEMORY_MODE: u8 = 0x20;
pub const SET_COLUMN_ADDR: u8 = 0x21;
pub const SET_PAGE_ADDR: u8 = 0x22;
pub const SET_START_LINE: u8 = 0x40;
pub const SET_CONTRAST: u8 = 0x81;
pub const SET_CHARGE_PUMP: u8 = 0x8D;
pub const SET_SEGMENT_REMAP: u8 = 0xA1;
pub const SET_DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
pub const SET_NORMAL_DISPLAY: u8 = 0xA6;
pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;
pub const SET_DISPLAY_OFF: u8 = 0xAE;
pub const SET_DISPLAY_ON: u8 = 0xAF;
/// Page start address for page addressing mode; OR in the page number.
pub const SET_PAGE_START: u8 = 0xB0;
pub const SET_COM_SCAN_DEC: u8 = 0xC8;
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
pub const SET_PRECHARGE: u8 = 0xD9;
pub const SET_COM_PINS: u8 = 0xDA;
pub const SET_VCOM_DESELECT: u8 = 0xDB;

