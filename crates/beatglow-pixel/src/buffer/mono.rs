//! 1-bit monochrome buffers.

use super::{Pixels, Rect};
use crate::color::{Color, Model, Mono, NativeColor};
use crate::surface::Surface;

#[inline]
fn fill_byte(c: Mono) -> u8 {
    if c.on {
        0xff
    } else {
        0x00
    }
}

/// Row-major 1-bit buffer; pixel x of a row lives in bit `x % 8` of byte `x / 8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBuffer {
    px: Pixels,
}

impl MonoBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(8);
        Self {
            px: Pixels::new(width, height, stride, stride * height),
        }
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> (usize, u8) {
        (y * self.px.stride + x / 8, 1 << (x % 8))
    }

    /// Returns the pixel at (x, y), or `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Mono> {
        let (x, y) = self.px.locate(x, y)?;
        let (index, bit) = self.offset(x, y);
        Some(Mono {
            on: self.px.pix[index] & bit != 0,
        })
    }

    /// Sets the pixel at (x, y); ignored outside the bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Mono) {
        let Some((x, y)) = self.px.locate(x, y) else {
            return;
        };
        let (index, bit) = self.offset(x, y);
        if c.on {
            self.px.pix[index] |= bit;
        } else {
            self.px.pix[index] &= !bit;
        }
    }
}

impl Surface for MonoBuffer {
    fn bounds(&self) -> Rect {
        self.px.rect
    }

    fn color_model(&self) -> Model {
        Model::Mono
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y).unwrap_or(Mono::OFF).into()
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, Mono::from_color(color));
    }

    fn fill(&mut self, color: Color) {
        self.px.stamp(fill_byte(Mono::from_color(color)));
    }

    fn clear(&mut self) {
        self.px.stamp(0);
    }

    fn pix(&self) -> &[u8] {
        &self.px.pix
    }

    fn stride(&self) -> usize {
        self.px.stride
    }
}

/// Column-banded 1-bit buffer used by SSD1xxx-style controllers.
///
/// Rows are grouped in 8-row bands (controller pages). Within a band each
/// byte holds one column, with the topmost row in the least significant bit.
/// The stride is the width: band `n` starts at byte `n * width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoVerticalLsbBuffer {
    px: Pixels,
}

impl MonoVerticalLsbBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let bands = height.div_ceil(8);
        Self {
            px: Pixels::new(width, height, width, bands * width),
        }
    }

    /// Number of 8-row bands (pages).
    pub fn bands(&self) -> usize {
        self.px.rect.height.div_ceil(8)
    }

    /// Returns the bytes of one band, or an empty slice past the last band.
    pub fn band(&self, band: usize) -> &[u8] {
        let stride = self.px.stride;
        band.checked_mul(stride)
            .and_then(|start| Some(start..start.checked_add(stride)?))
            .and_then(|range| self.px.pix.get(range))
            .unwrap_or_default()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> (usize, u8) {
        ((y / 8) * self.px.stride + x, 1 << (y & 7))
    }

    /// Returns the pixel at (x, y), or `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Mono> {
        let (x, y) = self.px.locate(x, y)?;
        let (index, bit) = self.offset(x, y);
        Some(Mono {
            on: self.px.pix[index] & bit != 0,
        })
    }

    /// Sets the pixel at (x, y); ignored outside the bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Mono) {
        let Some((x, y)) = self.px.locate(x, y) else {
            return;
        };
        let (index, bit) = self.offset(x, y);
        if c.on {
            self.px.pix[index] |= bit;
        } else {
            self.px.pix[index] &= !bit;
        }
    }
}

impl Surface for MonoVerticalLsbBuffer {
    fn bounds(&self) -> Rect {
        self.px.rect
    }

    fn color_model(&self) -> Model {
        Model::Mono
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y).unwrap_or(Mono::OFF).into()
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, Mono::from_color(color));
    }

    fn fill(&mut self, color: Color) {
        self.px.stamp(fill_byte(Mono::from_color(color)));
    }

    fn clear(&mut self) {
        self.px.stamp(0);
    }

    fn pix(&self) -> &[u8] {
        &self.px.pix
    }

    fn stride(&self) -> usize {
        self.px.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_packing() {
        let mut buf = MonoBuffer::new(16, 2);
        assert_eq!(buf.stride(), 2);
        buf.set_pixel(0, 0, Mono::ON);
        buf.set_pixel(9, 1, Mono::ON);
        assert_eq!(buf.pix(), &[0x01, 0x00, 0x00, 0x02]);

        buf.set_pixel(0, 0, Mono::OFF);
        assert_eq!(buf.pix()[0], 0x00);
        assert_eq!(buf.pixel(9, 1), Some(Mono::ON));
    }

    #[test]
    fn test_mono_partial_byte_stride() {
        let buf = MonoBuffer::new(9, 3);
        assert_eq!(buf.stride(), 2);
        assert_eq!(buf.pix().len(), 6);
    }

    #[test]
    fn test_vertical_first_pixel() {
        let mut buf = MonoVerticalLsbBuffer::new(128, 64);
        buf.set(0, 0, Mono::ON.into());
        assert_eq!(buf.pix()[0], 0x01);
        assert!(buf.pix()[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_vertical_last_row_of_band() {
        let mut buf = MonoVerticalLsbBuffer::new(128, 64);
        buf.set(0, 7, Mono::ON.into());
        assert_eq!(buf.pix()[0], 0x80);
        assert!(buf.pix()[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_vertical_band_addressing() {
        let mut buf = MonoVerticalLsbBuffer::new(128, 64);
        assert_eq!(buf.bands(), 8);
        buf.set_pixel(5, 8, Mono::ON);
        buf.set_pixel(127, 63, Mono::ON);
        assert_eq!(buf.pix()[128 + 5], 0x01);
        assert_eq!(buf.pix()[7 * 128 + 127], 0x80);
        assert_eq!(buf.band(1)[5], 0x01);
        assert!(buf.band(8).is_empty());
    }

    #[test]
    fn test_vertical_band_far_past_end() {
        let buf = MonoVerticalLsbBuffer::new(128, 64);
        assert!(buf.band(usize::MAX / 64).is_empty());
        assert!(buf.band(usize::MAX).is_empty());
    }

    #[test]
    fn test_vertical_partial_band() {
        let buf = MonoVerticalLsbBuffer::new(96, 12);
        assert_eq!(buf.bands(), 2);
        assert_eq!(buf.pix().len(), 192);
        assert_eq!(buf.stride(), 96);
    }

    #[test]
    fn test_out_of_bounds_sentinel() {
        let buf = MonoVerticalLsbBuffer::new(8, 8);
        assert_eq!(buf.at(8, 0), Color::Mono(Mono::OFF));
        assert_eq!(buf.at(-1, 0), Color::Mono(Mono::OFF));
        assert_eq!(buf.pixel(0, 8), None);
        let buf = MonoBuffer::new(8, 8);
        assert_eq!(buf.at(0, -3), Color::Mono(Mono::OFF));
    }

    #[test]
    fn test_fill_bytes() {
        let mut buf = MonoVerticalLsbBuffer::new(4, 16);
        buf.fill(Mono::ON.into());
        assert!(buf.pix().iter().all(|&b| b == 0xff));
        buf.fill(Mono::OFF.into());
        assert!(buf.pix().iter().all(|&b| b == 0x00));
    }
}
