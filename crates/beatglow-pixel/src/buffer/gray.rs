//! 2-bit and 4-bit grayscale buffers.

use super::{Pixels, Rect};
use crate::color::{Color, Gray2, Gray4, Model, NativeColor, Rgba64};
use crate::surface::Surface;

/// Row-major 2-bit buffer, four pixels per byte, leftmost pixel in bits 6-7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gray2Buffer {
    px: Pixels,
}

impl Gray2Buffer {
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(4);
        Self {
            px: Pixels::new(width, height, stride, stride * height),
        }
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> (usize, u32) {
        (y * self.px.stride + x / 4, ((3 - (x & 3)) << 1) as u32)
    }

    /// Returns the pixel at (x, y), or `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Gray2> {
        let (x, y) = self.px.locate(x, y)?;
        let (index, shift) = self.offset(x, y);
        Some(Gray2::new(self.px.pix[index] >> shift))
    }

    /// Sets the pixel at (x, y); ignored outside the bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Gray2) {
        let Some((x, y)) = self.px.locate(x, y) else {
            return;
        };
        let (index, shift) = self.offset(x, y);
        let byte = &mut self.px.pix[index];
        *byte = (*byte & !(Gray2::MAX << shift)) | (c.y() << shift);
    }
}

impl Surface for Gray2Buffer {
    fn bounds(&self) -> Rect {
        self.px.rect
    }

    fn color_model(&self) -> Model {
        Model::Gray2
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y)
            .map(Color::from)
            .unwrap_or(Color::Rgba(Rgba64::TRANSPARENT))
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, Gray2::from_color(color));
    }

    fn fill(&mut self, color: Color) {
        let y = Gray2::from_color(color).y();
        self.px.stamp(y * 0x55);
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

/// Row-major 4-bit buffer, two pixels per byte, even x in the high nibble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gray4Buffer {
    px: Pixels,
}

impl Gray4Buffer {
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(2);
        Self {
            px: Pixels::new(width, height, stride, stride * height),
        }
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> (usize, u32) {
        let shift = if x % 2 == 0 { 4 } else { 0 };
        (y * self.px.stride + x / 2, shift)
    }

    /// Returns the pixel at (x, y), or `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Gray4> {
        let (x, y) = self.px.locate(x, y)?;
        let (index, shift) = self.offset(x, y);
        Some(Gray4::new(self.px.pix[index] >> shift))
    }

    /// Sets the pixel at (x, y); ignored outside the bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Gray4) {
        let Some((x, y)) = self.px.locate(x, y) else {
            return;
        };
        let (index, shift) = self.offset(x, y);
        let byte = &mut self.px.pix[index];
        *byte = (*byte & !(Gray4::MAX << shift)) | (c.y() << shift);
    }
}

impl Surface for Gray4Buffer {
    fn bounds(&self) -> Rect {
        self.px.rect
    }

    fn color_model(&self) -> Model {
        Model::Gray4
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y)
            .map(Color::from)
            .unwrap_or(Color::Rgba(Rgba64::TRANSPARENT))
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, Gray4::from_color(color));
    }

    fn fill(&mut self, color: Color) {
        let y = Gray4::from_color(color).y();
        self.px.stamp(y | y << 4);
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
