//! 15-bit and 16-bit RGB buffers.
//!
//! Pixels are stored as one 16-bit word each, row-major, in the byte order
//! chosen at construction. BGR-wired panels swap the red and blue fields on
//! the wire; values passed in and out of the buffer are always RGB-major.

use super::{ByteOrder, ChannelOrder, Pixels, Rect};
use crate::color::{Color, Model, NativeColor, Rgb15, Rgb16, Rgba64};
use crate::surface::Surface;

/// Word storage shared by the 15-bit and 16-bit formats.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Words {
    px: Pixels,
    order: ByteOrder,
    channels: ChannelOrder,
}

impl Words {
    fn new(width: usize, height: usize, order: ByteOrder, channels: ChannelOrder) -> Self {
        let stride = width * 2;
        Self {
            px: Pixels::new(width, height, stride, stride * height),
            order,
            channels,
        }
    }

    fn read(&self, x: i32, y: i32) -> Option<u16> {
        let (x, y) = self.px.locate(x, y)?;
        let i = y * self.px.stride + x * 2;
        Some(self.order.decode([self.px.pix[i], self.px.pix[i + 1]]))
    }

    fn write(&mut self, x: i32, y: i32, word: u16) {
        let Some((x, y)) = self.px.locate(x, y) else {
            return;
        };
        let i = y * self.px.stride + x * 2;
        self.px.pix[i..i + 2].copy_from_slice(&self.order.encode(word));
    }

    fn stamp(&mut self, word: u16) {
        let bytes = self.order.encode(word);
        for chunk in self.px.pix.chunks_exact_mut(2) {
            chunk.copy_from_slice(&bytes);
        }
    }
}

/// 5-5-5 RGB buffer, two bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgb15Buffer {
    words: Words,
}

impl Rgb15Buffer {
    /// Creates an RGB-ordered buffer with the given byte order.
    pub fn new(width: usize, height: usize, order: ByteOrder) -> Self {
        Self::with_channels(width, height, order, ChannelOrder::Rgb)
    }

    pub fn with_channels(
        width: usize,
        height: usize,
        order: ByteOrder,
        channels: ChannelOrder,
    ) -> Self {
        Self {
            words: Words::new(width, height, order, channels),
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.words.order
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.words.channels
    }

    fn wire(&self, c: Rgb15) -> Rgb15 {
        match self.words.channels {
            ChannelOrder::Rgb => c,
            ChannelOrder::Bgr => c.swap_red_blue(),
        }
    }

    /// Returns the pixel at (x, y), or `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb15> {
        self.words.read(x, y).map(|v| self.wire(Rgb15::new(v)))
    }

    /// Sets the pixel at (x, y); ignored outside the bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Rgb15) {
        let word = self.wire(c).value();
        self.words.write(x, y, word);
    }
}

impl Surface for Rgb15Buffer {
    fn bounds(&self) -> Rect {
        self.words.px.rect
    }

    fn color_model(&self) -> Model {
        Model::Rgb15
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y)
            .map(Color::from)
            .unwrap_or(Color::Rgba(Rgba64::TRANSPARENT))
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, Rgb15::from_color(color));
    }

    fn fill(&mut self, color: Color) {
        let word = self.wire(Rgb15::from_color(color)).value();
        self.words.stamp(word);
    }

    fn clear(&mut self) {
        self.words.px.stamp(0);
    }

    fn pix(&self) -> &[u8] {
        &self.words.px.pix
    }

    fn stride(&self) -> usize {
        self.words.px.stride
    }
}

/// 5-6-5 RGB buffer, two bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgb16Buffer {
    words: Words,
}

impl Rgb16Buffer {
    /// Creates an RGB-ordered buffer with the given byte order.
    pub fn new(width: usize, height: usize, order: ByteOrder) -> Self {
        Self::with_channels(width, height, order, ChannelOrder::Rgb)
    }

    pub fn with_channels(
        width: usize,
        height: usize,
        order: ByteOrder,
        channels: ChannelOrder,
    ) -> Self {
        Self {
            words: Words::new(width, height, order, channels),
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.words.order
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.words.channels
    }

    fn wire(&self, c: Rgb16) -> Rgb16 {
        match self.words.channels {
            ChannelOrder::Rgb => c,
            ChannelOrder::Bgr => c.swap_red_blue(),
        }
    }

    /// Returns the pixel at (x, y), or `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb16> {
        self.words.read(x, y).map(|v| self.wire(Rgb16::new(v)))
    }

    /// Sets the pixel at (x, y); ignored outside the bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Rgb16) {
        let word = self.wire(c).value();
        self.words.write(x, y, word);
    }
}

impl Surface for Rgb16Buffer {
    fn bounds(&self) -> Rect {
        self.words.px.rect
    }

    fn color_model(&self) -> Model {
        Model::Rgb16
    }

    fn at(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y)
            .map(Color::from)
            .unwrap_or(Color::Rgba(Rgba64::TRANSPARENT))
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, Rgb16::from_color(color));
    }

    fn fill(&mut self, color: Color) {
        let word = self.wire(Rgb16::from_color(color)).value();
        self.words.stamp(word);
    }

    fn clear(&mut self) {
        self.words.px.stamp(0);
    }

    fn pix(&self) -> &[u8] {
        &self.words.px.pix
    }

    fn stride(&self) -> usize {
        self.words.px.stride
    }
}
