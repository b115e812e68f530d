//! Format-independent drawing surface.

use crate::buffer::Rect;
use crate::color::{Color, Model};

/// A pixel surface that can be drawn on without knowing its packed format.
///
/// Coordinates are signed so callers may draw partly off-surface: `set`
/// outside the bounds does nothing and `at` outside the bounds returns the
/// surface's sentinel (`Mono::OFF` for mono formats, transparent otherwise).
pub trait Surface {
    /// Bounds of the surface; the origin is always (0, 0).
    fn bounds(&self) -> Rect;

    /// Model that colors are converted through on `set` and `fill`.
    fn color_model(&self) -> Model;

    /// Returns the native color at (x, y).
    fn at(&self, x: i32, y: i32) -> Color;

    /// Converts `color` through the surface's model and stores it at (x, y).
    fn set(&mut self, x: i32, y: i32, color: Color);

    /// Sets every pixel to `color`.
    fn fill(&mut self, color: Color);

    /// Zeroes the buffer (all pixels off / black).
    fn clear(&mut self);

    /// Raw packed bytes, in wire order.
    fn pix(&self) -> &[u8];

    /// Bytes between vertically adjacent pixel rows (or bands).
    fn stride(&self) -> usize;
}

fn extent(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Copies `src` onto `dst` with its origin at (x, y), clipping to `dst`.
pub fn blit(dst: &mut dyn Surface, src: &dyn Surface, x: i32, y: i32) {
    let bounds = src.bounds();
    for sy in 0..extent(bounds.height) {
        for sx in 0..extent(bounds.width) {
            dst.set(x.saturating_add(sx), y.saturating_add(sy), src.at(sx, sy));
        }
    }
}

/// Renders a surface to row-major RGBA8 bytes.
pub fn to_rgba8(surface: &dyn Surface) -> Vec<u8> {
    let bounds = surface.bounds();
    let mut rgba = Vec::with_capacity(bounds.width * bounds.height * 4);
    for y in 0..extent(bounds.height) {
        for x in 0..extent(bounds.width) {
            let c = surface.at(x, y).to_rgba();
            let (r, g, b) = c.to_rgb8();
            rgba.extend_from_slice(&[r, g, b, (c.a >> 8) as u8]);
        }
    }
    rgba
}

/// Returns a copy of `pix` with the bit order of every byte reversed, for
/// controllers that shift data in LSB-first.
pub fn reverse_bits(pix: &[u8]) -> Vec<u8> {
    pix.iter().map(|b| b.reverse_bits()).collect()
}
