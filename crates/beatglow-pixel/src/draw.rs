//! Simple shapes drawn through the [`Surface`] contract.
//!
//! All coordinates are signed; anything outside the surface is clipped by
//! `Surface::set`.

use crate::color::Color;
use crate::surface::Surface;

/// Draws a line from (x0, y0) to (x1, y1), both ends included.
pub fn line(dst: &mut dyn Surface, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let dx = (i64::from(x1) - i64::from(x0)).abs();
    let dy = -(i64::from(y1) - i64::from(y0)).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        dst.set(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draws the outline of a `width` x `height` rectangle at (x, y).
pub fn rect(dst: &mut dyn Surface, x: i32, y: i32, width: i32, height: i32, color: Color) {
    if width <= 0 || height <= 0 {
        return;
    }
    let x1 = x.saturating_add(width - 1);
    let y1 = y.saturating_add(height - 1);
    // Edges are clipped strips so off-surface spans cost nothing.
    fill_rect(dst, x, y, width, 1, color);
    fill_rect(dst, x, y1, width, 1, color);
    fill_rect(dst, x, y, 1, height, color);
    fill_rect(dst, x1, y, 1, height, color);
}

/// Fills a `width` x `height` rectangle at (x, y).
pub fn fill_rect(dst: &mut dyn Surface, x: i32, y: i32, width: i32, height: i32, color: Color) {
    let bounds = dst.bounds();
    let clip = |v: i32, max: usize| v.clamp(0, i32::try_from(max).unwrap_or(i32::MAX));
    let (x0, x1) = (clip(x, bounds.width), clip(x.saturating_add(width), bounds.width));
    let (y0, y1) = (clip(y, bounds.height), clip(y.saturating_add(height), bounds.height));
    for py in y0..y1 {
        for px in x0..x1 {
            dst.set(px, py, color);
        }
    }
}
