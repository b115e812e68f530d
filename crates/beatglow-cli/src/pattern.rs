//! Test pattern.

use beatglow_pixel::draw::{fill_rect, line, rect};
use beatglow_pixel::{Color, Model, Mono, Rgba64, Surface};

fn gray(v: usize) -> Color {
    let v = v.min(255) as u8;
    Color::Rgba(Rgba64::from_rgb8(v, v, v))
}

/// Draws a border, both diagonals and a model-dependent fill shifted by
/// `frame`.
pub fn draw(surface: &mut dyn Surface, frame: usize) {
    let bounds = surface.bounds();
    if bounds.is_empty() {
        return;
    }
    let (w, h) = (bounds.width, bounds.height);
    let on = Color::Rgba(Rgba64::WHITE);

    surface.clear();
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let shifted = x + frame;
            let color = match surface.color_model() {
                Model::Mono => Color::Mono(Mono {
                    on: (shifted + y) % 4 == 0,
                }),
                Model::Gray2 | Model::Gray4 => gray(shifted % w * 256 / w),
                Model::Rgb15 | Model::Rgb16 => {
                    let level = (y * 256 / h).min(255) as u8;
                    match shifted * 3 / w % 3 {
                        0 => Color::Rgba(Rgba64::from_rgb8(level, 0, 0)),
                        1 => Color::Rgba(Rgba64::from_rgb8(0, level, 0)),
                        _ => Color::Rgba(Rgba64::from_rgb8(0, 0, level)),
                    }
                }
            };
            surface.set(x as i32, y as i32, color);
        }
    }

    let (x1, y1) = (w as i32 - 1, h as i32 - 1);
    line(surface, 0, 0, x1, y1, on);
    line(surface, 0, y1, x1, 0, on);
    fill_rect(surface, x1 / 2 - 1, y1 / 2 - 1, 3, 3, on);
    rect(surface, 0, 0, w as i32, h as i32, on);
}
