//! BeatGlow Pixel Library
//!
//! Color models and packed pixel buffers for small OLED, VFD and LCD
//! panels. Every buffer keeps its bytes in the exact layout the display
//! controller expects, so drivers can stream [`Surface::pix`] to the bus
//! without conversion.

pub mod buffer;
pub mod color;
pub mod draw;
pub mod error;
pub mod surface;

pub use buffer::{
    ByteOrder, ChannelOrder, Gray2Buffer, Gray4Buffer, MonoBuffer, MonoVerticalLsbBuffer, Rect,
    Rgb15Buffer, Rgb16Buffer,
};
pub use color::{Color, Gray2, Gray4, Model, Mono, NativeColor, Rgb15, Rgb16, Rgba64};
pub use error::{Error, Result};
pub use surface::{blit, reverse_bits, to_rgba8, Surface};
