//! Native color values and the models that convert between them.
//!
//! Every native value converts to a canonical [`Rgba64`] (four 16-bit
//! channels). A [`Model`] converts any [`Color`] into its native encoding;
//! values already in the target encoding pass through untouched.

use crate::{Error, Result};

/// Canonical color with four 16-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba64 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Rgba64 {
    /// Fully transparent; returned for out-of-bounds reads on gray and RGB buffers.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(0xffff, 0xffff, 0xffff);

    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn opaque(r: u16, g: u16, b: u16) -> Self {
        Self::new(r, g, b, 0xffff)
    }

    /// Creates an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let wide = |c: u8| u16::from(c) * 0x0101;
        Self::opaque(wide(r), wide(g), wide(b))
    }

    /// Returns the top 8 bits of each color channel.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        ((self.r >> 8) as u8, (self.g >> 8) as u8, (self.b >> 8) as u8)
    }

    /// BT.601 luma in the 16-bit range, rounded to nearest.
    fn luma(self) -> u32 {
        let (r, g, b) = (u32::from(self.r), u32::from(self.g), u32::from(self.b));
        (299 * r + 587 * g + 114 * b + 500) / 1000
    }
}

/// Left-aligns an n-bit field in 16 bits and repeats its high bits into the
/// vacated low bits, so the maximum field value maps to 0xffff.
const fn widen(value: u16, bits: u32) -> u16 {
    let mut out = value << (16 - bits);
    let mut filled = bits;
    while filled < 16 {
        out |= out >> filled;
        filled *= 2;
    }
    out
}

/// A color in one of the native encodings, or a canonical RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Mono(Mono),
    Gray2(Gray2),
    Gray4(Gray4),
    Rgb15(Rgb15),
    Rgb16(Rgb16),
    Rgba(Rgba64),
}

impl Color {
    /// Converts to the canonical RGBA representation.
    pub fn to_rgba(self) -> Rgba64 {
        match self {
            Color::Mono(c) => c.to_rgba(),
            Color::Gray2(c) => c.to_rgba(),
            Color::Gray4(c) => c.to_rgba(),
            Color::Rgb15(c) => c.to_rgba(),
            Color::Rgb16(c) => c.to_rgba(),
            Color::Rgba(c) => c,
        }
    }

    /// Parses an opaque `#rrggbb` (or `rrggbb`) color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::InvalidHexColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::InvalidHexColor(hex.to_string()))
        };
        Ok(Color::Rgba(Rgba64::from_rgb8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        )))
    }
}

impl From<Rgba64> for Color {
    fn from(c: Rgba64) -> Self {
        Color::Rgba(c)
    }
}

/// A color type with a native packed encoding.
pub trait NativeColor: Copy + Into<Color> {
    /// The model that produces this color type.
    const MODEL: Model;

    /// Converts any color into this encoding.
    fn from_color(color: Color) -> Self;

    /// Converts to the canonical RGBA representation.
    fn to_rgba(self) -> Rgba64;
}

/// 1-bit monochrome color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mono {
    pub on: bool,
}

impl Mono {
    pub const OFF: Self = Self { on: false };
    pub const ON: Self = Self { on: true };
}

impl NativeColor for Mono {
    const MODEL: Model = Model::Mono;

    fn from_color(color: Color) -> Self {
        if let Color::Mono(c) = color {
            return c;
        }
        let c = color.to_rgba();
        let (r, g, b) = (u32::from(c.r), u32::from(c.g), u32::from(c.b));
        // 19595 + 38470 + 7471 == 65536; shifting by 16 + 15 leaves one bit.
        let y = (19595 * r + 38470 * g + 7471 * b + (1 << 15)) >> 31;
        Mono { on: y != 0 }
    }

    fn to_rgba(self) -> Rgba64 {
        if self.on {
            Rgba64::WHITE
        } else {
            Rgba64::BLACK
        }
    }
}

/// 2-bit grayscale color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gray2(u8);

impl Gray2 {
    pub const MAX: u8 = 0x3;

    /// Creates a gray value; bits above the low two are dropped.
    pub const fn new(y: u8) -> Self {
        Self(y & Self::MAX)
    }

    pub const fn y(self) -> u8 {
        self.0
    }
}

impl NativeColor for Gray2 {
    const MODEL: Model = Model::Gray2;

    fn from_color(color: Color) -> Self {
        if let Color::Gray2(c) = color {
            return c;
        }
        Gray2::new((color.to_rgba().luma() >> 14) as u8)
    }

    fn to_rgba(self) -> Rgba64 {
        let y = widen(u16::from(self.0), 2);
        Rgba64::opaque(y, y, y)
    }
}

/// 4-bit grayscale color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gray4(u8);

impl Gray4 {
    pub const MAX: u8 = 0xf;

    /// Creates a gray value; bits above the low nibble are dropped.
    pub const fn new(y: u8) -> Self {
        Self(y & Self::MAX)
    }

    pub const fn y(self) -> u8 {
        self.0
    }
}

impl NativeColor for Gray4 {
    const MODEL: Model = Model::Gray4;

    fn from_color(color: Color) -> Self {
        if let Color::Gray4(c) = color {
            return c;
        }
        Gray4::new((color.to_rgba().luma() >> 12) as u8)
    }

    fn to_rgba(self) -> Rgba64 {
        let y = widen(u16::from(self.0), 4);
        Rgba64::opaque(y, y, y)
    }
}

/// 15-bit 5-5-5 RGB color; bit 15 is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb15(u16);

impl Rgb15 {
    pub const fn new(v: u16) -> Self {
        Self(v & 0x7fff)
    }

    /// Packs 5-bit channels.
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self::new(((r as u16 & 0x1f) << 10) | ((g as u16 & 0x1f) << 5) | (b as u16 & 0x1f))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// Swaps the red and blue fields.
    pub const fn swap_red_blue(self) -> Self {
        let v = self.0;
        Self(((v & 0x001f) << 10) | (v & 0x03e0) | ((v >> 10) & 0x001f))
    }
}

impl NativeColor for Rgb15 {
    const MODEL: Model = Model::Rgb15;

    fn from_color(color: Color) -> Self {
        if let Color::Rgb15(c) = color {
            return c;
        }
        let c = color.to_rgba();
        Rgb15::new(((c.r >> 11) << 10) | ((c.g >> 11) << 5) | (c.b >> 11))
    }

    fn to_rgba(self) -> Rgba64 {
        let v = self.0;
        Rgba64::opaque(
            widen((v >> 10) & 0x1f, 5),
            widen((v >> 5) & 0x1f, 5),
            widen(v & 0x1f, 5),
        )
    }
}

/// 16-bit 5-6-5 RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb16(u16);

impl Rgb16 {
    pub const fn new(v: u16) -> Self {
        Self(v)
    }

    /// Packs 5-bit red, 6-bit green and 5-bit blue channels.
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0x1f) << 11) | ((g as u16 & 0x3f) << 5) | (b as u16 & 0x1f))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// Swaps the red and blue fields.
    pub const fn swap_red_blue(self) -> Self {
        let v = self.0;
        Self(((v & 0x001f) << 11) | (v & 0x07e0) | (v >> 11))
    }

    /// Direct gray conversion; matches the RGBA-routed path bit for bit.
    fn from_gray4(c: Gray4) -> Self {
        let y = u16::from(c.y());
        let r = (y << 1) | (y >> 3);
        let g = (y << 2) | (y >> 2);
        Rgb16((r << 11) | (g << 5) | r)
    }
}

impl NativeColor for Rgb16 {
    const MODEL: Model = Model::Rgb16;

    fn from_color(color: Color) -> Self {
        match color {
            Color::Rgb16(c) => c,
            Color::Mono(Mono { on: true }) => Rgb16(0xffff),
            Color::Mono(Mono { on: false }) => Rgb16(0),
            Color::Gray4(c) => Rgb16::from_gray4(c),
            other => {
                let c = other.to_rgba();
                Rgb16(((c.r >> 11) << 11) | ((c.g >> 10) << 5) | (c.b >> 11))
            }
        }
    }

    fn to_rgba(self) -> Rgba64 {
        let v = self.0;
        Rgba64::opaque(
            widen(v >> 11, 5),
            widen((v >> 5) & 0x3f, 6),
            widen(v & 0x1f, 5),
        )
    }
}

macro_rules! impl_into_color {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Color {
                fn from(c: $ty) -> Self {
                    Color::$ty(c)
                }
            }
        )*
    };
}

impl_into_color!(Mono, Gray2, Gray4, Rgb15, Rgb16);

/// Color model of a native encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Mono,
    Gray2,
    Gray4,
    Rgb15,
    Rgb16,
}

impl Model {
    /// Converts a color into this model's native encoding.
    pub fn convert(self, color: Color) -> Color {
        match self {
            Model::Mono => Mono::from_color(color).into(),
            Model::Gray2 => Gray2::from_color(color).into(),
            Model::Gray4 => Gray4::from_color(color).into(),
            Model::Rgb15 => Rgb15::from_color(color).into(),
            Model::Rgb16 => Rgb16::from_color(color).into(),
        }
    }

    /// Bits used per pixel by this model.
    pub fn bits_per_pixel(self) -> usize {
        match self {
            Model::Mono => 1,
            Model::Gray2 => 2,
            Model::Gray4 => 4,
            Model::Rgb15 | Model::Rgb16 => 16,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::Mono => write!(f, "mono"),
            Model::Gray2 => write!(f, "gray2"),
            Model::Gray4 => write!(f, "gray4"),
            Model::Rgb15 => write!(f, "rgb15"),
            Model::Rgb16 => write!(f, "rgb16"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_to_rgba() {
        assert_eq!(Mono::ON.to_rgba(), Rgba64::new(0xffff, 0xffff, 0xffff, 0xffff));
        assert_eq!(Mono::OFF.to_rgba(), Rgba64::new(0, 0, 0, 0xffff));
    }

    #[test]
    fn test_gray_replication() {
        for y in 0..16u16 {
            let want = y | y << 4 | y << 8 | y << 12;
            let c = Gray4::new(y as u8).to_rgba();
            assert_eq!((c.r, c.g, c.b, c.a), (want, want, want, 0xffff));
        }
        let expected = [0x0000, 0x5555, 0xaaaa, 0xffff];
        for (y, want) in expected.iter().enumerate() {
            assert_eq!(Gray2::new(y as u8).to_rgba().g, *want);
        }
    }

    #[test]
    fn test_rgb_widening() {
        assert_eq!(Rgb16::new(0xffff).to_rgba(), Rgba64::WHITE);
        assert_eq!(Rgb16::new(0).to_rgba(), Rgba64::BLACK);
        assert_eq!(Rgb15::new(0x7fff).to_rgba(), Rgba64::WHITE);

        let c = Rgb16::new(0xf800).to_rgba();
        assert_eq!((c.r, c.g, c.b), (0xffff, 0, 0));
        let c = Rgb16::new(0x07e0).to_rgba();
        assert_eq!((c.r, c.g, c.b), (0, 0xffff, 0));
        let c = Rgb15::new(0x001f).to_rgba();
        assert_eq!((c.r, c.g, c.b), (0, 0, 0xffff));
    }

    #[test]
    fn test_round_trip_identity() {
        for on in [false, true] {
            let c = Mono { on };
            assert_eq!(Mono::from_color(Color::Rgba(c.to_rgba())), c);
        }
        for y in 0..=Gray2::MAX {
            let c = Gray2::new(y);
            assert_eq!(Gray2::from_color(Color::Rgba(c.to_rgba())), c);
        }
        for y in 0..=Gray4::MAX {
            let c = Gray4::new(y);
            assert_eq!(Gray4::from_color(Color::Rgba(c.to_rgba())), c);
        }
        for v in 0..=0x7fffu16 {
            let c = Rgb15::new(v);
            assert_eq!(Rgb15::from_color(Color::Rgba(c.to_rgba())), c);
        }
        for v in 0..=0xffffu16 {
            let c = Rgb16::new(v);
            assert_eq!(Rgb16::from_color(Color::Rgba(c.to_rgba())), c);
        }
    }

    #[test]
    fn test_same_model_pass_through() {
        let c = Color::Gray4(Gray4::new(7));
        assert_eq!(Model::Gray4.convert(c), c);
        let c = Color::Rgb15(Rgb15::new(0x1234));
        assert_eq!(Model::Rgb15.convert(c), c);
    }

    #[test]
    fn test_mono_through_gray4() {
        let gray = Model::Gray4.convert(Mono::ON.into());
        assert_eq!(gray, Color::Gray4(Gray4::new(15)));
        assert_eq!(Model::Mono.convert(gray), Color::Mono(Mono::ON));
        assert_eq!(Model::Gray4.convert(Mono::OFF.into()), Color::Gray4(Gray4::new(0)));
    }

    #[test]
    fn test_luma_threshold() {
        let dark = Rgba64::opaque(0x7fff, 0x7fff, 0x7fff);
        let light = Rgba64::opaque(0x8000, 0x8000, 0x8000);
        assert_eq!(Mono::from_color(dark.into()), Mono::OFF);
        assert_eq!(Mono::from_color(light.into()), Mono::ON);
        // Pure green carries most of the luma.
        assert_eq!(Mono::from_color(Rgba64::opaque(0, 0xffff, 0).into()), Mono::ON);
        assert_eq!(Mono::from_color(Rgba64::opaque(0, 0, 0xffff).into()), Mono::OFF);
        assert_eq!(Mono::from_color(Rgba64::TRANSPARENT.into()), Mono::OFF);
    }

    #[test]
    fn test_gray_quantization() {
        assert_eq!(Gray4::from_color(Rgba64::WHITE.into()), Gray4::new(15));
        assert_eq!(Gray2::from_color(Rgba64::WHITE.into()), Gray2::new(3));
        assert_eq!(Gray4::from_color(Rgba64::opaque(0x8000, 0x8000, 0x8000).into()), Gray4::new(8));
        assert_eq!(Gray2::from_color(Rgba64::opaque(0x8000, 0x8000, 0x8000).into()), Gray2::new(2));
    }

    #[test]
    fn test_rgb16_from_rgb8() {
        let convert = |r, g, b| Rgb16::from_color(Rgba64::from_rgb8(r, g, b).into()).value();
        assert_eq!(convert(255, 0, 0), 0xF800);
        assert_eq!(convert(0, 255, 0), 0x07E0);
        assert_eq!(convert(0, 0, 255), 0x001F);
        assert_eq!(convert(255, 255, 255), 0xFFFF);
        assert_eq!(convert(0, 0, 0), 0x0000);
    }

    #[test]
    fn test_rgb15_from_rgb8() {
        let convert = |r, g, b| Rgb15::from_color(Rgba64::from_rgb8(r, g, b).into()).value();
        assert_eq!(convert(255, 0, 0), 0x7C00);
        assert_eq!(convert(0, 255, 0), 0x03E0);
        assert_eq!(convert(0, 0, 255), 0x001F);
    }

    #[test]
    fn test_rgb16_direct_path_matches_generic() {
        for y in 0..=Gray4::MAX {
            let gray = Gray4::new(y);
            let generic = Rgb16::from_color(Color::Rgba(gray.to_rgba()));
            assert_eq!(Rgb16::from_color(gray.into()), generic, "gray4 {}", y);
        }
        for mono in [Mono::OFF, Mono::ON] {
            let generic = Rgb16::from_color(Color::Rgba(mono.to_rgba()));
            assert_eq!(Rgb16::from_color(mono.into()), generic);
        }
    }

    #[test]
    fn test_swap_red_blue() {
        assert_eq!(Rgb16::new(0xf800).swap_red_blue(), Rgb16::new(0x001f));
        assert_eq!(Rgb16::new(0x07e0).swap_red_blue(), Rgb16::new(0x07e0));
        assert_eq!(Rgb15::new(0x7c00).swap_red_blue(), Rgb15::new(0x001f));
        assert_eq!(Rgb15::new(0x1234).swap_red_blue().swap_red_blue(), Rgb15::new(0x1234));
    }

    #[test]
    fn test_from_channels() {
        assert_eq!(Rgb16::from_channels(0x1f, 0, 0), Rgb16::new(0xf800));
        assert_eq!(Rgb16::from_channels(0, 0x3f, 0), Rgb16::new(0x07e0));
        assert_eq!(Rgb15::from_channels(0, 0x1f, 0), Rgb15::new(0x03e0));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(
            Color::from_hex("#FF0000").unwrap(),
            Color::Rgba(Rgba64::opaque(0xffff, 0, 0))
        );
        assert_eq!(
            Color::from_hex("00ff00").unwrap().to_rgba().to_rgb8(),
            (0, 255, 0)
        );
        assert!(Color::from_hex("invalid").is_err());
        assert!(Color::from_hex("#12345").is_err());
    }

    #[test]
    fn test_native_value_masking() {
        assert_eq!(Gray4::new(0x1f).y(), 0xf);
        assert_eq!(Gray2::new(0x7).y(), 0x3);
        assert_eq!(Rgb15::new(0xffff).value(), 0x7fff);
    }
}
