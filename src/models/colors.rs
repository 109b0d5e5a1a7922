use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully opaque, in the fixed-point percentage representation used by DrawingML
/// (`<a:alpha val="..."/>`), where 100000 equals 100%.
pub const OPAQUE_ALPHA: u32 = 100_000;

/// An RGB color with 8-bit channels.
/// Rendered as the six hex digits DrawingML expects in `<a:srgbClr val="RRGGBB"/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RgbColor {
    /// The red component of the color, from 0 to 255.
    pub red: u8,
    /// The green component of the color, from 0 to 255.
    pub green: u8,
    /// The blue component of the color, from 0 to 255.
    pub blue: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Builds a color from normalized channels in `[0, 1]`, as stored in the named-color palette.
    pub fn from_unit(red: f32, green: f32, blue: f32) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_byte(red), to_byte(green), to_byte(blue))
    }

    /// Returns the `RRGGBB` form used in `srgbClr` values.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// A color together with its opacity, as produced by the color resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColor {
    /// The opaque RGB part of the color.
    pub rgb: RgbColor,
    /// Opacity from 0 (transparent) to 100000 (fully opaque).
    pub alpha: u32,
}

impl ResolvedColor {
    /// Opaque black, the fallback for any color token that cannot be resolved.
    pub const BLACK: ResolvedColor = ResolvedColor {
        rgb: RgbColor::BLACK,
        alpha: OPAQUE_ALPHA,
    };

    pub fn opaque(rgb: RgbColor) -> Self {
        Self {
            rgb,
            alpha: OPAQUE_ALPHA,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= OPAQUE_ALPHA
    }
}
