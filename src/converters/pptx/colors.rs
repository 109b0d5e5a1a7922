//! Color resolution: turns SVG color tokens into an RGB value plus a DrawingML opacity.

use log::debug;
use phf::phf_map;

use super::error::{ConversionError, Result};
use crate::models::colors::{ResolvedColor, RgbColor, OPAQUE_ALPHA};

/// CSS named colors as RGBA bytes.
static NAMED_COLORS: phf::Map<&'static str, [u8; 4]> = phf_map! {
    "aliceblue" => [0xF0, 0xF8, 0xFF, 0xFF],
    "antiquewhite" => [0xFA, 0xEB, 0xD7, 0xFF],
    "aqua" => [0x00, 0xFF, 0xFF, 0xFF],
    "aquamarine" => [0x7F, 0xFF, 0xD4, 0xFF],
    "azure" => [0xF0, 0xFF, 0xFF, 0xFF],
    "beige" => [0xF5, 0xF5, 0xDC, 0xFF],
    "bisque" => [0xFF, 0xE4, 0xC4, 0xFF],
    "black" => [0x00, 0x00, 0x00, 0xFF],
    "blanchedalmond" => [0xFF, 0xEB, 0xCD, 0xFF],
    "blue" => [0x00, 0x00, 0xFF, 0xFF],
    "blueviolet" => [0x8A, 0x2B, 0xE2, 0xFF],
    "brown" => [0xA5, 0x2A, 0x2A, 0xFF],
    "burlywood" => [0xDE, 0xB8, 0x87, 0xFF],
    "cadetblue" => [0x5F, 0x9E, 0xA0, 0xFF],
    "chartreuse" => [0x7F, 0xFF, 0x00, 0xFF],
    "chocolate" => [0xD2, 0x69, 0x1E, 0xFF],
    "coral" => [0xFF, 0x7F, 0x50, 0xFF],
    "cornflowerblue" => [0x64, 0x95, 0xED, 0xFF],
    "cornsilk" => [0xFF, 0xF8, 0xDC, 0xFF],
    "crimson" => [0xDC, 0x14, 0x3C, 0xFF],
    "cyan" => [0x00, 0xFF, 0xFF, 0xFF],
    "darkblue" => [0x00, 0x00, 0x8B, 0xFF],
    "darkcyan" => [0x00, 0x8B, 0x8B, 0xFF],
    "darkgoldenrod" => [0xB8, 0x86, 0x0B, 0xFF],
    "darkgray" => [0xA9, 0xA9, 0xA9, 0xFF],
    "darkgreen" => [0x00, 0x64, 0x00, 0xFF],
    "darkgrey" => [0xA9, 0xA9, 0xA9, 0xFF],
    "darkkhaki" => [0xBD, 0xB7, 0x6B, 0xFF],
    "darkmagenta" => [0x8B, 0x00, 0x8B, 0xFF],
    "darkolivegreen" => [0x55, 0x6B, 0x2F, 0xFF],
    "darkorange" => [0xFF, 0x8C, 0x00, 0xFF],
    "darkorchid" => [0x99, 0x32, 0xCC, 0xFF],
    "darkred" => [0x8B, 0x00, 0x00, 0xFF],
    "darksalmon" => [0xE9, 0x96, 0x7A, 0xFF],
    "darkseagreen" => [0x8F, 0xBC, 0x8F, 0xFF],
    "darkslateblue" => [0x48, 0x3D, 0x8B, 0xFF],
    "darkslategray" => [0x2F, 0x4F, 0x4F, 0xFF],
    "darkslategrey" => [0x2F, 0x4F, 0x4F, 0xFF],
    "darkturquoise" => [0x00, 0xCE, 0xD1, 0xFF],
    "darkviolet" => [0x94, 0x00, 0xD3, 0xFF],
    "deeppink" => [0xFF, 0x14, 0x93, 0xFF],
    "deepskyblue" => [0x00, 0xBF, 0xFF, 0xFF],
    "dimgray" => [0x69, 0x69, 0x69, 0xFF],
    "dimgrey" => [0x69, 0x69, 0x69, 0xFF],
    "dodgerblue" => [0x1E, 0x90, 0xFF, 0xFF],
    "firebrick" => [0xB2, 0x22, 0x22, 0xFF],
    "floralwhite" => [0xFF, 0xFA, 0xF0, 0xFF],
    "forestgreen" => [0x22, 0x8B, 0x22, 0xFF],
    "fuchsia" => [0xFF, 0x00, 0xFF, 0xFF],
    "gainsboro" => [0xDC, 0xDC, 0xDC, 0xFF],
    "ghostwhite" => [0xF8, 0xF8, 0xFF, 0xFF],
    "gold" => [0xFF, 0xD7, 0x00, 0xFF],
    "goldenrod" => [0xDA, 0xA5, 0x20, 0xFF],
    "gray" => [0x80, 0x80, 0x80, 0xFF],
    "green" => [0x00, 0x80, 0x00, 0xFF],
    "greenyellow" => [0xAD, 0xFF, 0x2F, 0xFF],
    "grey" => [0x80, 0x80, 0x80, 0xFF],
    "honeydew" => [0xF0, 0xFF, 0xF0, 0xFF],
    "hotpink" => [0xFF, 0x69, 0xB4, 0xFF],
    "indianred" => [0xCD, 0x5C, 0x5C, 0xFF],
    "indigo" => [0x4B, 0x00, 0x82, 0xFF],
    "ivory" => [0xFF, 0xFF, 0xF0, 0xFF],
    "khaki" => [0xF0, 0xE6, 0x8C, 0xFF],
    "lavender" => [0xE6, 0xE6, 0xFA, 0xFF],
    "lavenderblush" => [0xFF, 0xF0, 0xF5, 0xFF],
    "lawngreen" => [0x7C, 0xFC, 0x00, 0xFF],
    "lemonchiffon" => [0xFF, 0xFA, 0xCD, 0xFF],
    "lightblue" => [0xAD, 0xD8, 0xE6, 0xFF],
    "lightcoral" => [0xF0, 0x80, 0x80, 0xFF],
    "lightcyan" => [0xE0, 0xFF, 0xFF, 0xFF],
    "lightgoldenrodyellow" => [0xFA, 0xFA, 0xD2, 0xFF],
    "lightgray" => [0xD3, 0xD3, 0xD3, 0xFF],
    "lightgreen" => [0x90, 0xEE, 0x90, 0xFF],
    "lightgrey" => [0xD3, 0xD3, 0xD3, 0xFF],
    "lightpink" => [0xFF, 0xB6, 0xC1, 0xFF],
    "lightsalmon" => [0xFF, 0xA0, 0x7A, 0xFF],
    "lightseagreen" => [0x20, 0xB2, 0xAA, 0xFF],
    "lightskyblue" => [0x87, 0xCE, 0xFA, 0xFF],
    "lightslategray" => [0x77, 0x88, 0x99, 0xFF],
    "lightslategrey" => [0x77, 0x88, 0x99, 0xFF],
    "lightsteelblue" => [0xB0, 0xC4, 0xDE, 0xFF],
    "lightyellow" => [0xFF, 0xFF, 0xE0, 0xFF],
    "lime" => [0x00, 0xFF, 0x00, 0xFF],
    "limegreen" => [0x32, 0xCD, 0x32, 0xFF],
    "linen" => [0xFA, 0xF0, 0xE6, 0xFF],
    "magenta" => [0xFF, 0x00, 0xFF, 0xFF],
    "maroon" => [0x80, 0x00, 0x00, 0xFF],
    "mediumaquamarine" => [0x66, 0xCD, 0xAA, 0xFF],
    "mediumblue" => [0x00, 0x00, 0xCD, 0xFF],
    "mediumorchid" => [0xBA, 0x55, 0xD3, 0xFF],
    "mediumpurple" => [0x93, 0x70, 0xDB, 0xFF],
    "mediumseagreen" => [0x3C, 0xB3, 0x71, 0xFF],
    "mediumslateblue" => [0x7B, 0x68, 0xEE, 0xFF],
    "mediumspringgreen" => [0x00, 0xFA, 0x9A, 0xFF],
    "mediumturquoise" => [0x48, 0xD1, 0xCC, 0xFF],
    "mediumvioletred" => [0xC7, 0x15, 0x85, 0xFF],
    "midnightblue" => [0x19, 0x19, 0x70, 0xFF],
    "mintcream" => [0xF5, 0xFF, 0xFA, 0xFF],
    "mistyrose" => [0xFF, 0xE4, 0xE1, 0xFF],
    "moccasin" => [0xFF, 0xE4, 0xB5, 0xFF],
    "navajowhite" => [0xFF, 0xDE, 0xAD, 0xFF],
    "navy" => [0x00, 0x00, 0x80, 0xFF],
    "oldlace" => [0xFD, 0xF5, 0xE6, 0xFF],
    "olive" => [0x80, 0x80, 0x00, 0xFF],
    "olivedrab" => [0x6B, 0x8E, 0x23, 0xFF],
    "orange" => [0xFF, 0xA5, 0x00, 0xFF],
    "orangered" => [0xFF, 0x45, 0x00, 0xFF],
    "orchid" => [0xDA, 0x70, 0xD6, 0xFF],
    "palegoldenrod" => [0xEE, 0xE8, 0xAA, 0xFF],
    "palegreen" => [0x98, 0xFB, 0x98, 0xFF],
    "paleturquoise" => [0xAF, 0xEE, 0xEE, 0xFF],
    "palevioletred" => [0xDB, 0x70, 0x93, 0xFF],
    "papayawhip" => [0xFF, 0xEF, 0xD5, 0xFF],
    "peachpuff" => [0xFF, 0xDA, 0xB9, 0xFF],
    "peru" => [0xCD, 0x85, 0x3F, 0xFF],
    "pink" => [0xFF, 0xC0, 0xCB, 0xFF],
    "plum" => [0xDD, 0xA0, 0xDD, 0xFF],
    "powderblue" => [0xB0, 0xE0, 0xE6, 0xFF],
    "purple" => [0x80, 0x00, 0x80, 0xFF],
    "rebeccapurple" => [0x66, 0x33, 0x99, 0xFF],
    "red" => [0xFF, 0x00, 0x00, 0xFF],
    "rosybrown" => [0xBC, 0x8F, 0x8F, 0xFF],
    "royalblue" => [0x41, 0x69, 0xE1, 0xFF],
    "saddlebrown" => [0x8B, 0x45, 0x13, 0xFF],
    "salmon" => [0xFA, 0x80, 0x72, 0xFF],
    "sandybrown" => [0xF4, 0xA4, 0x60, 0xFF],
    "seagreen" => [0x2E, 0x8B, 0x57, 0xFF],
    "seashell" => [0xFF, 0xF5, 0xEE, 0xFF],
    "sienna" => [0xA0, 0x52, 0x2D, 0xFF],
    "silver" => [0xC0, 0xC0, 0xC0, 0xFF],
    "skyblue" => [0x87, 0xCE, 0xEB, 0xFF],
    "slateblue" => [0x6A, 0x5A, 0xCD, 0xFF],
    "slategray" => [0x70, 0x80, 0x90, 0xFF],
    "slategrey" => [0x70, 0x80, 0x90, 0xFF],
    "snow" => [0xFF, 0xFA, 0xFA, 0xFF],
    "springgreen" => [0x00, 0xFF, 0x7F, 0xFF],
    "steelblue" => [0x46, 0x82, 0xB4, 0xFF],
    "tan" => [0xD2, 0xB4, 0x8C, 0xFF],
    "teal" => [0x00, 0x80, 0x80, 0xFF],
    "thistle" => [0xD8, 0xBF, 0xD8, 0xFF],
    "tomato" => [0xFF, 0x63, 0x47, 0xFF],
    "turquoise" => [0x40, 0xE0, 0xD0, 0xFF],
    "violet" => [0xEE, 0x82, 0xEE, 0xFF],
    "wheat" => [0xF5, 0xDE, 0xB3, 0xFF],
    "white" => [0xFF, 0xFF, 0xFF, 0xFF],
    "whitesmoke" => [0xF5, 0xF5, 0xF5, 0xFF],
    "yellow" => [0xFF, 0xFF, 0x00, 0xFF],
    "yellowgreen" => [0x9A, 0xCD, 0x32, 0xFF],
    "transparent" => [0x00, 0x00, 0x00, 0x00],
};

/// Looks up a named color, returning normalized RGBA channels in `[0, 1]`.
/// Names are matched case-insensitively.
pub fn lookup_named_color(name: &str) -> Option<[f32; 4]> {
    let key = name.trim().to_ascii_lowercase();
    NAMED_COLORS
        .get(key.as_str())
        .map(|rgba| rgba.map(|c| c as f32 / 255.0))
}

/// Converts a fraction in `[0, 1]` into the fixed-point opacity (0 to 100000).
pub fn fraction_to_alpha(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * OPAQUE_ALPHA as f64).round() as u32
}

/// Parses an opacity attribute value (`0.5` or `50%`) into a fraction.
pub fn parse_opacity(value: &str) -> Option<f64> {
    let value = value.trim();
    let fraction = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().ok()? / 100.0,
        None => value.parse::<f64>().ok()?,
    };
    fraction.is_finite().then_some(fraction)
}

/// Parses a color token into its RGB value and, if the token carries one, its own alpha.
///
/// Accepted forms: `RRGGBB`, `#RRGGBB`, `#RGB`, CSS color names, `rgb(r,g,b)` and
/// `rgba(r,g,b,a)` with channels in 0-255 and `a` in 0-1.
///
/// # Returns
/// `ConversionError::UnresolvedColor` for anything else.
pub fn parse_color_token(token: &str) -> Result<(RgbColor, Option<u32>)> {
    let token = token.trim();
    let unresolved = || ConversionError::UnresolvedColor(token.to_string());

    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex).map(|rgb| (rgb, None)).ok_or_else(unresolved);
    }
    if token.len() == 6 {
        if let Some(rgb) = parse_hex(token) {
            return Ok((rgb, None));
        }
    }

    let lower = token.to_ascii_lowercase();
    if let Some(args) = functional_args(&lower, "rgba") {
        return parse_rgb_args(args, true).ok_or_else(unresolved);
    }
    if let Some(args) = functional_args(&lower, "rgb") {
        return parse_rgb_args(args, false).ok_or_else(unresolved);
    }

    match lookup_named_color(&lower) {
        Some([r, g, b, a]) => {
            let alpha = (a < 1.0).then(|| fraction_to_alpha(a as f64));
            Ok((RgbColor::from_unit(r, g, b), alpha))
        }
        None => Err(unresolved()),
    }
}

/// Resolves a color token and the opacity to use with it.
///
/// Opacity comes from the token's own alpha channel if it has one, otherwise from the
/// separate `opacity` value, otherwise the color is fully opaque. The two are never combined.
///
/// # Arguments
/// * `token` - The color token (`fill` or `stroke` value).
/// * `opacity` - The element's separate opacity attribute, if any.
pub fn resolve_color(token: &str, opacity: Option<&str>) -> Result<ResolvedColor> {
    let (rgb, token_alpha) = parse_color_token(token)?;
    let alpha = match token_alpha {
        Some(alpha) => alpha,
        None => match opacity.and_then(parse_opacity) {
            Some(fraction) => fraction_to_alpha(fraction),
            None => {
                if let Some(raw) = opacity {
                    debug!("Ignoring unparsable opacity value '{}'", raw);
                }
                OPAQUE_ALPHA
            }
        },
    };
    Ok(ResolvedColor { rgb, alpha })
}

fn parse_hex(hex: &str) -> Option<RgbColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(RgbColor::new(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|d| d * 0x11);
            Some(RgbColor::new(digit(0).ok()?, digit(1).ok()?, digit(2).ok()?))
        }
        _ => None,
    }
}

/// Returns the text between the parentheses of `name(...)`.
fn functional_args<'a>(token: &'a str, name: &str) -> Option<&'a str> {
    token
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<(RgbColor, Option<u32>)> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v = match s.strip_suffix('%') {
            Some(p) => p.trim().parse::<f64>().ok()? * 255.0 / 100.0,
            None => s.parse::<f64>().ok()?,
        };
        Some(v.clamp(0.0, 255.0).round() as u8)
    };
    let rgb = RgbColor::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);

    let alpha = if with_alpha {
        Some(fraction_to_alpha(parse_opacity(parts[3])?))
    } else {
        None
    };
    Some((rgb, alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_hex_is_opaque() {
        let c = resolve_color("FF0000", None).unwrap();
        assert_eq!(c.rgb.to_hex(), "FF0000");
        assert_eq!(c.alpha, 100000);
    }

    #[test]
    fn test_rgba_carries_alpha() {
        let c = resolve_color("rgba(255,0,0,0.5)", None).unwrap();
        assert_eq!(c.rgb.to_hex(), "FF0000");
        assert_eq!(c.alpha, 50000);
    }

    #[test]
    fn test_token_alpha_wins_over_opacity_attribute() {
        let c = resolve_color("rgba(0, 0, 255, 0.25)", Some("0.9")).unwrap();
        assert_eq!(c.alpha, 25000);
    }

    #[test]
    fn test_opacity_attribute_applies_without_token_alpha() {
        let c = resolve_color("#00ff00", Some("0.3")).unwrap();
        assert_eq!(c.rgb, RgbColor::new(0, 255, 0));
        assert_eq!(c.alpha, 30000);
        assert_eq!(resolve_color("blue", Some("40%")).unwrap().alpha, 40000);
    }

    #[test]
    fn test_named_and_short_forms() {
        assert_eq!(
            resolve_color("SteelBlue", None).unwrap().rgb,
            RgbColor::new(0x46, 0x82, 0xB4)
        );
        assert_eq!(
            resolve_color("#abc", None).unwrap().rgb,
            RgbColor::new(0xAA, 0xBB, 0xCC)
        );
        assert_eq!(
            resolve_color("rgb(10, 20, 30)", None).unwrap().rgb,
            RgbColor::new(10, 20, 30)
        );
        assert_eq!(resolve_color("transparent", Some("1")).unwrap().alpha, 0);
    }

    #[test]
    fn test_palette_lookup_is_normalized() {
        assert_eq!(lookup_named_color("white"), Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(lookup_named_color("nosuchcolor"), None);
    }

    #[test]
    fn test_unknown_token_is_unresolved() {
        for token in ["url(#grad)", "#12345", "rgba(1,2,3)", "chartreuse-ish"] {
            let err = resolve_color(token, None).unwrap_err();
            assert!(matches!(err, ConversionError::UnresolvedColor(_)), "{token}");
        }
    }
}
