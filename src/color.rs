//! Terminal colors for per-stream highlighting.
//!
//! Colors are held as floating point RGB channels in `[0, 1]` and converted
//! to and from HSL so that saturation and luminance can be adjusted
//! independently of hue. Background colors are kept inside a band that stays
//! legible on both dark and light terminal themes.

use crate::error::InterleaveError;

/// Saturation band for automatically chosen background colors.
const SATURATION_BAND: (f64, f64) = (0.3, 0.6);

/// Luminance band for automatically chosen background colors.
const LUMINANCE_BAND: (f64, f64) = (0.2, 0.3);

/// Hues of the built-in palette, spread so neighbouring indices differ.
const PALETTE_HUES: [f64; 8] = [
    0.0,
    2.0 / 9.0,
    6.0 / 9.0,
    8.0 / 9.0,
    1.0 / 9.0,
    3.0 / 9.0,
    5.0 / 9.0,
    7.0 / 9.0,
];

/// Luminance levels of the built-in palette.
const PALETTE_LUMINANCES: [f64; 2] = [0.3, 0.45];

const PALETTE_SATURATION: f64 = 0.4;

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
}

impl Color {
    /// Build a color from 8-bit channels.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f64::from(red) / 255.0,
            green: f64::from(green) / 255.0,
            blue: f64::from(blue) / 255.0,
        }
    }

    /// Build a color from hue, saturation and luminance, each in `[0, 1]`.
    pub fn from_hsl(hue: f64, saturation: f64, luminance: f64) -> Self {
        if saturation == 0.0 {
            return Self {
                red: luminance,
                green: luminance,
                blue: luminance,
            };
        }
        let q = if luminance < 0.5 {
            luminance * (1.0 + saturation)
        } else {
            luminance + saturation - luminance * saturation
        };
        let p = 2.0 * luminance - q;
        Self {
            red: hue_to_channel(p, q, hue + 1.0 / 3.0),
            green: hue_to_channel(p, q, hue),
            blue: hue_to_channel(p, q, hue - 1.0 / 3.0),
        }
    }

    /// Hue, saturation and luminance of this color.
    pub fn hsl(&self) -> (f64, f64, f64) {
        let max = self.red.max(self.green).max(self.blue);
        let min = self.red.min(self.green).min(self.blue);
        let luminance = (max + min) / 2.0;
        if (max - min).abs() < f64::EPSILON {
            return (0.0, 0.0, luminance);
        }
        let delta = max - min;
        let saturation = if luminance > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        let hue = if (max - self.red).abs() < f64::EPSILON {
            (self.green - self.blue) / delta + if self.green < self.blue { 6.0 } else { 0.0 }
        } else if (max - self.green).abs() < f64::EPSILON {
            (self.blue - self.red) / delta + 2.0
        } else {
            (self.red - self.green) / delta + 4.0
        };
        (hue / 6.0, saturation, luminance)
    }

    /// 8-bit channels, rounded to nearest.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rgb8(&self) -> (u8, u8, u8) {
        let to_u8 = |n: f64| (n.clamp(0.0, 1.0) * 255.0).round() as u8;
        (to_u8(self.red), to_u8(self.green), to_u8(self.blue))
    }

    /// Parse `#rrggbb`, `#rgb`, or a basic color name.
    pub fn parse(s: &str) -> Result<Self, InterleaveError> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex)
                .ok_or_else(|| InterleaveError::Config(format!("invalid hex color '{s}'")));
        }
        color_name_to_rgb8(trimmed)
            .map(|(r, g, b)| Self::from_rgb8(r, g, b))
            .ok_or_else(|| InterleaveError::Config(format!("unknown color '{s}'")))
    }

    /// Deterministic color for an arbitrary key, from the key's md5 digest.
    pub fn pick_for(key: &str) -> Self {
        let digest = md5::compute(key.as_bytes());
        Self::from_rgb8(digest.0[0], digest.0[1], digest.0[2])
    }

    /// Same hue, with saturation and luminance squeezed into the readable band.
    pub fn rescaled_readable(self) -> Self {
        let (hue, saturation, luminance) = self.hsl();
        Self::from_hsl(
            hue,
            rescale(saturation, SATURATION_BAND),
            rescale(luminance, LUMINANCE_BAND),
        )
    }

    /// Same hue and saturation with luminance inverted, for text drawn on
    /// top of this color.
    pub fn with_inverted_luminance(self) -> Self {
        let (hue, saturation, luminance) = self.hsl();
        Self::from_hsl(hue, saturation, 1.0 - luminance)
    }

    /// SGR parameters selecting this color as a 24-bit background.
    pub fn background_sgr(&self) -> String {
        let (r, g, b) = self.rgb8();
        format!("48;2;{r};{g};{b}")
    }
}

/// Built-in palette: every palette hue at two luminance levels.
pub fn default_palette() -> Vec<Color> {
    PALETTE_LUMINANCES
        .iter()
        .flat_map(|&luminance| {
            PALETTE_HUES
                .iter()
                .map(move |&hue| Color::from_hsl(hue, PALETTE_SATURATION, luminance))
        })
        .collect()
}

/// Linearly map `n` from `[0, 1]` into `band`.
fn rescale(n: f64, band: (f64, f64)) -> f64 {
    band.0 + n * (band.1 - band.0)
}

fn hue_to_channel(p: f64, q: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        p + (q - p) * 6.0 * hue
    } else if hue < 0.5 {
        q
    } else if hue < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - hue) * 6.0
    } else {
        p
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgb8(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        3 => {
            let short = |i: usize| channel(hex.get(i..=i)?).map(|v| v * 17);
            Some(Color::from_rgb8(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Basic web color names.
fn color_name_to_rgb8(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name.to_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "gray" | "grey" => (128, 128, 128),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        _ => return None,
    };
    Some(rgb)
}
