//! Canonical color value and conversions for the mesh gradient editor.
//!
//! A [`Color`] stores a single canonical `(r, g, b, a)` tuple: 8-bit sRGB
//! channels plus an `f64` alpha in [0, 1]. Hex, HSV and OKLCH are views
//! derived on demand, and [`Color::format`] renders any of the textual
//! notations. Parsing lives in [`crate::parse`].
//!
//! The OKLab matrices are the published constants, applied with `glam`'s
//! `DMat3` so each row is evaluated left to right exactly as the table reads.

use std::fmt;
use std::str::FromStr;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MeshError;
use crate::parse::{self, ColorInput};

/// Hex literal used for any fully transparent color.
const TRANSPARENT_HEX: &str = "#00000000";

/// Linear sRGB to LMS cone response.
const RGB_TO_LMS: DMat3 = DMat3::from_cols(
    DVec3::new(0.4122214708, 0.2119034982, 0.0883024619),
    DVec3::new(0.5363325363, 0.6806995451, 0.2817188376),
    DVec3::new(0.0514459929, 0.1073969566, 0.6299787005),
);

/// Cube-rooted LMS to OKLab.
const LMS_TO_OKLAB: DMat3 = DMat3::from_cols(
    DVec3::new(0.2104542553, 1.9779984951, 0.0259040371),
    DVec3::new(0.7936177850, -2.4285922050, 0.7827717662),
    DVec3::new(-0.0040720401, 0.4505937099, -0.8086757660),
);

/// OKLab to cube-rooted LMS.
const OKLAB_TO_LMS: DMat3 = DMat3::from_cols(
    DVec3::new(1.0, 1.0, 1.0),
    DVec3::new(0.3963377774, -0.1055613458, -0.0894841775),
    DVec3::new(0.2158037573, -0.0638541728, -1.2914855480),
);

/// LMS to linear sRGB.
const LMS_TO_RGB: DMat3 = DMat3::from_cols(
    DVec3::new(4.0767416621, -1.2684380046, -0.0041960863),
    DVec3::new(-3.3077115913, 2.6097574011, -0.7034186147),
    DVec3::new(0.2309699292, -0.3413193965, 1.7076147010),
);

/// 8-bit sRGB channels with a real-valued alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// HSV view: hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsva {
    pub h: f64,
    pub s: f64,
    pub v: f64,
    pub a: f64,
}

/// OKLCH view: lightness (nominally [0, 1]), chroma (>= 0), hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklcha {
    pub l: f64,
    pub c: f64,
    pub h: f64,
    pub a: f64,
}

/// Textual notations [`Color::format`] can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsv,
    Oklch,
}

impl ColorFormat {
    /// Every output format, in display order.
    pub const ALL: [ColorFormat; 4] = [
        ColorFormat::Hex,
        ColorFormat::Rgb,
        ColorFormat::Hsv,
        ColorFormat::Oklch,
    ];

    /// Returns the lowercase format name.
    pub fn name(self) -> &'static str {
        match self {
            ColorFormat::Hex => "hex",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Hsv => "hsv",
            ColorFormat::Oklch => "oklch",
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorFormat {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MeshError::InvalidColor(format!("unknown color format '{s}'")))
    }
}

/// What to substitute when a color cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidColorFallback {
    /// `(0, 0, 0, 0)`.
    #[default]
    TransparentBlack,
    /// `(0, 0, 0, 1)`.
    OpaqueBlack,
}

impl InvalidColorFallback {
    /// Returns the substitute color.
    pub fn color(self) -> Color {
        match self {
            InvalidColorFallback::TransparentBlack => Color::TRANSPARENT,
            InvalidColorFallback::OpaqueBlack => Color::BLACK,
        }
    }
}

impl FromStr for InvalidColorFallback {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transparent" | "transparent_black" | "transparent-black" => {
                Ok(InvalidColorFallback::TransparentBlack)
            }
            "black" | "opaque" | "opaque_black" | "opaque-black" => {
                Ok(InvalidColorFallback::OpaqueBlack)
            }
            other => Err(MeshError::InvalidColor(format!(
                "unknown fallback policy '{other}'"
            ))),
        }
    }
}

/// An immutable color in canonical `(r, g, b, a)` form.
///
/// Serializes as a hex string. Deserializes from any textual notation
/// [`crate::parse`] accepts. Hex carries alpha with 8-bit precision, so a
/// serialized alpha is quantized to multiples of 1/255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    rgba: Rgba,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color {
        rgba: Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0.0,
        },
    };

    /// Opaque black.
    pub const BLACK: Color = Color {
        rgba: Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 1.0,
        },
    };

    /// Opaque white.
    pub const WHITE: Color = Color {
        rgba: Rgba {
            r: 255,
            g: 255,
            b: 255,
            a: 1.0,
        },
    };

    /// Creates a color from channels, clamping alpha to [0, 1] (NaN becomes 0).
    pub fn from_rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            rgba: Rgba {
                r,
                g,
                b,
                a: clamp_alpha(a),
            },
        }
    }

    /// Creates an opaque color from a 24-bit `0xRRGGBB` integer.
    ///
    /// Bits above the low 24 are ignored.
    pub fn from_u24(value: u32) -> Self {
        let [_, r, g, b] = (value & 0x00ff_ffff).to_be_bytes();
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Creates a color from an HSV record using the six-sector reconstruction.
    pub fn from_hsv(hsv: Hsva) -> Self {
        let mut h = hsv.h % 360.0;
        if h < 0.0 {
            h += 360.0;
        }
        let c = hsv.v * hsv.s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = hsv.v - c;

        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            h if h < 360.0 => (c, 0.0, x),
            _ => (0.0, 0.0, 0.0),
        };

        Self::from_rgba(
            unit_to_channel(r + m),
            unit_to_channel(g + m),
            unit_to_channel(b + m),
            hsv.a,
        )
    }

    /// Creates a color from an OKLCH record, clamping out-of-gamut results.
    pub fn from_oklch(oklch: Oklcha) -> Self {
        let hue = oklch.h.to_radians();
        let lab = DVec3::new(oklch.l, hue.cos() * oklch.c, hue.sin() * oklch.c);
        let lms = OKLAB_TO_LMS * lab;
        let linear = LMS_TO_RGB * (lms * lms * lms);
        Self::from_rgba(
            linear_to_channel(linear.x),
            linear_to_channel(linear.y),
            linear_to_channel(linear.z),
            oklch.a,
        )
    }

    /// Parses any supported input into a color.
    ///
    /// Returns `MeshError::InvalidColor` when no notation matches.
    pub fn parse<'a>(input: impl Into<ColorInput<'a>>) -> Result<Self, MeshError> {
        parse::parse(input.into())
    }

    /// Parses `input`, substituting the fallback policy's color on failure.
    pub fn parse_or<'a>(input: impl Into<ColorInput<'a>>, fallback: InvalidColorFallback) -> Self {
        Self::parse(input).unwrap_or_else(|e| {
            tracing::warn!(error = %e, ?fallback, "substituting fallback color");
            fallback.color()
        })
    }

    /// Returns the canonical channels.
    pub fn rgba(&self) -> Rgba {
        self.rgba
    }

    /// Returns the alpha component.
    pub fn alpha(&self) -> f64 {
        self.rgba.a
    }

    /// Returns a copy with a new alpha, clamped to [0, 1].
    #[must_use]
    pub fn with_alpha(self, a: f64) -> Self {
        Self::from_rgba(self.rgba.r, self.rgba.g, self.rgba.b, a)
    }

    /// Returns a new color built from an edited copy of the HSV view.
    ///
    /// This is how a picker's hue slider or saturation/value square updates
    /// a color without touching the other components.
    #[must_use]
    pub fn with_hsv(self, edit: impl FnOnce(&mut Hsva)) -> Self {
        let mut hsv = self.to_hsv();
        edit(&mut hsv);
        Self::from_hsv(hsv)
    }

    /// Renders `#rrggbb`, or `#rrggbbaa` when alpha is below 1.
    ///
    /// Colors whose alpha rounds to a zero byte render as `#00000000`.
    pub fn to_hex(&self) -> String {
        let Rgba { r, g, b, a } = self.rgba;
        let alpha = (a * 255.0).round() as u8;
        if alpha == 0 {
            return TRANSPARENT_HEX.to_string();
        }
        if a < 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}{alpha:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}")
        }
    }

    /// Returns the HSV view.
    ///
    /// Hue is 0 for achromatic colors; saturation is 0 for black.
    pub fn to_hsv(&self) -> Hsva {
        let r = f64::from(self.rgba.r) / 255.0;
        let g = f64::from(self.rgba.g) / 255.0;
        let b = f64::from(self.rgba.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let mut h = 0.0;
        if delta != 0.0 {
            h = if max == r {
                ((g - b) / delta) % 6.0
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            h *= 60.0;
            if h < 0.0 {
                h += 360.0;
            }
        }

        let s = if max == 0.0 { 0.0 } else { delta / max };
        Hsva {
            h,
            s,
            v: max,
            a: self.rgba.a,
        }
    }

    /// Returns the OKLCH view.
    ///
    /// Hue is not meaningful for achromatic colors: it is whatever `atan2`
    /// yields for the near-zero a/b residue.
    pub fn to_oklch(&self) -> Oklcha {
        let linear = DVec3::new(
            channel_to_linear(self.rgba.r),
            channel_to_linear(self.rgba.g),
            channel_to_linear(self.rgba.b),
        );
        let lms = RGB_TO_LMS * linear;
        let lab = LMS_TO_OKLAB * DVec3::new(lms.x.cbrt(), lms.y.cbrt(), lms.z.cbrt());

        let c = (lab.y * lab.y + lab.z * lab.z).sqrt();
        let mut h = lab.z.atan2(lab.y).to_degrees();
        if h < 0.0 {
            h += 360.0;
        }
        if h >= 360.0 {
            h -= 360.0;
        }
        Oklcha {
            l: lab.x,
            c,
            h,
            a: self.rgba.a,
        }
    }

    /// Renders the color in the requested notation.
    ///
    /// The alpha component is omitted from rgb/hsv/oklch when alpha is 1.
    pub fn format(&self, format: ColorFormat) -> String {
        let a = self.rgba.a;
        match format {
            ColorFormat::Hex => self.to_hex(),
            ColorFormat::Rgb => {
                let Rgba { r, g, b, .. } = self.rgba;
                if a < 1.0 {
                    format!("rgba({r}, {g}, {b}, {a})")
                } else {
                    format!("rgb({r}, {g}, {b})")
                }
            }
            ColorFormat::Hsv => {
                let hsv = self.to_hsv();
                let h = trim_decimal(hsv.h, 2);
                let s = trim_decimal(hsv.s * 100.0, 2);
                let v = trim_decimal(hsv.v * 100.0, 2);
                if a < 1.0 {
                    format!("hsva({h}, {s}%, {v}%, {a})")
                } else {
                    format!("hsv({h}, {s}%, {v}%)")
                }
            }
            ColorFormat::Oklch => {
                let lch = self.to_oklch();
                let l = trim_decimal(lch.l, 4);
                let c = trim_decimal(lch.c, 4);
                let h = trim_decimal(lch.h, 2);
                if a < 1.0 {
                    format!("oklch({l} {c} {h} / {a})")
                } else {
                    format!("oklch({l} {c} {h})")
                }
            }
        }
    }
}

impl From<Rgba> for Color {
    fn from(rgba: Rgba) -> Self {
        Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(s.as_str()).map_err(serde::de::Error::custom)
    }
}

fn clamp_alpha(a: f64) -> f64 {
    if a.is_nan() {
        0.0
    } else {
        a.clamp(0.0, 1.0)
    }
}

/// Scales a [0, 1] value to a rounded, clamped 8-bit channel.
fn unit_to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Applies the inverse sRGB transfer function to an 8-bit channel.
fn channel_to_linear(c: u8) -> f64 {
    let v = f64::from(c) / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies the sRGB transfer function and quantizes to 8 bits.
fn linear_to_channel(c: f64) -> u8 {
    let v = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    unit_to_channel(v)
}

/// Formats with at most `decimals` fractional digits, dropping trailing zeros.
fn trim_decimal(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    let trimmed = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
