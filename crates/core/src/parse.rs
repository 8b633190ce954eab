//! Color input parsing and syntactic validation.
//!
//! Textual input is trimmed and lowercased, then tried against each notation
//! in a fixed order: hex, rgb(a), hsv(a), oklch, CSS named color. The first
//! notation that matches wins. Structured records bypass text matching.

use std::fmt;
use std::str::FromStr;

use crate::color::{Color, Hsva, Oklcha, Rgba};
use crate::error::MeshError;
use crate::named;

/// Anything the color parser accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorInput<'a> {
    /// Any textual notation.
    Text(&'a str),
    /// Pre-structured RGB record.
    Rgb(Rgba),
    /// Pre-structured HSV record (s, v as fractions).
    Hsv(Hsva),
    /// Pre-structured OKLCH record.
    Oklch(Oklcha),
}

impl<'a> From<&'a str> for ColorInput<'a> {
    fn from(s: &'a str) -> Self {
        ColorInput::Text(s)
    }
}

impl<'a> From<&'a String> for ColorInput<'a> {
    fn from(s: &'a String) -> Self {
        ColorInput::Text(s.as_str())
    }
}

impl From<Rgba> for ColorInput<'_> {
    fn from(rgba: Rgba) -> Self {
        ColorInput::Rgb(rgba)
    }
}

impl From<Hsva> for ColorInput<'_> {
    fn from(hsv: Hsva) -> Self {
        ColorInput::Hsv(hsv)
    }
}

impl From<Oklcha> for ColorInput<'_> {
    fn from(oklch: Oklcha) -> Self {
        ColorInput::Oklch(oklch)
    }
}

/// Textual notations understood by [`is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Hex,
    Rgb,
    Hsv,
    Oklch,
    Named,
}

impl Notation {
    /// Every notation, in matching order.
    pub const ALL: [Notation; 5] = [
        Notation::Hex,
        Notation::Rgb,
        Notation::Hsv,
        Notation::Oklch,
        Notation::Named,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Notation::Hex => "hex",
            Notation::Rgb => "rgb",
            Notation::Hsv => "hsv",
            Notation::Oklch => "oklch",
            Notation::Named => "named-color",
        }
    }

    /// Parses normalized text in this notation only.
    fn parse(self, text: &str) -> Option<Color> {
        match self {
            Notation::Hex => parse_hex(text),
            Notation::Rgb => parse_rgb(text),
            Notation::Hsv => parse_hsv(text).map(Color::from_hsv),
            Notation::Oklch => parse_oklch(text).map(Color::from_oklch),
            Notation::Named => named::lookup(text).map(|[r, g, b]| Color::from_rgba(r, g, b, 1.0)),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Notation {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Notation::Hex),
            "rgb" | "rgba" => Ok(Notation::Rgb),
            "hsv" | "hsva" => Ok(Notation::Hsv),
            "oklch" => Ok(Notation::Oklch),
            "named" | "named-color" | "name" => Ok(Notation::Named),
            other => Err(MeshError::InvalidColor(format!("unknown notation '{other}'"))),
        }
    }
}

/// Parses any supported input into the canonical color.
pub fn parse(input: ColorInput<'_>) -> Result<Color, MeshError> {
    match input {
        ColorInput::Rgb(rgba) => Ok(Color::from(rgba)),
        ColorInput::Hsv(hsv) => Ok(Color::from_hsv(hsv)),
        ColorInput::Oklch(oklch) => Ok(Color::from_oklch(oklch)),
        ColorInput::Text(text) => {
            let normalized = normalize(text);
            Notation::ALL
                .into_iter()
                .find_map(|n| n.parse(&normalized))
                .ok_or_else(|| {
                    tracing::trace!(input = text, "no notation matched");
                    MeshError::InvalidColor(format!("'{}' matches no color notation", text.trim()))
                })
        }
    }
}

/// Checks whether `text` is syntactically valid.
///
/// With a notation only that notation is tried; otherwise every notation is
/// tried in matching order.
pub fn is_valid(text: &str, notation: Option<Notation>) -> bool {
    let normalized = normalize(text);
    match notation {
        Some(n) => n.parse(&normalized).is_some(),
        None => Notation::ALL.into_iter().any(|n| n.parse(&normalized).is_some()),
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}

// -- Notation scanners. All expect normalized input. --

fn parse_hex(text: &str) -> Option<Color> {
    let digits = text.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    let (r, g, b, a) = match digits.len() {
        3 | 4 => {
            let r = nibble(0)? * 17;
            let g = nibble(1)? * 17;
            let b = nibble(2)? * 17;
            let a = if digits.len() == 4 { nibble(3)? * 17 } else { 255 };
            (r, g, b, a)
        }
        6 | 8 => {
            let a = if digits.len() == 8 { byte(6)? } else { 255 };
            (byte(0)?, byte(2)?, byte(4)?, a)
        }
        _ => return None,
    };
    Some(Color::from_rgba(r, g, b, f64::from(a) / 255.0))
}

fn parse_rgb(text: &str) -> Option<Color> {
    let inner = functional_args(text, &["rgba", "rgb"])?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(token) => number(token)?,
        None => 1.0,
    };
    Some(Color::from_rgba(r, g, b, a))
}

fn parse_hsv(text: &str) -> Option<Hsva> {
    let inner = functional_args(text, &["hsva", "hsv"])?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let h = number(parts[0])?;
    let s = fraction(parts[1])?;
    let v = fraction(parts[2])?;
    let a = match parts.get(3) {
        Some(token) => number(token)?,
        None => 1.0,
    };
    Some(Hsva { h, s, v, a })
}

fn parse_oklch(text: &str) -> Option<Oklcha> {
    let inner = functional_args(text, &["oklch"])?;
    let (lch, alpha) = match inner.split_once('/') {
        Some((lch, alpha)) => (lch, Some(alpha.trim())),
        None => (inner, None),
    };
    let mut tokens = lch.split_whitespace();
    let l = number(tokens.next()?)?;
    let c = number(tokens.next()?)?;
    let h = number(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    let a = match alpha {
        Some(token) => number(token)?,
        None => 1.0,
    };
    Some(Oklcha { l, c, h, a })
}

/// Strips `name(` ... `)` for the first matching function name.
fn functional_args<'t>(text: &'t str, names: &[&str]) -> Option<&'t str> {
    let body = text.strip_suffix(')')?;
    names
        .iter()
        .find_map(|name| body.strip_prefix(name)?.strip_prefix('('))
}

/// An unsigned decimal made only of digits and dots.
fn number(token: &str) -> Option<f64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    token.parse().ok()
}

/// An integer channel in [0, 255].
fn channel(token: &str) -> Option<u8> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// A saturation/value component.
///
/// `N%` is a percentage. A bare number up to 1 is a fraction; above 1 it is
/// read as a percentage. The result is clamped to [0, 1].
fn fraction(token: &str) -> Option<f64> {
    let value = match token.strip_suffix('%') {
        Some(percent) => number(percent.trim_end())? / 100.0,
        None => {
            let value = number(token)?;
            if value > 1.0 {
                value / 100.0
            } else {
                value
            }
        }
    };
    Some(value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Result<Color, MeshError> {
        parse(ColorInput::Text(s))
    }

    fn rgba(r: u8, g: u8, b: u8, a: f64) -> Color {
        Color::from_rgba(r, g, b, a)
    }

    // -- Hex --

    #[test]
    fn hex_all_lengths() {
        assert_eq!(text("#f00").unwrap(), rgba(255, 0, 0, 1.0));
        assert_eq!(text("#f008").unwrap(), rgba(255, 0, 0, 136.0 / 255.0));
        assert_eq!(text("#ff0000").unwrap(), rgba(255, 0, 0, 1.0));
        assert_eq!(text("#ff000080").unwrap(), rgba(255, 0, 0, 128.0 / 255.0));
    }

    #[test]
    fn hex_is_case_insensitive_and_trimmed() {
        assert_eq!(text("  #C0FFEE \n").unwrap(), rgba(0xc0, 0xff, 0xee, 1.0));
    }

    #[test]
    fn hex_transparent_suffix() {
        let c = text("#ffffff00").unwrap();
        assert_eq!(c.alpha(), 0.0);
        assert_eq!(c.to_hex(), "#00000000");
    }

    #[test]
    fn hex_rejects_bad_shapes() {
        for bad in ["ff0000", "#fffff", "#ff00000", "#gg0000", "#", "#ff0000ff00", "#+f0"] {
            assert!(text(bad).is_err(), "accepted {bad}");
        }
    }

    // -- RGB --

    #[test]
    fn rgb_and_rgba_forms() {
        assert_eq!(text("rgb(255, 128, 0)").unwrap(), rgba(255, 128, 0, 1.0));
        assert_eq!(text("rgba(1,2,3,0.5)").unwrap(), rgba(1, 2, 3, 0.5));
        // Either keyword accepts either arity.
        assert_eq!(text("rgba(1, 2, 3)").unwrap(), rgba(1, 2, 3, 1.0));
        assert_eq!(text("RGB( 1 , 2 , 3 , 0.25 )").unwrap(), rgba(1, 2, 3, 0.25));
    }

    #[test]
    fn rgb_clamps_alpha_above_one() {
        assert_eq!(text("rgba(1, 2, 3, 7)").unwrap().alpha(), 1.0);
    }

    #[test]
    fn rgb_rejects_out_of_range_and_malformed() {
        for bad in [
            "rgb(256, 0, 0)",
            "rgb(-1, 0, 0)",
            "rgb(1.5, 0, 0)",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4, 5)",
            "rgb 1, 2, 3",
            "rgb(1, 2, 3",
            "rgb(1 2 3)",
        ] {
            assert!(text(bad).is_err(), "accepted {bad}");
        }
    }

    // -- HSV --

    #[test]
    fn hsv_percentages() {
        assert_eq!(text("hsv(240, 100%, 100%)").unwrap().to_hex(), "#0000ff");
        assert_eq!(text("hsv(0, 0%, 100%)").unwrap(), Color::WHITE);
    }

    #[test]
    fn hsv_fractions_and_bare_percentages() {
        assert_eq!(text("hsv(120, 1, 1)").unwrap().to_hex(), "#00ff00");
        assert_eq!(text("hsv(120, 100, 100)").unwrap().to_hex(), "#00ff00");
        assert_eq!(text("hsv(120, 0.5, 50)").unwrap(), text("hsv(120, 50%, 50%)").unwrap());
    }

    #[test]
    fn hsv_out_of_range_saturation_and_value_clamp() {
        let red = text("hsv(0, 100%, 100%)").unwrap();
        assert_eq!(text("hsv(0, 200%, 100%)").unwrap(), red);
        assert_eq!(text("hsv(0, 250, 400)").unwrap(), red);
        assert_eq!(text("hsv(0, 100%, 150%)").unwrap().to_hsv().v, 1.0);
    }

    #[test]
    fn hsva_alpha() {
        let c = text("hsva(0, 100%, 100%, 0.5)").unwrap();
        assert_eq!(c, rgba(255, 0, 0, 0.5));
    }

    #[test]
    fn hsv_rejects_malformed() {
        for bad in ["hsv(0, 100%)", "hsv(-10, 1, 1)", "hsv(a, 1, 1)", "hsv(0, 1%%, 1)"] {
            assert!(text(bad).is_err(), "accepted {bad}");
        }
    }

    // -- OKLCH --

    #[test]
    fn oklch_with_and_without_alpha() {
        assert_eq!(text("oklch(1 0 0)").unwrap(), Color::WHITE);
        let c = text("oklch(1 0 0 / 0.5)").unwrap();
        assert_eq!(c.alpha(), 0.5);
        assert_eq!(text("oklch( 0   0 0 /0.25)").unwrap(), rgba(0, 0, 0, 0.25));
    }

    #[test]
    fn oklch_rejects_malformed() {
        for bad in ["oklch(1, 0, 0)", "oklch(1 0)", "oklch(1 0 0 0)", "oklch(1 0 0 /)", "oklch(1 0 0 / a)"] {
            assert!(text(bad).is_err(), "accepted {bad}");
        }
    }

    // -- Named --

    #[test]
    fn named_colors_resolve() {
        assert_eq!(text("rebeccapurple").unwrap(), rgba(0x66, 0x33, 0x99, 1.0));
        assert_eq!(text("  Red ").unwrap(), rgba(255, 0, 0, 1.0));
    }

    #[test]
    fn unknown_names_fail() {
        assert!(text("notacolor").is_err());
        assert!(text("transparent").is_err());
        assert!(text("").is_err());
    }

    #[test]
    fn invalid_color_error_names_input() {
        let err = text("  bogus ").unwrap_err();
        assert!(matches!(err, MeshError::InvalidColor(ref m) if m.contains("bogus")), "{err}");
    }

    // -- Structured records --

    #[test]
    fn structured_records() {
        let c = parse(ColorInput::Hsv(Hsva { h: 240.0, s: 1.0, v: 1.0, a: 1.0 })).unwrap();
        assert_eq!(c.to_hex(), "#0000ff");

        let c = parse(Rgba { r: 1, g: 2, b: 3, a: 2.0 }.into()).unwrap();
        assert_eq!(c.alpha(), 1.0);

        let c = parse(Oklcha { l: 0.0, c: 0.0, h: 0.0, a: 1.0 }.into()).unwrap();
        assert_eq!(c, Color::BLACK);
    }

    // -- Validation --

    #[test]
    fn is_valid_agnostic() {
        assert!(is_valid("#abc", None));
        assert!(is_valid("rgb(1, 2, 3)", None));
        assert!(is_valid("hsv(1, 2%, 3%)", None));
        assert!(is_valid("oklch(0.5 0.1 200)", None));
        assert!(is_valid("navy", None));
        assert!(!is_valid("navvy", None));
    }

    #[test]
    fn is_valid_restricted_to_notation() {
        assert!(is_valid("#abc", Some(Notation::Hex)));
        assert!(!is_valid("#abc", Some(Notation::Rgb)));
        assert!(!is_valid("navy", Some(Notation::Hex)));
        assert!(is_valid("navy", Some(Notation::Named)));
        assert!(is_valid(" OKLCH(0.5 0.1 200) ", Some(Notation::Oklch)));
    }

    #[test]
    fn notation_from_str() {
        assert_eq!("named-color".parse::<Notation>().unwrap(), Notation::Named);
        assert_eq!("RGBA".parse::<Notation>().unwrap(), Notation::Rgb);
        assert!("lab".parse::<Notation>().is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex_normalizes_through_format(digits in "[0-9a-fA-F]{6}", alpha in proptest::option::of("[0-9a-fA-F]{2}")) {
                let input = format!("#{digits}{}", alpha.clone().unwrap_or_default());
                let color = text(&input).unwrap();
                let lower = input.to_ascii_lowercase();
                let expected = match alpha.as_deref().map(str::to_ascii_lowercase).as_deref() {
                    None | Some("ff") => lower[..7].to_string(),
                    Some("00") => "#00000000".to_string(),
                    Some(_) => lower,
                };
                prop_assert_eq!(color.to_hex(), expected);
            }

            #[test]
            fn parse_never_panics(s in "\\PC{0,40}") {
                let _ = text(&s);
                let _ = is_valid(&s, None);
            }
        }
    }
}
