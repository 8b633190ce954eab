//! Built-in color themes.
//!
//! Applying a theme replaces the document's layers with one fresh random
//! layer per theme color, in order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::MeshError;

/// A named preset of four layer colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Cosmic,
    Mystic,
    Sunset,
    Ocean,
    Forest,
    Aurora,
}

impl Theme {
    /// Every theme, in presentation order.
    pub const ALL: [Theme; 6] = [
        Theme::Cosmic,
        Theme::Mystic,
        Theme::Sunset,
        Theme::Ocean,
        Theme::Forest,
        Theme::Aurora,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Cosmic => "cosmic",
            Theme::Mystic => "mystic",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Aurora => "aurora",
        }
    }

    /// Looks up a theme by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, MeshError> {
        let wanted = name.trim();
        Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MeshError::UnknownTheme(wanted.to_string()))
    }

    pub fn list_names() -> Vec<&'static str> {
        Theme::ALL.iter().map(|t| t.name()).collect()
    }

    /// The theme's layer colors, bottom to top.
    pub fn colors(self) -> [Color; 4] {
        let hex: [u32; 4] = match self {
            Theme::Cosmic => [0x0ea5e9, 0x2dd4bf, 0x06b6d4, 0x4f46e5],
            Theme::Mystic => [0x8b5cf6, 0xd946ef, 0xec4899, 0x6366f1],
            Theme::Sunset => [0xf43f5e, 0xfb923c, 0xfbbf24, 0xbe123c],
            Theme::Ocean => [0x0369a1, 0x0891b2, 0x0d9488, 0x1e40af],
            Theme::Forest => [0x059669, 0x16a34a, 0x84cc16, 0x065f46],
            Theme::Aurora => [0x2dd4bf, 0x84cc16, 0x3b82f6, 0x10b981],
        };
        hex.map(Color::from_u24)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::from_name(s)
    }
}
