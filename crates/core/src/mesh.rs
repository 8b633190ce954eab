//! Mesh gradient document model.
//!
//! A [`MeshDocument`] is a base color plus an ordered stack of blurred,
//! organically-shaped color [`Layer`]s. Index 0 is the bottom layer.
//! Geometry values are CSS percentages; each geometry field is an array so a
//! layer can carry keyframes, though the editor only ever writes one value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::MeshError;
use crate::prng::Xorshift64;

/// Base color of a fresh document (`#020617`).
pub const DEFAULT_BASE_COLOR: u32 = 0x02_06_17;

/// CSS `mix-blend-mode` applied when a layer is composited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    /// The CSS keyword.
    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for BlendMode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BlendMode::ALL
            .into_iter()
            .find(|m| m.css_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MeshError::Serialization(format!("unknown blend mode '{wanted}'")))
    }
}

/// Screen region a random layer is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::TopLeft,
        Region::TopRight,
        Region::BottomLeft,
        Region::BottomRight,
        Region::Center,
    ];

    /// Inclusive `(x, y)` percentage ranges for the region.
    pub fn bounds(self) -> ((usize, usize), (usize, usize)) {
        match self {
            Region::TopLeft => ((5, 35), (5, 35)),
            Region::TopRight => ((65, 95), (5, 35)),
            Region::BottomLeft => ((5, 35), (65, 95)),
            Region::BottomRight => ((65, 95), (65, 95)),
            Region::Center => ((35, 65), (35, 65)),
        }
    }

    fn pick(rng: &mut Xorshift64) -> Self {
        Region::ALL[rng.next_usize(Region::ALL.len())]
    }
}

/// One blurred color blob in the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: u64,
    pub color: Color,
    /// Horizontal position, percent.
    pub x: Vec<f64>,
    /// Vertical position, percent.
    pub y: Vec<f64>,
    /// Blur radius, percent of the layer size.
    pub blur: Vec<f64>,
    /// Opacity, percent.
    pub opacity: Vec<f64>,
    /// Diameter, percent of the canvas.
    pub size: f64,
    /// CSS `border-radius` value.
    pub border_radius: String,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl Layer {
    /// Creates a randomized layer.
    ///
    /// Picks a region, then an integer position inside it, a size of 40-50,
    /// a blur of 80-90 and an organic eight-value border radius. Without an
    /// explicit color a random opaque `#rrggbb` is drawn.
    pub fn random(id: u64, color: Option<Color>, rng: &mut Xorshift64) -> Self {
        let ((x_min, x_max), (y_min, y_max)) = Region::pick(rng).bounds();
        let x = rng.next_inclusive(x_min, x_max) as f64;
        let y = rng.next_inclusive(y_min, y_max) as f64;
        let color = color.unwrap_or_else(|| Color::from_u24(rng.next_u24()));
        let size = rng.next_inclusive(40, 50) as f64;
        let blur = rng.next_inclusive(80, 90) as f64;
        let border_radius = organic_radius(rng);

        Self {
            id,
            color,
            x: vec![x],
            y: vec![y],
            blur: vec![blur],
            opacity: vec![100.0],
            size,
            border_radius,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// Eight 30-79% radii, `"a b c d / e f g h"`.
fn organic_radius(rng: &mut Xorshift64) -> String {
    let mut radius = || format!("{}%", rng.next_inclusive(30, 79));
    let horizontal: Vec<String> = (0..4).map(|_| radius()).collect();
    let vertical: Vec<String> = (0..4).map(|_| radius()).collect();
    format!("{} / {}", horizontal.join(" "), vertical.join(" "))
}

/// A base color and a bottom-to-top stack of layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDocument {
    base_color: Color,
    layers: Vec<Layer>,
}

impl Default for MeshDocument {
    fn default() -> Self {
        Self::new(Color::from_u24(DEFAULT_BASE_COLOR))
    }
}

impl MeshDocument {
    /// Creates an empty document.
    pub fn new(base_color: Color) -> Self {
        Self {
            base_color,
            layers: Vec::new(),
        }
    }

    pub fn with_layers(base_color: Color, layers: Vec<Layer>) -> Self {
        Self { base_color, layers }
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn set_base_color(&mut self, color: Color) {
        self.base_color = color;
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns `MeshError::LayerNotFound` when `index` is out of range.
    pub fn layer(&self, index: usize) -> Result<&Layer, MeshError> {
        self.layers.get(index).ok_or(MeshError::LayerNotFound(index))
    }

    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer, MeshError> {
        self.layers
            .get_mut(index)
            .ok_or(MeshError::LayerNotFound(index))
    }

    /// Adds a layer on top of the stack.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Inserts at `index`, clamped to the top of the stack.
    pub fn insert_layer(&mut self, index: usize, layer: Layer) {
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, MeshError> {
        if index >= self.layers.len() {
            return Err(MeshError::LayerNotFound(index));
        }
        Ok(self.layers.remove(index))
    }

    /// Swaps in `layer` at `index` and returns the old one.
    pub fn replace_layer(&mut self, index: usize, layer: Layer) -> Result<Layer, MeshError> {
        let slot = self.layer_mut(index)?;
        Ok(std::mem::replace(slot, layer))
    }

    pub fn clear_layers(&mut self) {
        self.layers.clear();
    }

    /// Largest layer id in the document, if any.
    pub fn max_layer_id(&self) -> Option<u64> {
        self.layers.iter().map(|l| l.id).max()
    }
}
