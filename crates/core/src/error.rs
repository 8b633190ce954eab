//! Error types for the mesh gradient core.

use thiserror::Error;

/// Errors produced by color parsing, document editing and the share codec.
///
/// None of these are fatal: every variant is a value the caller can recover
/// from locally (substitute a fallback color, keep the live document, tell the
/// user a link was invalid).
#[derive(Debug, Error)]
pub enum MeshError {
    /// The input matched no supported color notation.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A layer index was outside the document's layer list.
    #[error("layer index {0} out of range")]
    LayerNotFound(usize),

    /// A randomize request asked for fewer layers than its minimum.
    #[error("invalid layer range: min {min} is greater than max {max}")]
    InvalidLayerRange { min: usize, max: usize },

    /// A theme name was not recognized.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A share token could not be decompressed, parsed or validated.
    #[error("share link is corrupt: {0}")]
    ShareLinkCorrupt(String),

    /// A document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MeshError {
    fn from(e: serde_json::Error) -> Self {
        MeshError::Serialization(e.to_string())
    }
}
