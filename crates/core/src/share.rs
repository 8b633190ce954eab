//! Share-link codec.
//!
//! A document is flattened to a minimal JSON record (hex colors, geometry
//! arrays, border descriptor, blend mode), compressed with raw DEFLATE and
//! encoded as unpadded URL-safe base64 so the token can sit in a query
//! string unescaped.
//!
//! Decoding never panics: every failure comes back as
//! [`MeshError::ShareLinkCorrupt`] and leaves the caller's live document
//! alone.

use std::io::{Read, Write};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::MeshError;
use crate::mesh::{BlendMode, Layer, MeshDocument};

/// Upper bound on the inflated JSON size of a token.
pub const MAX_DECODED_BYTES: u64 = 1 << 20;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharedDocument {
    base_color: String,
    layers: Vec<SharedLayer>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharedLayer {
    id: u64,
    color: String,
    x: Vec<f64>,
    y: Vec<f64>,
    blur: Vec<f64>,
    opacity: Vec<f64>,
    size: f64,
    border_radius: String,
    #[serde(default)]
    blend_mode: BlendMode,
}

impl From<&MeshDocument> for SharedDocument {
    fn from(doc: &MeshDocument) -> Self {
        Self {
            base_color: doc.base_color().to_hex(),
            layers: doc
                .layers()
                .iter()
                .map(|l| SharedLayer {
                    id: l.id,
                    color: l.color.to_hex(),
                    x: l.x.clone(),
                    y: l.y.clone(),
                    blur: l.blur.clone(),
                    opacity: l.opacity.clone(),
                    size: l.size,
                    border_radius: l.border_radius.clone(),
                    blend_mode: l.blend_mode,
                })
                .collect(),
        }
    }
}

impl SharedDocument {
    /// Rebuilds full colors, rejecting any that fail to parse.
    fn into_document(self) -> Result<MeshDocument, MeshError> {
        let base = parse_shared_color(&self.base_color, "baseColor")?;
        let layers = self
            .layers
            .into_iter()
            .enumerate()
            .map(|(i, l)| {
                Ok(Layer {
                    id: l.id,
                    color: parse_shared_color(&l.color, &format!("layers[{i}].color"))?,
                    x: l.x,
                    y: l.y,
                    blur: l.blur,
                    opacity: l.opacity,
                    size: l.size,
                    border_radius: l.border_radius,
                    blend_mode: l.blend_mode,
                })
            })
            .collect::<Result<Vec<_>, MeshError>>()?;
        Ok(MeshDocument::with_layers(base, layers))
    }
}

fn parse_shared_color(text: &str, field: &str) -> Result<Color, MeshError> {
    Color::parse(text).map_err(|e| MeshError::ShareLinkCorrupt(format!("{field}: {e}")))
}

/// Encodes a document into a URL-safe share token.
pub fn encode(doc: &MeshDocument) -> Result<String, MeshError> {
    let json = serde_json::to_vec(&SharedDocument::from(doc))?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| MeshError::Serialization(format!("compress: {e}")))?;
    let compressed = encoder
        .finish()
        .map_err(|e| MeshError::Serialization(format!("compress: {e}")))?;

    let token = URL_SAFE_NO_PAD.encode(compressed);
    tracing::debug!(json_bytes = json.len(), token_len = token.len(), "encoded share token");
    Ok(token)
}

/// Decodes a share token back into a document.
pub fn decode(token: &str) -> Result<MeshDocument, MeshError> {
    decode_inner(token.trim()).map_err(|e| {
        tracing::warn!(error = %e, "share link rejected");
        e
    })
}

fn decode_inner(token: &str) -> Result<MeshDocument, MeshError> {
    if token.is_empty() {
        return Err(corrupt("empty token"));
    }

    let compressed = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| corrupt(format!("base64: {e}")))?;

    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_DECODED_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|e| corrupt(format!("inflate: {e}")))?;
    if json.len() as u64 > MAX_DECODED_BYTES {
        return Err(corrupt("decoded payload too large"));
    }
    if json.is_empty() {
        return Err(corrupt("empty payload"));
    }

    let shared: SharedDocument =
        serde_json::from_slice(&json).map_err(|e| corrupt(format!("json: {e}")))?;
    shared.into_document()
}

fn corrupt(reason: impl Into<String>) -> MeshError {
    MeshError::ShareLinkCorrupt(reason.into())
}
