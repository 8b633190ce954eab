#![deny(unsafe_code)]
//! Core of the mesh gradient editor.
//!
//! Provides the canonical [`Color`] value with hex/RGB/HSV/OKLCH parsing and
//! formatting, a generic undo/redo [`History`] with debounced recording, the
//! [`MeshDocument`] model, built-in [`Theme`]s, the share-link codec and the
//! [`Editor`] that ties them together.

pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod mesh;
pub mod named;
pub mod parse;
pub mod prng;
pub mod share;
pub mod theme;

pub use color::{Color, ColorFormat, Hsva, InvalidColorFallback, Oklcha, Rgba};
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::MeshError;
pub use history::{History, HistoryConfig, HistoryState};
pub use mesh::{BlendMode, Layer, MeshDocument};
pub use parse::{is_valid, ColorInput, Notation};
pub use prng::Xorshift64;
pub use theme::Theme;
