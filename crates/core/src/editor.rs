//! Document controller: owns the live mesh document and its history.
//!
//! Every mutation goes through an [`Editor`] method, which decides how the
//! change is recorded:
//!
//! - discrete edits (add, remove, duplicate, theme, randomize, load) cancel
//!   any pending continuous edit and push a snapshot immediately;
//! - continuous edits ([`Editor::edit_layer`], [`Editor::edit_base_color`])
//!   arm the debounced slot, and [`Editor::tick`] commits once the user
//!   stops.
//!
//! Undo and redo flush a pending edit first so an in-progress drag is never
//! lost, then restore the snapshot with recording suspended.

use std::time::Instant;

use crate::color::Color;
use crate::config::{EditorConfig, MAX_RANDOM_LAYERS};
use crate::error::MeshError;
use crate::history::History;
use crate::mesh::{Layer, MeshDocument, DEFAULT_BASE_COLOR};
use crate::parse::ColorInput;
use crate::prng::Xorshift64;
use crate::share;
use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct Editor {
    document: MeshDocument,
    history: History<MeshDocument>,
    rng: Xorshift64,
    next_id: u64,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Creates an editor holding the default document: a `#020617` base with
    /// one layer per `cosmic` theme color. The history starts empty.
    pub fn new(config: EditorConfig) -> Self {
        let config = config.validated();
        let rng = match config.seed {
            Some(seed) => Xorshift64::new(seed),
            None => Xorshift64::from_clock(),
        };
        let mut editor = Self {
            document: MeshDocument::default(),
            history: History::with_config(MeshDocument::default(), config.history),
            rng,
            next_id: 1,
            config,
        };
        editor.fill_default_document();
        editor.history.reset(&editor.document);
        editor
    }

    pub fn document(&self) -> &MeshDocument {
        &self.document
    }

    pub fn history(&self) -> &History<MeshDocument> {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.history.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -- Discrete edits --

    /// Adds a random layer on top, with `color` or a random one. Returns its index.
    pub fn add_layer(&mut self, color: Option<Color>) -> usize {
        let layer = self.make_layer(color);
        self.document.push_layer(layer);
        self.commit("add layer");
        self.document.layer_count() - 1
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, MeshError> {
        let removed = self.document.remove_layer(index)?;
        self.commit("remove layer");
        Ok(removed)
    }

    /// Copies the layer at `index` under a new id, directly above the source.
    /// Returns the copy's index.
    pub fn duplicate_layer(&mut self, index: usize) -> Result<usize, MeshError> {
        let mut copy = self.document.layer(index)?.clone();
        copy.id = self.fresh_id();
        self.document.insert_layer(index + 1, copy);
        self.commit("duplicate layer");
        Ok(index + 1)
    }

    pub fn update_layer(&mut self, index: usize, layer: Layer) -> Result<(), MeshError> {
        self.document.replace_layer(index, layer)?;
        self.commit("update layer");
        Ok(())
    }

    pub fn set_base_color(&mut self, color: Color) {
        self.document.set_base_color(color);
        self.commit("set base color");
    }

    /// Replaces every layer with between `min` and `max` random layers
    /// (inclusive), optionally setting a new base color. Returns the count.
    ///
    /// `max` is capped at [`MAX_RANDOM_LAYERS`].
    pub fn randomize(
        &mut self,
        min: usize,
        max: usize,
        base_color: Option<Color>,
    ) -> Result<usize, MeshError> {
        if min > max {
            return Err(MeshError::InvalidLayerRange { min, max });
        }
        let max = max.min(MAX_RANDOM_LAYERS);
        let min = min.min(max);

        if let Some(base) = base_color {
            self.document.set_base_color(base);
        }
        let count = self.rng.next_inclusive(min, max);
        self.document.clear_layers();
        for _ in 0..count {
            let layer = self.make_layer(None);
            self.document.push_layer(layer);
        }
        self.commit("randomize");
        Ok(count)
    }

    /// [`Editor::randomize`] with the configured layer bounds.
    pub fn randomize_default(&mut self) -> Result<usize, MeshError> {
        let (min, max) = (self.config.min_layers, self.config.max_layers);
        self.randomize(min, max, None)
    }

    /// Replaces every layer with one random layer per theme color.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.fill_theme(theme);
        self.commit("apply theme");
    }

    /// Restores the default base color and the `cosmic` theme.
    pub fn reset(&mut self) {
        self.fill_default_document();
        self.commit("reset");
    }

    /// Replaces the live document with a copy of `doc`.
    pub fn load_document(&mut self, doc: MeshDocument) {
        if let Some(max_id) = doc.max_layer_id() {
            self.next_id = self.next_id.max(max_id.saturating_add(1));
        }
        self.document = doc;
        self.commit("load document");
    }

    /// Decodes a share token and loads it.
    ///
    /// On error the live document and history are untouched.
    pub fn load_shared(&mut self, token: &str) -> Result<(), MeshError> {
        let doc = share::decode(token)?;
        self.load_document(doc);
        Ok(())
    }

    // -- Continuous edits --

    /// Mutates the layer at `index` in place and arms a debounced snapshot.
    pub fn edit_layer(
        &mut self,
        index: usize,
        now: Instant,
        edit: impl FnOnce(&mut Layer),
    ) -> Result<(), MeshError> {
        edit(self.document.layer_mut(index)?);
        self.history.debounced_push(&self.document, now);
        Ok(())
    }

    pub fn edit_base_color(&mut self, color: Color, now: Instant) {
        self.document.set_base_color(color);
        self.history.debounced_push(&self.document, now);
    }

    /// Drives the debounce timer. Returns whether a snapshot was committed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.poll(now)
    }

    // -- History --

    pub fn undo(&mut self) -> bool {
        self.history.flush();
        self.restore(History::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.history.flush();
        self.restore(History::redo)
    }

    // -- Helpers --

    /// Encodes the live document as a share token.
    pub fn share_token(&self) -> Result<String, MeshError> {
        share::encode(&self.document)
    }

    /// Parses user input, substituting the configured fallback on failure.
    pub fn parse_color<'a>(&self, input: impl Into<ColorInput<'a>>) -> Color {
        Color::parse_or(input, self.config.fallback)
    }

    fn restore(&mut self, step: fn(&mut History<MeshDocument>) -> bool) -> bool {
        self.history.suspend();
        let moved = step(&mut self.history);
        if moved {
            self.document = self.history.present().clone();
        }
        self.history.resume();
        moved
    }

    fn commit(&mut self, action: &'static str) {
        self.history.cancel_pending();
        self.history.push(&self.document);
        tracing::debug!(action, layers = self.document.layer_count(), "recorded edit");
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn make_layer(&mut self, color: Option<Color>) -> Layer {
        let id = self.fresh_id();
        Layer::random(id, color, &mut self.rng)
    }

    fn fill_theme(&mut self, theme: Theme) {
        self.document.clear_layers();
        for color in theme.colors() {
            let layer = self.make_layer(Some(color));
            self.document.push_layer(layer);
        }
    }

    fn fill_default_document(&mut self) {
        self.document.set_base_color(Color::from_u24(DEFAULT_BASE_COLOR));
        self.fill_theme(Theme::Cosmic);
    }
}
