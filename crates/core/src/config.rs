//! Editor configuration.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `MESH_HISTORY_LIMIT` | usize | 30 | Undo depth |
//! | `MESH_DEBOUNCE_MS` | u64 | 300 | Quiet period before a continuous edit is recorded |
//! | `MESH_INVALID_COLOR_FALLBACK` | `transparent` \| `black` | `transparent` | Substitute for unparseable colors |
//! | `MESH_MIN_LAYERS` | usize | 3 | Lower bound for randomize |
//! | `MESH_MAX_LAYERS` | usize | 8 | Upper bound for randomize |
//!
//! Unparseable values are ignored and the default kept.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::InvalidColorFallback;
use crate::history::HistoryConfig;

pub const DEFAULT_MIN_LAYERS: usize = 3;
pub const DEFAULT_MAX_LAYERS: usize = 8;

/// Hard cap on randomized layer counts.
pub const MAX_RANDOM_LAYERS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    pub history: HistoryConfig,
    /// Color substituted when user input cannot be parsed.
    pub fallback: InvalidColorFallback,
    /// Default lower bound for [`crate::Editor::randomize`].
    pub min_layers: usize,
    /// Default upper bound for [`crate::Editor::randomize`].
    pub max_layers: usize,
    /// PRNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            fallback: InvalidColorFallback::default(),
            min_layers: DEFAULT_MIN_LAYERS,
            max_layers: DEFAULT_MAX_LAYERS,
            seed: None,
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: InvalidColorFallback) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_layer_range(mut self, min: usize, max: usize) -> Self {
        self.min_layers = min;
        self.max_layers = max;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads config from `MESH_*` environment variables over the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EditorConfig::from_env`] with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("MESH_HISTORY_LIMIT") {
            if let Ok(limit) = val.trim().parse::<usize>() {
                config.history.limit = limit;
            }
        }

        if let Some(val) = lookup("MESH_DEBOUNCE_MS") {
            if let Ok(ms) = val.trim().parse::<u64>() {
                config.history.debounce = Duration::from_millis(ms);
            }
        }

        if let Some(val) = lookup("MESH_INVALID_COLOR_FALLBACK") {
            match val.parse::<InvalidColorFallback>() {
                Ok(fallback) => config.fallback = fallback,
                Err(e) => tracing::warn!(error = %e, "ignoring MESH_INVALID_COLOR_FALLBACK"),
            }
        }

        if let Some(val) = lookup("MESH_MIN_LAYERS") {
            if let Ok(n) = val.trim().parse::<usize>() {
                config.min_layers = n;
            }
        }

        if let Some(val) = lookup("MESH_MAX_LAYERS") {
            if let Ok(n) = val.trim().parse::<usize>() {
                config.max_layers = n;
            }
        }

        config.validated()
    }

    /// Clamps values to safe ranges.
    ///
    /// History values go through [`HistoryConfig::validated`]. Layer bounds
    /// are capped at [`MAX_RANDOM_LAYERS`] and `max_layers` is raised to
    /// `min_layers` if it is smaller.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.history = self.history.validated();
        self.min_layers = self.min_layers.min(MAX_RANDOM_LAYERS);
        self.max_layers = self.max_layers.clamp(self.min_layers, MAX_RANDOM_LAYERS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = EditorConfig::default();
        assert_eq!(c.history.limit, 30);
        assert_eq!(c.history.debounce, Duration::from_millis(300));
        assert_eq!(c.fallback, InvalidColorFallback::TransparentBlack);
        assert_eq!((c.min_layers, c.max_layers), (3, 8));
        assert_eq!(c.seed, None);
    }

    #[test]
    fn lookup_overrides_every_field() {
        let c = EditorConfig::from_lookup(lookup_from(&[
            ("MESH_HISTORY_LIMIT", "5"),
            ("MESH_DEBOUNCE_MS", "120"),
            ("MESH_INVALID_COLOR_FALLBACK", "black"),
            ("MESH_MIN_LAYERS", "2"),
            ("MESH_MAX_LAYERS", "4"),
        ]));
        assert_eq!(c.history.limit, 5);
        assert_eq!(c.history.debounce, Duration::from_millis(120));
        assert_eq!(c.fallback, InvalidColorFallback::OpaqueBlack);
        assert_eq!((c.min_layers, c.max_layers), (2, 4));
    }

    #[test]
    fn unparseable_values_keep_defaults() {
        let c = EditorConfig::from_lookup(lookup_from(&[
            ("MESH_HISTORY_LIMIT", "lots"),
            ("MESH_DEBOUNCE_MS", "-1"),
            ("MESH_INVALID_COLOR_FALLBACK", "magenta"),
        ]));
        assert_eq!(c, EditorConfig::default());
    }

    #[test]
    fn empty_lookup_is_default() {
        assert_eq!(EditorConfig::from_lookup(|_| None), EditorConfig::default());
    }

    #[test]
    fn validated_orders_layer_bounds() {
        let c = EditorConfig::default().with_layer_range(6, 2).validated();
        assert_eq!((c.min_layers, c.max_layers), (6, 6));
    }

    #[test]
    fn validated_caps_layer_bounds() {
        let c = EditorConfig::default().with_layer_range(100, 500).validated();
        assert_eq!((c.min_layers, c.max_layers), (MAX_RANDOM_LAYERS, MAX_RANDOM_LAYERS));
    }

    #[test]
    fn validated_clamps_history() {
        let c = EditorConfig::default()
            .with_history(HistoryConfig::default().with_limit(0))
            .validated();
        assert_eq!(c.history.limit, 1);
    }

    #[test]
    fn serde_round_trip() {
        let c = EditorConfig::default().with_seed(9).with_fallback(InvalidColorFallback::OpaqueBlack);
        let json = serde_json::to_string(&c).unwrap();
        let back: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
