//! End-to-end editing sessions through the public API.

use std::time::{Duration, Instant};

use mesh_core::{
    share, BlendMode, Color, ColorFormat, Editor, EditorConfig, History, HistoryConfig,
    InvalidColorFallback, MeshDocument, MeshError, Theme,
};
use proptest::prelude::*;

fn editor() -> Editor {
    Editor::new(EditorConfig::default().with_seed(7))
}

#[test]
fn fresh_editor_holds_cosmic_theme_over_slate_base() {
    let e = editor();
    let doc = e.document();
    assert_eq!(doc.base_color().to_hex(), "#020617");
    let colors: Vec<Color> = doc.layers().iter().map(|l| l.color).collect();
    assert_eq!(colors, Theme::Cosmic.colors().to_vec());
    assert!(!e.can_undo());
    assert!(!e.can_redo());
}

#[test]
fn slider_drag_records_a_single_snapshot() {
    let mut e = editor();
    let t0 = Instant::now();
    let before = e.document().clone();

    for step in 0..20u32 {
        let now = t0 + Duration::from_millis(u64::from(step) * 16);
        e.edit_layer(0, now, |layer| layer.x = vec![f64::from(step)])
            .unwrap();
    }
    assert!(e.can_undo());
    assert!(!e.tick(t0 + Duration::from_millis(400)));
    assert!(e.tick(t0 + Duration::from_secs(2)));
    assert_eq!(e.history().past().len(), 1);

    assert!(e.undo());
    assert_eq!(e.document(), &before);
    assert!(e.redo());
    assert_eq!(e.document().layers()[0].x, vec![19.0]);
}

#[test]
fn undo_mid_drag_keeps_the_drag() {
    let mut e = editor();
    let t0 = Instant::now();
    e.edit_base_color(Color::WHITE, t0);

    assert!(e.undo());
    assert_eq!(e.document().base_color().to_hex(), "#020617");
    assert!(e.redo());
    assert_eq!(e.document().base_color(), Color::WHITE);
}

#[test]
fn discrete_edit_after_undo_clears_redo() {
    let mut e = editor();
    e.add_layer(Some(Color::parse("red").unwrap()));
    e.add_layer(Some(Color::parse("lime").unwrap()));
    assert!(e.undo());
    assert!(e.can_redo());

    e.set_base_color(Color::BLACK);
    assert!(!e.can_redo());
    assert_eq!(e.document().layer_count(), 5);
}

#[test]
fn share_link_survives_a_session() {
    let mut source = editor();
    source.apply_theme(Theme::Aurora);
    let idx = source.duplicate_layer(1).unwrap();
    let mut layer = source.document().layers()[idx].clone();
    layer.blend_mode = BlendMode::Screen;
    layer.opacity = vec![55.0];
    source.update_layer(idx, layer).unwrap();
    let token = source.share_token().unwrap();

    let mut target = Editor::new(EditorConfig::default().with_seed(99));
    target.load_shared(&token).unwrap();
    assert_eq!(target.document(), source.document());

    // Fresh ids continue past the loaded ones.
    let added = target.add_layer(None);
    let max_loaded = source.document().max_layer_id().unwrap();
    assert!(target.document().layers()[added].id > max_loaded);
}

#[test]
fn corrupt_share_link_leaves_editor_untouched() {
    let mut e = editor();
    e.add_layer(None);
    let doc = e.document().clone();
    let past = e.history().past().len();

    let err = e.load_shared("not-a-real-token!").unwrap_err();
    assert!(matches!(err, MeshError::ShareLinkCorrupt(_)));
    assert_eq!(e.document(), &doc);
    assert_eq!(e.history().past().len(), past);
}

#[test]
fn randomize_respects_bounds_and_rejects_inverted_range() {
    let mut e = editor();
    for _ in 0..10 {
        let n = e.randomize(2, 4, None).unwrap();
        assert!((2..=4).contains(&n));
        assert_eq!(e.document().layer_count(), n);
    }
    assert!(matches!(
        e.randomize(5, 1, None),
        Err(MeshError::InvalidLayerRange { min: 5, max: 1 })
    ));
}

#[test]
fn configured_fallback_applies_to_user_input() {
    let e = Editor::new(
        EditorConfig::default()
            .with_seed(1)
            .with_fallback(InvalidColorFallback::OpaqueBlack),
    );
    assert_eq!(e.parse_color("#zzzzzz"), Color::BLACK);
    assert_eq!(e.parse_color("rebeccapurple").to_hex(), "#663399");
}

#[test]
fn history_limit_from_config_caps_undo_depth() {
    let config = EditorConfig::default()
        .with_seed(3)
        .with_history(HistoryConfig::default().with_limit(3));
    let mut e = Editor::new(config);
    for _ in 0..10 {
        e.add_layer(None);
    }
    let mut undos = 0;
    while e.undo() {
        undos += 1;
    }
    assert_eq!(undos, 3);
}

#[test]
fn conversions_chain_through_every_notation() {
    let inputs = ["  HSV(210, 50%, 80%) ", "rgb(12, 200, 99)", "darkorange", "#7f3fbf"];
    for input in inputs {
        let c = Color::parse(input).unwrap();
        let want = c.rgba();
        for format in ColorFormat::ALL {
            let text = c.format(format);
            let got = Color::parse(text.as_str()).unwrap().rgba();
            for (a, b) in [(got.r, want.r), (got.g, want.g), (got.b, want.b)] {
                assert!((i16::from(a) - i16::from(b)).abs() <= 1, "{input} via {format}: {text}");
            }
        }
    }
}

#[test]
fn document_json_uses_hex_colors() {
    let e = editor();
    let json = serde_json::to_value(e.document()).unwrap();
    assert_eq!(json["baseColor"], "#020617");
    assert_eq!(json["layers"][0]["color"], "#0ea5e9");
    let back: MeshDocument = serde_json::from_value(json).unwrap();
    assert_eq!(&back, e.document());
}

proptest! {
    #[test]
    fn undo_then_redo_is_identity(ops in prop::collection::vec(0u8..3, 1..20)) {
        let mut h = History::with_config(0i64, HistoryConfig::default().with_limit(50));
        let mut value = 0i64;
        for op in ops {
            match op {
                0 => { value += 1; h.push(&value); }
                1 => { h.undo(); }
                _ => { h.redo(); }
            }
        }
        let present = *h.present();
        let future_len = h.future().len();
        let undone = std::iter::from_fn(|| h.undo().then_some(())).count();
        for _ in 0..undone {
            prop_assert!(h.redo());
        }
        prop_assert_eq!(*h.present(), present);
        prop_assert!(h.future().len() <= future_len + undone);
    }

    #[test]
    fn any_seeded_document_round_trips_through_share(seed in any::<u64>()) {
        let mut e = Editor::new(EditorConfig::default().with_seed(seed));
        e.randomize_default().unwrap();
        let token = e.share_token().unwrap();
        prop_assert_eq!(&share::decode(&token).unwrap(), e.document());
    }
}
