//! Subcommand implementations.
//!
//! Each command returns a [`Report`] carrying both a human-readable and a
//! JSON rendering; `main` picks one based on `--json`.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use mesh_core::{
    is_valid, share, BlendMode, Color, ColorFormat, Editor, EditorConfig, MeshDocument,
    MeshError, Notation, Theme,
};
use serde_json::json;

use crate::error::CliError;

#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub json: serde_json::Value,
}

/// `--to` target for `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    One(ColorFormat),
}

impl FromStr for Target {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Target::All)
        } else {
            s.parse().map(Target::One)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str("all"),
            Target::One(format) => write!(f, "{format}"),
        }
    }
}

pub fn convert(input: &str, target: Target) -> Result<Report, CliError> {
    let color = Color::parse(input)?;
    let formats: Vec<ColorFormat> = match target {
        Target::All => ColorFormat::ALL.to_vec(),
        Target::One(format) => vec![format],
    };

    let rendered: Vec<(ColorFormat, String)> =
        formats.into_iter().map(|f| (f, color.format(f))).collect();

    let text = match rendered.as_slice() {
        [(_, only)] => only.clone(),
        many => many
            .iter()
            .map(|(f, s)| format!("{:<6} {s}", f.name()))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let mut map = serde_json::Map::new();
    map.insert("input".into(), json!(input));
    for (format, value) in &rendered {
        map.insert(format.name().into(), json!(value));
    }
    Ok(Report {
        text,
        json: serde_json::Value::Object(map),
    })
}

/// Reports validity; an invalid input is an input error so the exit code
/// reflects the answer.
pub fn validate(text: &str, notation: Option<Notation>) -> Result<Report, CliError> {
    let scope = notation.map_or_else(|| "any notation".to_string(), |n| n.to_string());
    if is_valid(text, notation) {
        Ok(Report {
            text: format!("valid ({scope})"),
            json: json!({ "input": text, "notation": scope, "valid": true }),
        })
    } else {
        Err(CliError::Input(format!("'{}' is not a valid color ({scope})", text.trim())))
    }
}

/// Reads a document as JSON from `path`, or from stdin when `path` is `-`.
pub fn read_document(path: &Path) -> Result<MeshDocument, CliError> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?
    };
    serde_json::from_str(&raw)
        .map_err(|e| CliError::Input(format!("{}: invalid document: {e}", path.display())))
}

pub fn share_encode(path: &Path) -> Result<Report, CliError> {
    let doc = read_document(path)?;
    let token = share::encode(&doc)?;
    Ok(Report {
        json: json!({ "token": token, "layers": doc.layer_count() }),
        text: token,
    })
}

pub fn share_decode(token: &str) -> Result<Report, CliError> {
    let doc = share::decode(token)?;
    let value = serde_json::to_value(&doc)?;
    Ok(Report {
        text: serde_json::to_string_pretty(&value)?,
        json: value,
    })
}

#[derive(Debug, Default, Clone)]
pub struct RandomOptions {
    pub seed: Option<u64>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub theme: Option<Theme>,
    pub base: Option<String>,
    pub share: bool,
}

/// Builds a randomized (or themed) document.
pub fn random(opts: &RandomOptions, config: EditorConfig) -> Result<Report, CliError> {
    let config = match opts.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    let base = opts.base.as_deref().map(|s| Color::parse(s)).transpose()?;
    let mut editor = Editor::new(config);

    match opts.theme {
        Some(theme) => {
            if let Some(base) = base {
                editor.set_base_color(base);
            }
            editor.apply_theme(theme);
        }
        None => {
            let min = opts.min.unwrap_or(editor.config().min_layers);
            let max = opts.max.unwrap_or(editor.config().max_layers).max(min);
            editor.randomize(min, max, base)?;
        }
    }

    let doc = editor.document();
    if opts.share {
        let token = share::encode(doc)?;
        return Ok(Report {
            json: json!({ "token": token, "layers": doc.layer_count() }),
            text: token,
        });
    }
    let value = serde_json::to_value(doc)?;
    Ok(Report {
        text: serde_json::to_string_pretty(&value)?,
        json: value,
    })
}

pub fn list() -> Report {
    let themes = Theme::list_names();
    let formats: Vec<&str> = ColorFormat::ALL.iter().map(|f| f.name()).collect();
    let notations: Vec<&str> = Notation::ALL.iter().map(|n| n.name()).collect();
    let blend_modes: Vec<&str> = BlendMode::ALL.iter().map(|m| m.css_name()).collect();

    let mut text = String::from("Themes:\n");
    for theme in Theme::ALL {
        let colors: Vec<String> = theme.colors().iter().map(Color::to_hex).collect();
        text.push_str(&format!("  {:<8} {}\n", theme.name(), colors.join(" ")));
    }
    text.push_str(&format!("Formats:\n  {}\n", formats.join(", ")));
    text.push_str(&format!("Notations:\n  {}\n", notations.join(", ")));
    text.push_str(&format!("Blend modes:\n  {}", blend_modes.join(", ")));

    Report {
        text,
        json: json!({
            "themes": themes,
            "formats": formats,
            "notations": notations,
            "blend_modes": blend_modes,
        }),
    }
}
