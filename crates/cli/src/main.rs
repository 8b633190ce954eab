#![deny(unsafe_code)]
//! CLI binary for the mesh gradient editor.
//!
//! Subcommands:
//! - `convert <color>`: print a color in one or every notation
//! - `validate <text>`: check text against a notation
//! - `share encode <file>` / `share decode <token>`: share-link codec
//! - `random`: generate a randomized or themed document
//! - `list`: print themes, formats, notations and blend modes
//!
//! Logging goes to stderr, filtered by `MESH_LOG` (default `warn`).

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::{RandomOptions, Report, Target};
use error::CliError;
use mesh_core::{EditorConfig, Notation, Theme};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mesh", about = "Mesh gradient color and document tool")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a color to other notations.
    Convert {
        /// Any hex, rgb(), hsv(), oklch() or CSS named color.
        color: String,

        /// Output notation: hex, rgb, hsv, oklch or all.
        #[arg(long, default_value_t = Target::All)]
        to: Target,
    },
    /// Check whether text is a valid color. Exits 12 if not.
    Validate {
        text: String,

        /// Restrict to one notation (hex, rgb, hsv, oklch, named-color).
        #[arg(long)]
        notation: Option<Notation>,
    },
    /// Encode or decode share links.
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// Generate a randomized document.
    Random {
        /// PRNG seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Minimum layer count (default from MESH_MIN_LAYERS or 3).
        #[arg(long)]
        min: Option<usize>,

        /// Maximum layer count (default from MESH_MAX_LAYERS or 8).
        #[arg(long)]
        max: Option<usize>,

        /// Use a built-in theme's colors instead of random ones.
        #[arg(short, long)]
        theme: Option<Theme>,

        /// Base color.
        #[arg(long)]
        base: Option<String>,

        /// Print a share token instead of the document JSON.
        #[arg(long)]
        share: bool,
    },
    /// List themes, formats, notations and blend modes.
    List,
}

#[derive(Subcommand)]
enum ShareAction {
    /// Encode a document JSON file (`-` for stdin) as a share token.
    Encode { file: PathBuf },
    /// Decode a share token to document JSON.
    Decode { token: String },
}

fn run(cli: Cli) -> Result<Report, CliError> {
    match cli.command {
        Command::Convert { color, to } => commands::convert(&color, to),
        Command::Validate { text, notation } => commands::validate(&text, notation),
        Command::Share { action } => match action {
            ShareAction::Encode { file } => commands::share_encode(&file),
            ShareAction::Decode { token } => commands::share_decode(&token),
        },
        Command::Random {
            seed,
            min,
            max,
            theme,
            base,
            share,
        } => {
            let opts = RandomOptions {
                seed,
                min,
                max,
                theme,
                base,
                share,
            };
            commands::random(&opts, EditorConfig::from_env())
        }
        Command::List => Ok(commands::list()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MESH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let json_mode = cli.json;
    tracing::debug!(json = json_mode, "mesh cli start");
    match run(cli) {
        Ok(report) => {
            if json_mode {
                match serde_json::to_string_pretty(&report.json) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("error: {e}");
                        process::exit(CliError::from(e).exit_code());
                    }
                }
            } else {
                println!("{}", report.text);
            }
        }
        Err(e) => {
            if json_mode {
                let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
                eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
            } else {
                eprintln!("error: {e}");
            }
            process::exit(e.exit_code());
        }
    }
}
