//! CLI errors and their exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: core error (layer range, corrupt share link)
//! - 11: I/O error (reading a document file or stdin)
//! - 12: input error (unparseable color, unknown theme, invalid text)
//! - 13: serialization error

use mesh_core::MeshError;
use std::fmt;

pub enum CliError {
    Core(MeshError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CliError({}): {self}", self.exit_code())
    }
}

impl From<MeshError> for CliError {
    fn from(e: MeshError) -> Self {
        match e {
            MeshError::Serialization(msg) => CliError::Serialization(msg),
            e @ (MeshError::InvalidColor(_) | MeshError::UnknownTheme(_)) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Core(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::Core(MeshError::LayerNotFound(1)).exit_code(), 10);
        assert_eq!(CliError::Io("read failed".into()).exit_code(), 11);
        assert_eq!(CliError::Input("bad color".into()).exit_code(), 12);
        assert_eq!(CliError::Serialization("json".into()).exit_code(), 13);
    }

    #[test]
    fn corrupt_share_link_is_core_error() {
        let err = CliError::from(MeshError::ShareLinkCorrupt("bad base64".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("bad base64"));
    }

    #[test]
    fn invalid_color_is_input_error() {
        let err = CliError::from(MeshError::InvalidColor("'zz' matches nothing".into()));
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn unknown_theme_is_input_error() {
        let err = CliError::from(MeshError::UnknownTheme("vaporwave".into()));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn mesh_serialization_routes_to_cli_serialization() {
        let err = CliError::from(MeshError::Serialization("disk full".into()));
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        assert_eq!(CliError::from(bad_json.unwrap_err()).exit_code(), 13);
    }

    #[test]
    fn std_io_error_routes_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err = CliError::from(io);
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("missing.json"));
    }
}
