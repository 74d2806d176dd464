//! Error types for swing configuration.

use std::fmt;

/// Errors raised while loading or validating swing settings.
///
/// The per-tick simulation never fails; these only surface at construction
/// and configuration time.
#[derive(Debug, Clone, PartialEq)]
pub enum SwingError {
    /// An anchor category name is empty, so anchors can never be discovered.
    MissingCategory { which: &'static str },
    /// A numeric setting is out of its valid range.
    InvalidSetting { name: &'static str, value: f32 },
    /// Settings JSON could not be parsed or produced.
    Parse(String),
    /// Settings file could not be read or written.
    Io(String),
}

impl fmt::Display for SwingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwingError::MissingCategory { which } => {
                write!(f, "no {} category configured", which)
            }
            SwingError::InvalidSetting { name, value } => {
                write!(f, "setting `{}` has invalid value {}", name, value)
            }
            SwingError::Parse(msg) => write!(f, "settings parse error: {}", msg),
            SwingError::Io(msg) => write!(f, "settings io error: {}", msg),
        }
    }
}

impl std::error::Error for SwingError {}

impl From<serde_json::Error> for SwingError {
    fn from(err: serde_json::Error) -> Self {
        SwingError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for SwingError {
    fn from(err: std::io::Error) -> Self {
        SwingError::Io(err.to_string())
    }
}
