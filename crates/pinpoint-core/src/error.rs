//! Error types for Pinpoint

use thiserror::Error;

/// The main error type for Pinpoint operations
///
/// Picking itself never fails; these cover scene construction,
/// configuration and trace replay.
#[derive(Debug, Error)]
pub enum PinpointError {
    #[error("Node {node} cannot hold children ({kind})")]
    NotAGroup { node: String, kind: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Value out of range: {field} must be {expected}, got {value}")]
    ValueOutOfRange {
        field: String,
        expected: String,
        value: f64,
    },

    #[error("Trace error: {0}")]
    TraceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Pinpoint operations
pub type Result<T> = std::result::Result<T, PinpointError>;

impl From<toml::de::Error> for PinpointError {
    fn from(err: toml::de::Error) -> Self {
        PinpointError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for PinpointError {
    fn from(err: toml::ser::Error) -> Self {
        PinpointError::TomlSerError(err.to_string())
    }
}
