//! Error types for the icon view crate.
//!
//! Layout, hit-testing and selection never fail; the only fallible surface is
//! loading and saving an [`IconViewConfig`](crate::IconViewConfig).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while handling view configuration.
#[derive(Error, Debug)]
pub enum IconViewError {
    /// Reading or writing a configuration file failed.
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML document could not be parsed into a configuration.
    #[error("invalid TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The configuration could not be serialized to TOML.
    #[error("failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The JSON document could not be parsed or produced.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration field holds a value outside its allowed range.
    #[error("invalid value {value} for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },
}

/// Result type for icon view configuration operations.
pub type IconViewResult<T> = Result<T, IconViewError>;
