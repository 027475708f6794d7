//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, defaulting or validating a configuration.
///
/// `Io` and `Parse` are load errors: the file could not be read or is not a
/// well-formed document of the expected shape. The remaining variants are
/// semantic and carry the option name (and rejected value) verbatim so the
/// message can be shown to the operator as-is.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown option {0:?}")]
    UnknownOption(String),

    #[error("option {option:?} does not support {value:?}")]
    InvalidOption { option: String, value: String },

    #[error("option {0:?} not specified")]
    MissingOption(String),
}

impl ConfigError {
    pub(crate) fn invalid(option: &str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.to_string(),
            value: value.into(),
        }
    }

    pub(crate) fn missing(option: &str) -> Self {
        Self::MissingOption(option.to_string())
    }

    /// Get a static label for structured log fields.
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::Parse(_) => "load",
            Self::UnknownOption(_) => "unknown_option",
            Self::InvalidOption { .. } => "invalid_option",
            Self::MissingOption(_) => "missing_option",
        }
    }

    /// The option this error refers to, if it names one.
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::UnknownOption(key) => Some(key),
            Self::InvalidOption { option, .. } => Some(option),
            Self::MissingOption(option) => Some(option),
            Self::Io { .. } | Self::Parse(_) => None,
        }
    }
}
