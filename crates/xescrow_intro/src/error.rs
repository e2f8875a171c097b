//! Error types for xescrow_intro

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating intro configuration
///
/// Generation and timing never fail; every fallible step happens before a
/// page is mounted.
#[derive(Error, Debug)]
pub enum IntroError {
    /// Failed to read a configuration file
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML or has the wrong shape
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside what the generators accept
    #[error("invalid config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl IntroError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        IntroError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for xescrow_intro operations
pub type Result<T> = std::result::Result<T, IntroError>;
