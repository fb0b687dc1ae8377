//! Error types for the `interleave` application.
//!
//! Uses [`thiserror`] for ergonomic error derivation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in `interleave`.
///
/// Maps to exit codes: configuration problems ([`Config`](Self::Config),
/// [`Regex`](Self::Regex), [`Template`](Self::Template),
/// [`Toml`](Self::Toml)) → exit 1, I/O problems ([`Io`](Self::Io),
/// [`Open`](Self::Open)) → exit 2.
#[derive(Debug, Error)]
pub enum InterleaveError {
    /// Configuration error (bad color, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading an input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file could not be opened at startup.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The line parsing regex does not compile.
    #[error("invalid line parsing regex: {0}")]
    Regex(#[from] regex::Error),

    /// The output template is malformed or names an unknown field.
    #[error("invalid output format: {0}")]
    Template(String),

    /// TOML deserialization error.
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl InterleaveError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) | Self::Open { .. } => 2,
            Self::Config(_) | Self::Regex(_) | Self::Template(_) | Self::Toml(_) => 1,
        }
    }
}
