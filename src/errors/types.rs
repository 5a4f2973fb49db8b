//! Error type definitions for the playlist catalog
//!
//! Fetch failures are per-source and get folded into placeholder entries by the
//! loader; load failures are the only errors a caller of `load` ever sees.

use thiserror::Error;

/// Failure to retrieve one playlist source
///
/// Callers treat every variant as the same opaque "source unreachable" outcome.
/// The split only exists so logs can say why.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport error, timeout, DNS failure or unreadable body
    #[error("Source unreachable: {url} - {message}")]
    Unreachable { url: String, message: String },

    /// The server answered with anything other than 200
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Errors surfaced to the caller of a catalog load
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The submitted URL list was empty
    #[error("No playlist sources were provided")]
    NoSources,

    /// The load was aborted before every source completed
    #[error("Load cancelled after {completed} of {total} sources")]
    Cancelled { completed: usize, total: usize },
}

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog load errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Source retrieval errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors while exporting a playlist
    #[error("Export failed for {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// External player could not be started
    #[error("Failed to launch player '{command}': {source}")]
    Player {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Create an unreachable error
    pub fn unreachable<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Unreachable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// URL of the source that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Unreachable { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

impl AppError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
