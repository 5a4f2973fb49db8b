//! Centralized error handling for the playlist catalog
//!
//! # Error Categories
//!
//! - **Fetch Errors**: a single playlist source could not be retrieved
//! - **Load Errors**: a whole catalog load was rejected or aborted
//! - **App Errors**: everything the command-line layer reports, including
//!   configuration, export and player failures
//!
//! The parser has no error type: malformed input yields fewer channels.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Fetch Results
pub type FetchResult<T> = Result<T, FetchError>;

/// Convenience type alias for Load Results
pub type LoadResult<T> = Result<T, LoadError>;
