//! Utility modules for the iptv-catalog crate

pub mod url;

pub use url::UrlUtils;
