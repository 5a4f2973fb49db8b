//! Playlist sources: where raw text comes from and how it becomes channels
//!
//! - [`fetcher`]: the [`PlaylistFetcher`] seam and its HTTP implementation
//! - [`m3u`]: the extended-M3U parser
//!
//! Source lists arrive as free text, one URL per line:
//!
//! ```rust
//! use iptv_catalog::sources::parse_source_list;
//!
//! let urls = parse_source_list("http://a/list.m3u\n\n  http://b/list.m3u  \n");
//! assert_eq!(urls.len(), 2);
//! assert_eq!(urls[1].as_str(), "http://b/list.m3u");
//! ```

pub mod fetcher;
pub mod m3u;

pub use fetcher::{HttpFetcher, PlaylistFetcher};
pub use m3u::{group_channels, parse_playlist};

use crate::models::SourceUrl;

/// Split user-entered text into source URLs, one per line.
///
/// Surrounding whitespace is trimmed and blank lines are dropped. Order and
/// duplicates are preserved; deduplication is the loader's job.
pub fn parse_source_list(text: &str) -> Vec<SourceUrl> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(SourceUrl::from)
        .collect()
}
