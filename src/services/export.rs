//! Verbatim playlist export
//!
//! Export bypasses the parser: the text is fetched fresh and written exactly
//! as received, UTF-8 encoded.

use std::path::Path;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::models::SourceUrl;
use crate::sources::PlaylistFetcher;
use crate::utils::UrlUtils;

/// Fetch `url` and write the raw playlist to `path`, returning the number of
/// bytes written. An existing file at `path` is replaced.
///
/// An empty playlist is not written: `path` is left as it was and 0 is
/// returned.
pub async fn export_playlist<F>(fetcher: &F, url: &SourceUrl, path: &Path) -> AppResult<usize>
where
    F: PlaylistFetcher + ?Sized,
{
    let content = fetcher.fetch(url).await?;
    if content.is_empty() {
        warn!(
            "Playlist from {} is empty, not writing {}",
            UrlUtils::obfuscate_credentials(url.as_str()),
            path.display()
        );
        return Ok(0);
    }

    tokio::fs::write(path, content.as_bytes())
        .await
        .map_err(|source| AppError::Export {
            path: path.display().to_string(),
            source,
        })?;

    info!(
        "Exported {} bytes from {} to {}",
        content.len(),
        UrlUtils::obfuscate_credentials(url.as_str()),
        path.display()
    );
    Ok(content.len())
}
