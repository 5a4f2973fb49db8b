//! Concurrent ingestion of extended-M3U playlists into a per-source catalog.
//!
//! ```no_run
//! use iptv_catalog::{
//!     config::Config, ingestor::CatalogLoader, services::filter_channels,
//!     sources::{HttpFetcher, parse_source_list},
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let loader = CatalogLoader::new(HttpFetcher::new(&config.fetch)?, &config.ingestion);
//! let urls = parse_source_list("http://example.com/a.m3u\nhttp://example.com/b.m3u");
//!
//! let (catalog, _report) = loader.load(&urls, None).await?;
//! for (url, channels) in catalog.iter() {
//!     println!("{url}: {} news channels", filter_channels(channels, "news").len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod errors;
pub mod ingestor;
pub mod models;
pub mod observability;
pub mod services;
pub mod sources;
pub mod utils;
