//! Operations the presentation layer calls on top of a loaded catalog
//!
//! - [`filter`]: narrow a channel list by name
//! - [`export`]: write a source's raw playlist text to disk
//! - [`player`]: hand a source URL to an external media player

pub mod export;
pub mod filter;
pub mod player;

pub use export::export_playlist;
pub use filter::filter_channels;
pub use player::PlayerLauncher;
