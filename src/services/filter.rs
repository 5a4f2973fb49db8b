//! Channel name filtering

use crate::models::{Channel, ChannelList};

/// Channels whose name contains `query`, ignoring case.
///
/// An empty query keeps everything. The input is never modified and the
/// relative order of the kept channels is preserved, so filtering the output
/// again with the same query returns it unchanged.
pub fn filter_channels(channels: &[Channel], query: &str) -> ChannelList {
    if query.is_empty() {
        return channels.to_vec();
    }

    let needle = query.to_lowercase();
    channels
        .iter()
        .filter(|channel| channel.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
