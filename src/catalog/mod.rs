//! Per-source channel catalog
//!
//! The catalog maps each submitted [`SourceUrl`] to its entry: the parsed
//! channel list, or the single-element failure placeholder when the source
//! could not be fetched. Listing order is submission order and is recorded
//! separately from the entries, so sources that finish out of order still
//! list the way they were entered.
//!
//! Writers go through [`Catalog::begin_load`] and [`Catalog::install`], which
//! the loader calls while holding the only `&mut` to the catalog. An entry is
//! installed whole in a single call and a key is never written twice in one
//! load.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::models::{Channel, ChannelList, SourceUrl, is_failure};
use crate::services::filter::filter_channels;
use crate::sources::group_channels;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    order: Vec<SourceUrl>,
    registered: HashSet<SourceUrl>,
    entries: HashMap<SourceUrl, ChannelList>,
    loaded_at: Option<DateTime<Utc>>,
}

/// One source as presented to a reader: its URL, whether it failed, and its
/// channels narrowed by the active query
#[derive(Debug, Clone, Serialize)]
pub struct SourceListing<'a> {
    pub url: &'a SourceUrl,
    pub failed: bool,
    pub channels: ChannelList,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and the recorded source order
    pub fn clear(&mut self) {
        self.order.clear();
        self.registered.clear();
        self.entries.clear();
        self.loaded_at = None;
    }

    /// Reset the catalog and record the submission order for a new load.
    /// Duplicate URLs keep their first position only.
    pub fn begin_load<I>(&mut self, sources: I)
    where
        I: IntoIterator<Item = SourceUrl>,
    {
        self.clear();
        for url in sources {
            if self.registered.insert(url.clone()) {
                self.order.push(url);
            }
        }
        debug!("Catalog reset for {} sources", self.order.len());
    }

    /// Install the complete entry for one source.
    ///
    /// Returns false, leaving the catalog untouched, when the source was not
    /// registered by [`begin_load`](Self::begin_load) or already has an entry.
    pub fn install(&mut self, url: SourceUrl, entry: ChannelList) -> bool {
        if !self.registered.contains(&url) || self.entries.contains_key(&url) {
            return false;
        }
        self.entries.insert(url, entry);
        true
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded_at = Some(Utc::now());
    }

    /// When the last load completed, if it did
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn get(&self, url: &SourceUrl) -> Option<&[Channel]> {
        self.entries.get(url).map(Vec::as_slice)
    }

    /// Number of sources with an installed entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every registered source has its entry
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.entries.len()
    }

    /// Sources with an entry, in submission order
    pub fn sources(&self) -> impl Iterator<Item = &SourceUrl> {
        self.order.iter().filter(|url| self.entries.contains_key(*url))
    }

    /// `(url, entry)` pairs in submission order
    pub fn iter(&self) -> impl Iterator<Item = (&SourceUrl, &[Channel])> {
        self.order
            .iter()
            .filter_map(|url| self.entries.get(url).map(|entry| (url, entry.as_slice())))
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceUrl> {
        self.iter().filter(|(_, entry)| is_failure(entry)).map(|(url, _)| url)
    }

    pub fn successful_sources(&self) -> impl Iterator<Item = &SourceUrl> {
        self.iter().filter(|(_, entry)| !is_failure(entry)).map(|(url, _)| url)
    }

    /// Channels across all successfully loaded sources
    pub fn total_channels(&self) -> usize {
        self.iter()
            .filter(|(_, entry)| !is_failure(entry))
            .map(|(_, entry)| entry.len())
            .sum()
    }

    /// Entry for `url` narrowed by `query`; `None` for an unknown source
    pub fn filtered(&self, url: &SourceUrl, query: &str) -> Option<ChannelList> {
        self.get(url).map(|entry| filter_channels(entry, query))
    }

    /// Entry for `url` as consecutive group runs
    pub fn grouped(&self, url: &SourceUrl) -> Option<Vec<(&str, Vec<&Channel>)>> {
        self.get(url).map(group_channels)
    }

    /// Every source in submission order with `query` applied. A failed
    /// source keeps its placeholder whatever the query, so it is never
    /// filtered out of view.
    pub fn listings(&self, query: &str) -> Vec<SourceListing<'_>> {
        self.iter()
            .map(|(url, channels)| {
                let failed = is_failure(channels);
                SourceListing {
                    url,
                    failed,
                    channels: if failed {
                        channels.to_vec()
                    } else {
                        filter_channels(channels, query)
                    },
                }
            })
            .collect()
    }
}
