//! Core value types shared by the parser, catalog and loader

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group assigned to entries that appear before any `#EXTGRP:` directive
pub const DEFAULT_GROUP: &str = "SWIRTVTEAM";

/// Opaque identifier of one playlist origin
///
/// Used verbatim as the catalog key; no normalization is applied, so two
/// spellings of the same URL are two different sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceUrl(String);

impl SourceUrl {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceUrl {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

impl From<String> for SourceUrl {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl AsRef<str> for SourceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One playlist entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub group: String,
    pub name: String,
    /// True for every parsed entry, false only on a failure placeholder
    pub available: bool,
}

impl Channel {
    pub fn new<G: Into<String>, N: Into<String>>(group: G, name: N) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            available: true,
        }
    }

    /// Synthetic entry standing in for a source that could not be fetched.
    /// The error text takes the place of the group and the name is empty.
    pub fn placeholder<S: Into<String>>(label: S) -> Self {
        Self {
            group: label.into(),
            name: String::new(),
            available: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !self.available
    }
}

/// Ordered channels of one source, in document order
pub type ChannelList = Vec<Channel>;

/// True when a catalog entry is the single-element failure placeholder
pub fn is_failure(entry: &[Channel]) -> bool {
    matches!(entry, [only] if only.is_placeholder())
}

/// Emitted once per finished source during a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_finished(&self) -> bool {
        self.completed == self.total
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}
